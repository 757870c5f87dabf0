//! Review orchestration: one pass over the document, dispatching every
//! applicable rule at its declared granularity.

use serde_json::Value;

use crate::error::ReviewError;
use crate::finding::{Category, Finding, ReviewMetadata, ReviewResult, ReviewSummary, Severity};
use crate::model::{self, json_type_name};
use crate::rule::{Rule, RuleContext, RuleKind, RuleOutcome, RuleRegistry};

/// Configuration for one review pass.
#[derive(Debug, Clone, Default)]
pub struct ReviewConfig {
    /// Count warnings as errors in the summary. Finding severities are
    /// reported as the rules declared them either way.
    pub strict: bool,
    /// When non-empty, only rules in these categories run.
    pub categories: Vec<Category>,
    /// Rule ids to skip. Unknown ids are ignored rather than rejected, so a
    /// stale config referencing a removed rule cannot break the review.
    pub skip_rules: Vec<String>,
}

/// Walks the document once and collects findings from every applicable rule.
pub struct Reviewer {
    registry: RuleRegistry,
}

impl Reviewer {
    pub fn new(registry: RuleRegistry) -> Self {
        Reviewer { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Review a dereferenced document. The document is never mutated.
    ///
    /// # Errors
    ///
    /// Only a document whose root is not an object fails; everything else,
    /// including a rule check erroring, still produces a result.
    pub fn review(
        &self,
        document: &Value,
        spec_path: &str,
        config: &ReviewConfig,
    ) -> Result<ReviewResult, ReviewError> {
        if !document.is_object() {
            return Err(ReviewError::MalformedDocument {
                actual: json_type_name(document).to_string(),
            });
        }

        let active: Vec<&Rule> = self
            .registry
            .rules()
            .iter()
            .filter(|rule| config.categories.is_empty() || config.categories.contains(&rule.category))
            .filter(|rule| !config.skip_rules.iter().any(|id| id == rule.id))
            .collect();

        let mut pass = Pass {
            findings: Vec::new(),
            applied: vec![false; active.len()],
        };

        // Spec-level rules run exactly once, before the path loop.
        for (slot, rule) in active.iter().enumerate() {
            if let RuleKind::Spec(check) = &rule.kind {
                let ctx = RuleContext::new(document, rule);
                pass.record(slot, rule, "document", check(&ctx));
            }
        }

        // Single pass over paths: path rules, then operations, then their
        // parameters.
        for (path, path_item) in model::paths(document) {
            for (slot, rule) in active.iter().enumerate() {
                if let RuleKind::Path(check) = &rule.kind {
                    let ctx = RuleContext::new(document, rule);
                    pass.record(slot, rule, path, check(&ctx, path, path_item));
                }
            }

            for (method, operation) in model::operations(path_item) {
                let op_location = format!("{} {}", method.upper(), path);
                for (slot, rule) in active.iter().enumerate() {
                    if let RuleKind::Operation { methods, check } = &rule.kind {
                        if methods.map_or(false, |allowed| !allowed.contains(&method)) {
                            continue;
                        }
                        let ctx = RuleContext::new(document, rule);
                        pass.record(
                            slot,
                            rule,
                            &op_location,
                            check(&ctx, method, operation, path),
                        );
                    }
                }

                for parameter in model::parameters(operation) {
                    let location = model::parameter_location(parameter);
                    for (slot, rule) in active.iter().enumerate() {
                        if let RuleKind::Parameter { locations, check } = &rule.kind {
                            let allowed = match (locations, location) {
                                (None, _) => true,
                                (Some(wanted), Some(actual)) => wanted.contains(&actual),
                                (Some(_), None) => false,
                            };
                            if !allowed {
                                continue;
                            }
                            let ctx = RuleContext::new(document, rule);
                            pass.record(
                                slot,
                                rule,
                                &op_location,
                                check(&ctx, parameter, method, path),
                            );
                        }
                    }
                }
            }
        }

        // One pass over components.schemas for schema and property rules.
        for (name, schema) in model::schemas(document) {
            let schema_location = format!("schemas.{}", name);
            for (slot, rule) in active.iter().enumerate() {
                if let RuleKind::Schema(check) = &rule.kind {
                    let ctx = RuleContext::new(document, rule);
                    pass.record(slot, rule, &schema_location, check(&ctx, name, schema));
                }
            }

            if let Some(properties) = model::schema_properties(schema) {
                for (property_name, property) in properties {
                    for (slot, rule) in active.iter().enumerate() {
                        if let RuleKind::Property(check) = &rule.kind {
                            let ctx = RuleContext::new(document, rule);
                            pass.record(
                                slot,
                                rule,
                                &schema_location,
                                check(&ctx, name, property_name, property),
                            );
                        }
                    }
                }
            }
        }

        let rules_applied = active
            .iter()
            .zip(&pass.applied)
            .filter(|(_, ran)| **ran)
            .map(|(rule, _)| rule.id.to_string())
            .collect();

        Ok(ReviewResult {
            spec_path: spec_path.to_string(),
            summary: ReviewSummary::compute(&pass.findings, config.strict),
            metadata: ReviewMetadata {
                rules_applied,
                rule_count: active.len(),
            },
            findings: pass.findings,
        })
    }
}

struct Pass {
    findings: Vec<Finding>,
    applied: Vec<bool>,
}

impl Pass {
    /// Record one check call's outcome. A failing check becomes a single
    /// error-severity finding instead of aborting the review.
    fn record(&mut self, slot: usize, rule: &Rule, location: &str, outcome: RuleOutcome) {
        self.applied[slot] = true;
        match outcome {
            Ok(findings) => self.findings.extend(findings),
            Err(err) => self.findings.push(Finding {
                rule_id: rule.id.to_string(),
                severity: Severity::Error,
                category: rule.category,
                path: location.to_string(),
                message: format!("internal rule error: {}", err),
                aip: rule.aip,
                suggestion: None,
                json_path: None,
                fix: None,
            }),
        }
    }
}
