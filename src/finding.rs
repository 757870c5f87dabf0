//! The output vocabulary: findings, fixes, and spec changes.
//!
//! A [`Finding`] reports one rule violation at one location. It may carry a
//! [`Fix`]: a machine-readable remedy expressed as an ordered list of atomic
//! [`SpecChange`]s. A fix is a declaration of intent only; nothing mutates
//! until the fixer executes it. All of these types serialize losslessly so a
//! [`ReviewResult`] can be persisted as JSON and re-loaded later.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pointer::Pointer;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
}

/// Rule category, used for filtering and summary grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Naming,
    Pagination,
    Operations,
    Responses,
    Fields,
    Documentation,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Naming,
        Category::Pagination,
        Category::Operations,
        Category::Responses,
        Category::Fields,
        Category::Documentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Naming => "naming",
            Category::Pagination => "pagination",
            Category::Operations => "operations",
            Category::Responses => "responses",
            Category::Fields => "fields",
            Category::Documentation => "documentation",
        }
    }

    /// Parse a lowercase category name. Unknown names return `None`; config
    /// filtering treats those as matching nothing rather than failing.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "naming" => Some(Category::Naming),
            "pagination" => Some(Category::Pagination),
            "operations" => Some(Category::Operations),
            "responses" => Some(Category::Responses),
            "fields" => Some(Category::Fields),
            "documentation" => Some(Category::Documentation),
            _ => None,
        }
    }
}

/// One detected issue at a specific location in the spec.
///
/// Immutable once created; the reviewer produces exactly one per
/// (rule, location) match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    pub category: Category,
    /// Human-readable location, e.g. "GET /users/{id}".
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Finding {
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_json_path(mut self, json_path: impl Into<String>) -> Self {
        self.json_path = Some(json_path.into());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// The closed set of remedies the fixer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixType {
    RenamePathSegment,
    RenameParameter,
    AddParameter,
    AddParameters,
    RemoveRequestBody,
    ChangeStatusCode,
    AddOperation,
    AddSchema,
    AddSchemaProperty,
    AddResponse,
    SetSchemaConstraint,
}

/// A machine-applicable remedy attached to a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub fix_type: FixType,
    /// Pointer to the structure the fix is about, for reporting.
    pub json_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Atomic edits, executed in declared order.
    pub spec_changes: Vec<SpecChange>,
}

impl Fix {
    pub fn new(fix_type: FixType, json_path: impl Into<String>) -> Self {
        Fix {
            fix_type,
            json_path: json_path.into(),
            target: None,
            replacement: None,
            spec_changes: Vec::new(),
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn change(mut self, change: SpecChange) -> Self {
        self.spec_changes.push(change);
        self
    }
}

/// The edit operation a [`SpecChange`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeOp {
    /// Move the value at key `from` to key `to` inside the container at
    /// `path`, preserving insertion order.
    RenameKey,
    /// Replace (or insert) the value addressed by `path`; the parent must
    /// already exist.
    Set,
    /// Insert `value` at the new location addressed by `path`, creating at
    /// most the direct parent mapping; fails if the location exists.
    Add,
    /// Delete the location addressed by `path`; a no-op if already absent.
    Remove,
    /// Shallow-merge the object `value` into the mapping at `path`, incoming
    /// keys winning on conflict.
    Merge,
}

/// One atomic, order-sensitive edit against the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecChange {
    pub op: ChangeOp,
    pub path: Pointer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl SpecChange {
    pub fn rename_key(path: Pointer, from: impl Into<String>, to: impl Into<String>) -> Self {
        SpecChange {
            op: ChangeOp::RenameKey,
            path,
            from: Some(from.into()),
            to: Some(to.into()),
            value: None,
        }
    }

    pub fn set(path: Pointer, value: Value) -> Self {
        SpecChange {
            op: ChangeOp::Set,
            path,
            from: None,
            to: None,
            value: Some(value),
        }
    }

    pub fn add(path: Pointer, value: Value) -> Self {
        SpecChange {
            op: ChangeOp::Add,
            path,
            from: None,
            to: None,
            value: Some(value),
        }
    }

    pub fn remove(path: Pointer) -> Self {
        SpecChange {
            op: ChangeOp::Remove,
            path,
            from: None,
            to: None,
            value: None,
        }
    }

    pub fn merge(path: Pointer, value: Value) -> Self {
        SpecChange {
            op: ChangeOp::Merge,
            path,
            from: None,
            to: None,
            value: Some(value),
        }
    }
}

/// Aggregate counts over a review's findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub errors: usize,
    pub warnings: usize,
    pub suggestions: usize,
    pub by_category: Map<String, Value>,
}

impl ReviewSummary {
    /// Compute counts from findings. When `strict` is set, warnings count as
    /// errors in the aggregate; the findings themselves keep their intrinsic
    /// severity.
    pub fn compute(findings: &[Finding], strict: bool) -> Self {
        let mut errors = 0;
        let mut warnings = 0;
        let mut suggestions = 0;
        let mut by_category: Map<String, Value> = Map::new();

        for finding in findings {
            match finding.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Suggestion => suggestions += 1,
            }
            let count = by_category
                .entry(finding.category.as_str().to_string())
                .or_insert_with(|| Value::from(0u64));
            *count = Value::from(count.as_u64().unwrap_or(0) + 1);
        }

        if strict {
            errors += warnings;
            warnings = 0;
        }

        ReviewSummary {
            errors,
            warnings,
            suggestions,
            by_category,
        }
    }
}

/// Metadata about a review pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMetadata {
    /// Ids of rules that executed at least one check call.
    pub rules_applied: Vec<String>,
    /// Number of rules in the (filtered) catalog for this pass.
    pub rule_count: usize,
}

/// The complete output of one review pass. Recomputable from `findings`;
/// never mutated after the reviewer returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub spec_path: String,
    pub findings: Vec<Finding>,
    pub summary: ReviewSummary,
    pub metadata: ReviewMetadata,
}

impl ReviewResult {
    /// True when nothing at error level was found (warnings escalate under
    /// strict summaries before this is consulted).
    pub fn is_clean(&self) -> bool {
        self.summary.errors == 0
    }

    /// Findings that carry a machine-applicable fix.
    pub fn fixable(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.fix.is_some())
    }
}

/// Outcome of one attempted [`SpecChange`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeResult {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of one attempted [`Fix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixResult {
    pub rule_id: String,
    pub applied: bool,
    pub changes: Vec<ChangeResult>,
}

/// Aggregate over all fixes attempted by one fixer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSummary {
    pub applied: usize,
    pub failed: usize,
    /// Total spec changes attempted across all fixes.
    pub changes: usize,
}
