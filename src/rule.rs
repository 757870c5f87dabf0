//! Rule taxonomy, context, and registry.
//!
//! Every rule is a plain value carrying shared metadata plus a [`RuleKind`]
//! that names exactly the granularity of the document it inspects. The
//! dispatcher switches exhaustively over the kind, so adding a variant is a
//! compiler-checked exercise. Custom rules supplied by callers are shaped
//! identically to built-ins; the engine never tells them apart.

use serde_json::Value;

use crate::error::RuleError;
use crate::finding::{Category, Finding, Severity};
use crate::model::{self, Method, ParamLocation};

/// What a check returns: findings, or an error the dispatcher converts into
/// a single error-severity finding without aborting the review.
pub type RuleOutcome = Result<Vec<Finding>, RuleError>;

/// Runs once per document.
pub type SpecCheck = fn(&RuleContext) -> RuleOutcome;

/// Runs once per entry in `paths`.
pub type PathCheck = fn(&RuleContext, path: &str, path_item: &Value) -> RuleOutcome;

/// Runs once per (path, method) pair that has an operation.
pub type OperationCheck =
    fn(&RuleContext, method: Method, operation: &Value, path: &str) -> RuleOutcome;

/// Runs once per parameter of every operation.
pub type ParameterCheck =
    fn(&RuleContext, parameter: &Value, method: Method, path: &str) -> RuleOutcome;

/// Runs once per `components.schemas` entry.
pub type SchemaCheck = fn(&RuleContext, name: &str, schema: &Value) -> RuleOutcome;

/// Runs once per property of every named schema.
pub type PropertyCheck =
    fn(&RuleContext, schema_name: &str, property_name: &str, property: &Value) -> RuleOutcome;

/// The closed set of rule granularities.
pub enum RuleKind {
    Spec(SpecCheck),
    Path(PathCheck),
    Operation {
        /// When set, the dispatcher only calls the rule for these methods.
        methods: Option<&'static [Method]>,
        check: OperationCheck,
    },
    Parameter {
        /// When set, the dispatcher only calls the rule for these locations.
        locations: Option<&'static [ParamLocation]>,
        check: ParameterCheck,
    },
    Schema(SchemaCheck),
    Property(PropertyCheck),
}

/// A named, categorized, severity-tagged unit of analysis.
pub struct Rule {
    /// Globally unique, `aipNNN/kebab-rule-name` format.
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub description: &'static str,
    /// AIP number this rule encodes, if any.
    pub aip: Option<u32>,
    pub kind: RuleKind,
}

/// Per-call context handed to every check.
///
/// Exposes the whole document for cross-referencing and a [`finding`]
/// constructor that stamps the running rule's id, severity, category, and
/// AIP reference so rule bodies never repeat that boilerplate.
///
/// [`finding`]: RuleContext::finding
pub struct RuleContext<'a> {
    pub document: &'a Value,
    rule_id: &'a str,
    severity: Severity,
    category: Category,
    aip: Option<u32>,
}

impl<'a> RuleContext<'a> {
    pub fn new(document: &'a Value, rule: &'a Rule) -> Self {
        RuleContext {
            document,
            rule_id: rule.id,
            severity: rule.severity,
            category: rule.category,
            aip: rule.aip,
        }
    }

    /// Create a finding stamped with the running rule's metadata.
    pub fn finding(&self, location: impl Into<String>, message: impl Into<String>) -> Finding {
        Finding {
            rule_id: self.rule_id.to_string(),
            severity: self.severity,
            category: self.category,
            path: location.into(),
            message: message.into(),
            aip: self.aip,
            suggestion: None,
            json_path: None,
            fix: None,
        }
    }

    /// Resolve a local `#/components/schemas/<Name>` ref.
    pub fn resolve_local_ref(&self, reference: &str) -> Option<&'a Value> {
        model::resolve_local_ref(self.document, reference)
    }
}

/// The fixed catalog for one reviewer: built-ins plus caller-supplied rules,
/// constructed once and never mutated afterwards.
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// The built-in catalog in its canonical order.
    pub fn builtin() -> Self {
        RuleRegistry {
            rules: crate::rules::builtin(),
        }
    }

    /// An empty registry, for callers composing a custom catalog.
    pub fn empty() -> Self {
        RuleRegistry { rules: Vec::new() }
    }

    /// Append custom rules after the built-ins. Dispatch order is insertion
    /// order.
    pub fn with_custom(mut self, rules: Vec<Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by id.
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Rules belonging to one category, in registry order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.category == category)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        RuleRegistry::builtin()
    }
}
