//! AIP design review for OpenAPI documents.
//!
//! This library statically analyzes a parsed, reference-resolved OpenAPI
//! document against a catalog of design rules derived from Google's API
//! Improvement Proposals (AIPs), and can rewrite the document to remediate a
//! subset of violations automatically.
//!
//! # Example
//!
//! ```
//! use aip_lint::{Fixer, FixOptions, ReviewConfig, Reviewer, RuleRegistry};
//! use serde_json::json;
//!
//! let document = json!({
//!     "info": { "title": "Library", "version": "1.0.0", "description": "Books" },
//!     "paths": {
//!         "/user": { "get": { "operationId": "getUser",
//!                             "responses": { "200": {}, "default": {} } } },
//!         "/user/{id}": { "get": { "operationId": "getUserById",
//!                                  "responses": { "200": {}, "default": {} } } }
//!     }
//! });
//!
//! let reviewer = Reviewer::new(RuleRegistry::builtin());
//! let result = reviewer.review(&document, "library.json", &ReviewConfig::default()).unwrap();
//!
//! // '/user' is a singular collection; the finding carries a fix that
//! // pluralizes every affected path.
//! assert!(result.findings.iter().any(|f| f.rule_id == "aip122/plural-resources"));
//!
//! let fixable: Vec<_> = result.fixable().cloned().collect();
//! let mut fixer = Fixer::new(&document);
//! fixer.apply_fixes(&fixable, &FixOptions::default());
//! assert!(fixer.spec()["paths"].get("/users").is_some());
//! ```
//!
//! # Architecture
//!
//! Each [`Rule`] declares, through its [`RuleKind`], exactly the granularity
//! of the document it inspects: the whole document, a path, an operation, a
//! parameter, a named schema, or a schema property. The [`Reviewer`] walks
//! the document once and dispatches every applicable rule, collecting
//! [`Finding`]s into a [`ReviewResult`]. Findings may carry a [`Fix`], an
//! ordered list of atomic [`SpecChange`]s, which the [`Fixer`] applies to a
//! working copy with per-fix atomicity and dry-run support.

mod error;
mod finding;
mod fixer;
mod loader;
mod model;
mod pathinfo;
mod pointer;
mod reviewer;
mod rule;
mod rules;

pub use error::{LintError, ReviewError, RuleError};
pub use finding::{
    Category, ChangeOp, ChangeResult, Finding, Fix, FixResult, FixSummary, FixType, ReviewMetadata,
    ReviewResult, ReviewSummary, Severity, SpecChange,
};
pub use fixer::{FixOptions, Fixer};
pub use loader::{load_spec, load_spec_str};
pub use model::{Method, ParamLocation};
pub use pointer::{Pointer, Segment};
pub use reviewer::{ReviewConfig, Reviewer};
pub use rule::{
    OperationCheck, ParameterCheck, PathCheck, PropertyCheck, Rule, RuleContext, RuleKind,
    RuleOutcome, RuleRegistry, SchemaCheck, SpecCheck,
};
