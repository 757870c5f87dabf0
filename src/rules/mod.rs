//! Built-in rule catalog.
//!
//! Rules are grouped by the AIP family they encode. [`builtin`] returns the
//! catalog in its canonical order, which is also dispatch order; tests rely
//! on that order being stable.

use crate::pointer::Pointer;
use crate::rule::Rule;

mod document;
mod fields;
mod naming;
mod operations;
mod pagination;

/// The built-in catalog in canonical order.
pub fn builtin() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(naming::rules());
    rules.extend(operations::rules());
    rules.extend(pagination::rules());
    rules.extend(fields::rules());
    rules.extend(document::rules());
    rules
}

/// Pointer to a path item: `/paths/<path>`.
pub(crate) fn path_pointer(path: &str) -> Pointer {
    Pointer::root().key("paths").key(path)
}

/// Pointer to an operation: `/paths/<path>/<method>`.
pub(crate) fn operation_pointer(path: &str, method: crate::model::Method) -> Pointer {
    path_pointer(path).key(method.as_str())
}
