//! Accessors over the in-memory spec document.
//!
//! The document is a `serde_json::Value` with insertion-ordered objects
//! (`preserve_order`), fully dereferenced by the caller's loader except for
//! local `#/components/schemas/<Name>` refs, which [`resolve_local_ref`]
//! handles on demand. These helpers keep the shape probing in one place so
//! rule bodies read declaratively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP methods that can appear as operation keys on a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    Trace,
}

impl Method {
    /// All methods, in dispatch order.
    pub const ALL: &'static [Method] = &[
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
        Method::Head,
        Method::Trace,
    ];

    /// Parse a path-item key. Returns `None` for non-method keys such as
    /// `parameters` or `description`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Method::Get),
            "post" => Some(Method::Post),
            "put" => Some(Method::Put),
            "patch" => Some(Method::Patch),
            "delete" => Some(Method::Delete),
            "options" => Some(Method::Options),
            "head" => Some(Method::Head),
            "trace" => Some(Method::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Options => "options",
            Method::Head => "head",
            Method::Trace => "trace",
        }
    }

    /// Uppercase form for human-readable locations ("GET /users").
    pub fn upper(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Trace => "TRACE",
        }
    }
}

/// Where a parameter lives (`in` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParamLocation {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "query" => Some(ParamLocation::Query),
            "header" => Some(ParamLocation::Header),
            "path" => Some(ParamLocation::Path),
            "cookie" => Some(ParamLocation::Cookie),
            _ => None,
        }
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Iterate the document's paths in declaration order.
pub fn paths(document: &Value) -> impl Iterator<Item = (&String, &Value)> {
    document
        .get("paths")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
}

/// Iterate the operations of a path item in declaration order.
pub fn operations(path_item: &Value) -> impl Iterator<Item = (Method, &Value)> {
    path_item
        .as_object()
        .into_iter()
        .flatten()
        .filter_map(|(key, op)| Method::from_key(key).map(|m| (m, op)))
}

/// An operation's own parameters. Path-level parameters are not included;
/// callers that need the combined view use [`all_parameters`].
pub fn parameters(operation: &Value) -> &[Value] {
    operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Operation parameters plus the enclosing path item's shared parameters.
pub fn all_parameters<'a>(operation: &'a Value, path_item: &'a Value) -> Vec<&'a Value> {
    let mut combined: Vec<&Value> = parameters(operation).iter().collect();
    if let Some(shared) = path_item.get("parameters").and_then(Value::as_array) {
        combined.extend(shared.iter());
    }
    combined
}

/// A parameter's `name`, if present and a string.
pub fn parameter_name(parameter: &Value) -> Option<&str> {
    parameter.get("name").and_then(Value::as_str)
}

/// A parameter's location, if present and recognized.
pub fn parameter_location(parameter: &Value) -> Option<ParamLocation> {
    parameter
        .get("in")
        .and_then(Value::as_str)
        .and_then(ParamLocation::from_key)
}

/// Position of a named parameter in an operation's own `parameters` array.
/// Used by fixes that need a pointer to the parameter object.
pub fn parameter_index(document: &Value, path: &str, method: Method, name: &str) -> Option<usize> {
    let operation = document.get("paths")?.get(path)?.get(method.as_str())?;
    parameters(operation)
        .iter()
        .position(|p| parameter_name(p) == Some(name))
}

/// Iterate `components.schemas` entries in declaration order.
pub fn schemas(document: &Value) -> impl Iterator<Item = (&String, &Value)> {
    document
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
}

/// A schema's `properties` map, if any.
pub fn schema_properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}

/// Resolve a local `#/components/schemas/<Name>` ref against the document.
///
/// The input is loader-dereferenced, but response and parameter schemas may
/// still point into `components.schemas`; this is the one piece of `$ref`
/// handling rules perform themselves. Non-local refs return `None`.
pub fn resolve_local_ref<'a>(document: &'a Value, reference: &str) -> Option<&'a Value> {
    let name = reference.strip_prefix("#/components/schemas/")?;
    document.get("components")?.get("schemas")?.get(name)
}

/// Follow a node's `$ref` if it carries one, otherwise return the node.
pub fn deref_schema<'a>(document: &'a Value, node: &'a Value) -> &'a Value {
    match node.get("$ref").and_then(Value::as_str) {
        Some(reference) => resolve_local_ref(document, reference).unwrap_or(node),
        None => node,
    }
}

/// The JSON response schema of an operation for a given status code,
/// following one level of local `$ref`.
pub fn response_schema<'a>(
    document: &'a Value,
    operation: &'a Value,
    status: &str,
) -> Option<&'a Value> {
    let schema = operation
        .get("responses")?
        .get(status)?
        .get("content")?
        .get("application/json")?
        .get("schema")?;
    Some(deref_schema(document, schema))
}
