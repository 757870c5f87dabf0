//! AIP-158: pagination on list operations.

use serde_json::{json, Value};

use crate::finding::{Category, Fix, FixType, Severity, SpecChange};
use crate::model::{self, Method, ParamLocation};
use crate::pathinfo;
use crate::pointer::Pointer;
use crate::rule::{Rule, RuleContext, RuleKind, RuleOutcome};
use crate::rules::operation_pointer;

/// Parameter names accepted as a page-size control.
const SIZE_PARAMS: &[&str] = &["page_size", "pageSize", "limit", "max_results"];

/// Parameter names accepted as a pagination cursor or offset.
const TOKEN_PARAMS: &[&str] = &["page_token", "pageToken", "cursor", "offset", "page"];

/// Property names accepted as the next-page cursor in a list response.
const TOKEN_PROPERTIES: &[&str] = &["next_page_token", "nextPageToken", "next_cursor"];

static NULL: Value = Value::Null;

/// The enclosing path item, for its shared parameters.
fn path_item<'a>(document: &'a Value, path: &str) -> &'a Value {
    document
        .get("paths")
        .and_then(|p| p.get(path))
        .unwrap_or(&NULL)
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "aip158/list-paginated",
            name: "List operations are paginated",
            category: Category::Pagination,
            severity: Severity::Warning,
            description: "GET on a resource collection should accept pagination parameters",
            aip: Some(158),
            kind: RuleKind::Operation {
                methods: Some(&[Method::Get]),
                check: check_list_paginated,
            },
        },
        Rule {
            id: "aip158/page-token-response",
            name: "List responses carry a page token",
            category: Category::Pagination,
            severity: Severity::Suggestion,
            description: "Paginated list responses should include a next_page_token field",
            aip: Some(158),
            kind: RuleKind::Operation {
                methods: Some(&[Method::Get]),
                check: check_page_token_response,
            },
        },
        Rule {
            id: "aip158/page-size-bounds",
            name: "Page size is bounded",
            category: Category::Pagination,
            severity: Severity::Suggestion,
            description: "Integer page-size parameters should declare minimum and maximum",
            aip: Some(158),
            kind: RuleKind::Parameter {
                locations: Some(&[ParamLocation::Query]),
                check: check_page_size_bounds,
            },
        },
    ]
}

fn pagination_param_names<'a>(operation: &'a Value, path_item: &'a Value) -> Vec<&'a str> {
    model::all_parameters(operation, path_item)
        .iter()
        .filter(|p| model::parameter_location(p) == Some(ParamLocation::Query))
        .filter_map(|p| model::parameter_name(p))
        .collect()
}

/// A GET on a collection path with no page-size or cursor parameter cannot
/// be paginated by clients.
fn check_list_paginated(
    ctx: &RuleContext,
    method: Method,
    operation: &Value,
    path: &str,
) -> RuleOutcome {
    if !pathinfo::is_collection_path(ctx.document, path) {
        return Ok(Vec::new());
    }

    let names = pagination_param_names(operation, path_item(ctx.document, path));
    let has_size = names.iter().any(|n| SIZE_PARAMS.contains(n));
    let has_token = names.iter().any(|n| TOKEN_PARAMS.contains(n));
    if has_size || has_token {
        return Ok(Vec::new());
    }

    let existing = model::parameters(operation).len();
    let params_pointer = operation_pointer(path, method).key("parameters");
    let mut fix = Fix::new(FixType::AddParameters, params_pointer.to_string());
    let page_size = json!({
        "name": "page_size",
        "in": "query",
        "required": false,
        "schema": { "type": "integer", "minimum": 1, "maximum": 1000 }
    });
    let page_token = json!({
        "name": "page_token",
        "in": "query",
        "required": false,
        "schema": { "type": "string" }
    });
    if existing == 0 {
        fix = fix.change(SpecChange::add(
            params_pointer.clone(),
            json!([page_size, page_token]),
        ));
    } else {
        fix = fix
            .change(SpecChange::add(
                params_pointer.clone().index(existing),
                page_size,
            ))
            .change(SpecChange::add(
                params_pointer.clone().index(existing + 1),
                page_token,
            ));
    }

    Ok(vec![ctx
        .finding(
            format!("{} {}", method.upper(), path),
            "list operation accepts no pagination parameters",
        )
        .with_suggestion("accept page_size and page_token query parameters")
        .with_json_path(params_pointer.to_string())
        .with_fix(fix)])
}

/// The 200 response of a paginated list should expose a cursor. Only flags
/// object schemas we can actually inspect, to stay quiet on payloads the
/// rule cannot see into.
fn check_page_token_response(
    ctx: &RuleContext,
    method: Method,
    operation: &Value,
    path: &str,
) -> RuleOutcome {
    if !pathinfo::is_collection_path(ctx.document, path) {
        return Ok(Vec::new());
    }

    // Only meaningful once the operation is paginated on the request side.
    let names = pagination_param_names(operation, path_item(ctx.document, path));
    let paginated = names
        .iter()
        .any(|n| SIZE_PARAMS.contains(n) || TOKEN_PARAMS.contains(n));
    if !paginated {
        return Ok(Vec::new());
    }

    let Some(schema) = model::response_schema(ctx.document, operation, "200") else {
        return Ok(Vec::new());
    };
    let Some(properties) = model::schema_properties(schema) else {
        return Ok(Vec::new());
    };
    if properties.keys().any(|k| TOKEN_PROPERTIES.contains(&k.as_str())) {
        return Ok(Vec::new());
    }

    let mut finding = ctx
        .finding(
            format!("{} {}", method.upper(), path),
            "paginated list response has no next_page_token field",
        )
        .with_suggestion("add a next_page_token string property to the response schema");

    // When the response schema is a named component we can add the property
    // in place; inline schemas get a finding without a fix.
    if let Some(name) = referenced_schema_name(operation) {
        let pointer = Pointer::from_keys(["components", "schemas"])
            .key(name)
            .key("properties")
            .key("next_page_token");
        finding = finding.with_json_path(pointer.to_string()).with_fix(
            Fix::new(FixType::AddSchemaProperty, pointer.to_string())
                .target("next_page_token")
                .change(SpecChange::add(pointer, json!({ "type": "string" }))),
        );
    }

    Ok(vec![finding])
}

/// The `components.schemas` name the operation's 200 schema refers to.
fn referenced_schema_name(operation: &Value) -> Option<&str> {
    operation
        .get("responses")?
        .get("200")?
        .get("content")?
        .get("application/json")?
        .get("schema")?
        .get("$ref")?
        .as_str()?
        .strip_prefix("#/components/schemas/")
}

/// page_size-style integer parameters should bound what clients can ask for.
fn check_page_size_bounds(
    ctx: &RuleContext,
    parameter: &Value,
    method: Method,
    path: &str,
) -> RuleOutcome {
    let Some(name) = model::parameter_name(parameter) else {
        return Ok(Vec::new());
    };
    if !SIZE_PARAMS.contains(&name) {
        return Ok(Vec::new());
    }
    let Some(schema) = parameter.get("schema") else {
        return Ok(Vec::new());
    };
    if schema.get("type").and_then(Value::as_str) != Some("integer") {
        return Ok(Vec::new());
    }
    let missing_min = schema.get("minimum").is_none();
    let missing_max = schema.get("maximum").is_none();
    if !missing_min && !missing_max {
        return Ok(Vec::new());
    }

    let mut bounds = serde_json::Map::new();
    if missing_min {
        bounds.insert("minimum".to_string(), json!(1));
    }
    if missing_max {
        bounds.insert("maximum".to_string(), json!(1000));
    }

    let mut finding = ctx
        .finding(
            format!("{} {} ?{}", method.upper(), path, name),
            format!("integer parameter '{}' has no size bounds", name),
        )
        .with_suggestion("declare minimum and maximum so servers can cap page sizes");

    if let Some(index) = model::parameter_index(ctx.document, path, method, name) {
        let pointer = operation_pointer(path, method)
            .key("parameters")
            .index(index)
            .key("schema");
        finding = finding.with_json_path(pointer.to_string()).with_fix(
            Fix::new(FixType::SetSchemaConstraint, pointer.to_string())
                .change(SpecChange::merge(pointer, Value::Object(bounds))),
        );
    }

    Ok(vec![finding])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleRegistry;
    use serde_json::json;

    fn run_op(rule_id: &str, document: &Value) -> Vec<crate::finding::Finding> {
        let registry = RuleRegistry::builtin();
        let rule = registry.get(rule_id).unwrap();
        let ctx = RuleContext::new(document, rule);
        let (methods, check) = match &rule.kind {
            RuleKind::Operation { methods, check } => (*methods, *check),
            _ => panic!("expected an operation rule"),
        };
        crate::model::paths(document)
            .flat_map(|(path, item)| {
                crate::model::operations(item)
                    .filter(|(m, _)| methods.map_or(true, |allowed| allowed.contains(m)))
                    .flat_map(|(m, op)| check(&ctx, m, op, path).unwrap())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn unpaginated_list_flagged() {
        let doc = json!({"paths": {"/users": {"get": {"responses": {"200": {}}}}}});
        let findings = run_op("aip158/list-paginated", &doc);
        assert_eq!(findings.len(), 1);
        let fix = findings[0].fix.as_ref().unwrap();
        assert_eq!(fix.fix_type, FixType::AddParameters);
        // No parameters array yet, so one add creates it whole
        assert_eq!(fix.spec_changes.len(), 1);
    }

    #[test]
    fn page_size_parameter_satisfies_rule() {
        let doc = json!({"paths": {"/users": {"get": {
            "parameters": [{"name": "page_size", "in": "query",
                            "schema": {"type": "integer", "minimum": 1, "maximum": 100}}],
            "responses": {"200": {}}
        }}}});
        assert!(run_op("aip158/list-paginated", &doc).is_empty());
    }

    #[test]
    fn item_path_not_a_list() {
        let doc = json!({"paths": {"/users/{id}": {"get": {"responses": {"200": {}}}}}});
        assert!(run_op("aip158/list-paginated", &doc).is_empty());
    }

    #[test]
    fn existing_parameters_are_appended_to() {
        let doc = json!({"paths": {"/users": {"get": {
            "parameters": [{"name": "filter", "in": "query", "schema": {"type": "string"}}],
            "responses": {"200": {}}
        }}}});
        let findings = run_op("aip158/list-paginated", &doc);
        let fix = findings[0].fix.as_ref().unwrap();
        assert_eq!(fix.spec_changes.len(), 2);
        assert!(fix.spec_changes[0].path.to_string().ends_with("/1"));
        assert!(fix.spec_changes[1].path.to_string().ends_with("/2"));
    }

    #[test]
    fn missing_token_in_referenced_response_schema() {
        let doc = json!({
            "paths": {"/users": {"get": {
                "parameters": [{"name": "page_token", "in": "query",
                                "schema": {"type": "string"}}],
                "responses": {"200": {"content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/UserList"}
                }}}}
            }}},
            "components": {"schemas": {"UserList": {
                "type": "object",
                "properties": {"users": {"type": "array"}}
            }}}
        });
        let findings = run_op("aip158/page-token-response", &doc);
        assert_eq!(findings.len(), 1);
        let fix = findings[0].fix.as_ref().unwrap();
        assert_eq!(fix.fix_type, FixType::AddSchemaProperty);
        assert!(fix.json_path.contains("UserList"));
    }

    #[test]
    fn token_present_in_response_is_clean() {
        let doc = json!({
            "paths": {"/users": {"get": {
                "parameters": [{"name": "page_token", "in": "query",
                                "schema": {"type": "string"}}],
                "responses": {"200": {"content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/UserList"}
                }}}}
            }}},
            "components": {"schemas": {"UserList": {
                "type": "object",
                "properties": {"users": {}, "next_page_token": {"type": "string"}}
            }}}
        });
        assert!(run_op("aip158/page-token-response", &doc).is_empty());
    }

    #[test]
    fn unbounded_page_size_gets_constraint_fix() {
        let doc = json!({"paths": {"/users": {"get": {
            "parameters": [{"name": "page_size", "in": "query",
                            "schema": {"type": "integer"}}],
            "responses": {"200": {}}
        }}}});
        let registry = RuleRegistry::builtin();
        let rule = registry.get("aip158/page-size-bounds").unwrap();
        let ctx = RuleContext::new(&doc, rule);
        let check = match &rule.kind {
            RuleKind::Parameter { check, .. } => *check,
            _ => panic!("expected a parameter rule"),
        };
        let param = &doc["paths"]["/users"]["get"]["parameters"][0];
        let findings = check(&ctx, param, Method::Get, "/users").unwrap();
        assert_eq!(findings.len(), 1);
        let fix = findings[0].fix.as_ref().unwrap();
        assert_eq!(fix.fix_type, FixType::SetSchemaConstraint);
        let value = fix.spec_changes[0].value.as_ref().unwrap();
        assert_eq!(value["minimum"], 1);
        assert_eq!(value["maximum"], 1000);
    }
}
