//! AIP-131..136 and AIP-193: standard-method shape and error responses.

use serde_json::{json, Value};

use crate::finding::{Category, Fix, FixType, Severity, SpecChange};
use crate::model::Method;
use crate::pathinfo;
use crate::rule::{Rule, RuleContext, RuleKind, RuleOutcome};
use crate::rules::operation_pointer;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "aip131/get-no-body",
            name: "No request body on GET or DELETE",
            category: Category::Operations,
            severity: Severity::Error,
            description: "GET and DELETE operations must not declare a request body",
            aip: Some(131),
            kind: RuleKind::Operation {
                methods: Some(&[Method::Get, Method::Delete]),
                check: check_no_body,
            },
        },
        Rule {
            id: "aip133/create-status-code",
            name: "Create returns 201",
            category: Category::Responses,
            severity: Severity::Warning,
            description: "POST on a resource collection should respond with 201 Created",
            aip: Some(133),
            kind: RuleKind::Operation {
                methods: Some(&[Method::Post]),
                check: check_create_status,
            },
        },
        Rule {
            id: "aip134/patch-for-update",
            name: "Prefer PATCH for updates",
            category: Category::Operations,
            severity: Severity::Suggestion,
            description: "Updates should use PATCH with partial semantics rather than PUT",
            aip: Some(134),
            kind: RuleKind::Operation {
                methods: Some(&[Method::Put]),
                check: check_patch_for_update,
            },
        },
        Rule {
            id: "aip136/operation-id",
            name: "Operations are named",
            category: Category::Operations,
            severity: Severity::Suggestion,
            description: "Every operation should declare an operationId",
            aip: Some(136),
            kind: RuleKind::Operation {
                methods: None,
                check: check_operation_id,
            },
        },
        Rule {
            id: "aip193/error-responses",
            name: "Error responses declared",
            category: Category::Responses,
            severity: Severity::Suggestion,
            description: "Operations should document at least one error or default response",
            aip: Some(193),
            kind: RuleKind::Operation {
                methods: None,
                check: check_error_responses,
            },
        },
    ]
}

fn location(method: Method, path: &str) -> String {
    format!("{} {}", method.upper(), path)
}

fn check_no_body(ctx: &RuleContext, method: Method, operation: &Value, path: &str) -> RuleOutcome {
    if operation.get("requestBody").is_none() {
        return Ok(Vec::new());
    }

    let pointer = operation_pointer(path, method).key("requestBody");
    let fix =
        Fix::new(FixType::RemoveRequestBody, pointer.to_string()).change(SpecChange::remove(pointer.clone()));
    Ok(vec![ctx
        .finding(
            location(method, path),
            format!("{} operations must not have a request body", method.upper()),
        )
        .with_json_path(pointer.to_string())
        .with_fix(fix)])
}

/// POST on a collection path is a create; it should answer 201, not 200.
fn check_create_status(
    ctx: &RuleContext,
    method: Method,
    operation: &Value,
    path: &str,
) -> RuleOutcome {
    if !pathinfo::is_collection_path(ctx.document, path) {
        return Ok(Vec::new());
    }
    let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };
    if !responses.contains_key("200") || responses.contains_key("201") {
        return Ok(Vec::new());
    }

    let pointer = operation_pointer(path, method).key("responses");
    let fix = Fix::new(FixType::ChangeStatusCode, pointer.to_string())
        .target("200")
        .replacement("201")
        .change(SpecChange::rename_key(pointer.clone(), "200", "201"));
    Ok(vec![ctx
        .finding(
            location(method, path),
            "create operation responds with 200; a created resource is 201",
        )
        .with_suggestion("declare the success response under status 201")
        .with_json_path(pointer.key("200").to_string())
        .with_fix(fix)])
}

fn check_patch_for_update(
    ctx: &RuleContext,
    method: Method,
    _operation: &Value,
    path: &str,
) -> RuleOutcome {
    // PUT on an item path is an update; full-replacement semantics are rarely
    // what callers want.
    let segs = pathinfo::segments(path);
    let is_item_path = segs.last().is_some_and(|s| pathinfo::is_parameter(s));
    if !is_item_path {
        return Ok(Vec::new());
    }
    Ok(vec![ctx
        .finding(
            location(method, path),
            "update uses PUT; PATCH with a field mask expresses partial updates",
        )
        .with_json_path(operation_pointer(path, method).to_string())])
}

fn check_operation_id(
    ctx: &RuleContext,
    method: Method,
    operation: &Value,
    path: &str,
) -> RuleOutcome {
    let named = operation
        .get("operationId")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if named {
        return Ok(Vec::new());
    }
    Ok(vec![ctx
        .finding(location(method, path), "operation has no operationId")
        .with_suggestion("give the operation a stable, unique operationId")
        .with_json_path(operation_pointer(path, method).to_string())])
}

/// Every operation should document how it fails: a 4xx/5xx status or a
/// `default` response.
fn check_error_responses(
    ctx: &RuleContext,
    method: Method,
    operation: &Value,
    path: &str,
) -> RuleOutcome {
    let responses = operation.get("responses").and_then(Value::as_object);
    let has_error_response = responses.is_some_and(|map| {
        map.keys()
            .any(|status| status == "default" || status.starts_with('4') || status.starts_with('5'))
    });
    if has_error_response {
        return Ok(Vec::new());
    }

    let pointer = operation_pointer(path, method).key("responses").key("default");
    let fix = Fix::new(FixType::AddResponse, pointer.to_string())
        .target("default")
        .change(SpecChange::add(
            pointer.clone(),
            json!({ "description": "Unexpected error" }),
        ));
    Ok(vec![ctx
        .finding(
            location(method, path),
            "operation documents no error or default response",
        )
        .with_json_path(pointer.to_string())
        .with_fix(fix)])
}
