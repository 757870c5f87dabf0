//! AIP-140, AIP-126, AIP-203: field and parameter naming, enum values,
//! schema consistency.

use serde_json::Value;

use crate::finding::{Category, Fix, FixType, Severity, SpecChange};
use crate::model::{self, Method, ParamLocation};
use crate::rule::{Rule, RuleContext, RuleKind, RuleOutcome};
use crate::rules::operation_pointer;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "aip140/parameter-snake-case",
            name: "Query parameters use snake_case",
            category: Category::Fields,
            severity: Severity::Warning,
            description: "Query parameter names should be lower snake_case",
            aip: Some(140),
            kind: RuleKind::Parameter {
                locations: Some(&[ParamLocation::Query]),
                check: check_parameter_snake_case,
            },
        },
        Rule {
            id: "aip140/property-snake-case",
            name: "Schema properties use snake_case",
            category: Category::Fields,
            severity: Severity::Warning,
            description: "Schema property names should be lower snake_case",
            aip: Some(140),
            kind: RuleKind::Property(check_property_snake_case),
        },
        Rule {
            id: "aip126/enum-upper-snake",
            name: "Enum values use UPPER_SNAKE_CASE",
            category: Category::Fields,
            severity: Severity::Suggestion,
            description: "String enum values should be UPPER_SNAKE_CASE",
            aip: Some(126),
            kind: RuleKind::Property(check_enum_values),
        },
        Rule {
            id: "aip203/required-properties-exist",
            name: "Required properties exist",
            category: Category::Fields,
            severity: Severity::Error,
            description: "Every name in a schema's required list must be a declared property",
            aip: Some(203),
            kind: RuleKind::Schema(check_required_exists),
        },
    ]
}

fn is_snake_case(name: &str) -> bool {
    !name.is_empty()
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_upper_snake_case(value: &str) -> bool {
    !value.is_empty()
        && value.starts_with(|c: char| c.is_ascii_uppercase())
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// camelCase or kebab-case to snake_case, for fix suggestions.
fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '-' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

fn check_parameter_snake_case(
    ctx: &RuleContext,
    parameter: &Value,
    method: Method,
    path: &str,
) -> RuleOutcome {
    let Some(name) = model::parameter_name(parameter) else {
        return Ok(Vec::new());
    };
    if is_snake_case(name) {
        return Ok(Vec::new());
    }

    let replacement = to_snake_case(name);
    let mut finding = ctx
        .finding(
            format!("{} {} ?{}", method.upper(), path, name),
            format!("query parameter '{}' is not snake_case", name),
        )
        .with_suggestion(format!("rename to '{}'", replacement));

    if let Some(index) = model::parameter_index(ctx.document, path, method, name) {
        let pointer = operation_pointer(path, method)
            .key("parameters")
            .index(index)
            .key("name");
        finding = finding.with_json_path(pointer.to_string()).with_fix(
            Fix::new(FixType::RenameParameter, pointer.to_string())
                .target(name)
                .replacement(&replacement)
                .change(SpecChange::set(pointer, Value::String(replacement.clone()))),
        );
    }

    Ok(vec![finding])
}

fn check_property_snake_case(
    ctx: &RuleContext,
    schema_name: &str,
    property_name: &str,
    _property: &Value,
) -> RuleOutcome {
    if is_snake_case(property_name) {
        return Ok(Vec::new());
    }
    // Renaming a property is a breaking change for clients, so no fix here.
    Ok(vec![ctx
        .finding(
            format!("schemas.{}.{}", schema_name, property_name),
            format!("property '{}' is not snake_case", property_name),
        )
        .with_suggestion(format!("use '{}'", to_snake_case(property_name)))
        .with_json_path(
            crate::pointer::Pointer::from_keys(["components", "schemas"])
                .key(schema_name)
                .key("properties")
                .key(property_name)
                .to_string(),
        )])
}

fn check_enum_values(
    ctx: &RuleContext,
    schema_name: &str,
    property_name: &str,
    property: &Value,
) -> RuleOutcome {
    let Some(values) = property.get("enum").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    let offenders: Vec<&str> = values
        .iter()
        .filter_map(Value::as_str)
        .filter(|v| !is_upper_snake_case(v))
        .collect();
    if offenders.is_empty() {
        return Ok(Vec::new());
    }

    Ok(vec![ctx
        .finding(
            format!("schemas.{}.{}", schema_name, property_name),
            format!(
                "enum value(s) not UPPER_SNAKE_CASE: {}",
                offenders.join(", ")
            ),
        )
        .with_suggestion("write enum values as UPPER_SNAKE_CASE, e.g. ACTIVE, PENDING_REVIEW")])
}

/// `required` names that are not declared properties are contract bugs, not
/// style issues.
fn check_required_exists(ctx: &RuleContext, name: &str, schema: &Value) -> RuleOutcome {
    let Some(required) = schema.get("required").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    let properties = model::schema_properties(schema);

    let mut findings = Vec::new();
    for entry in required.iter().filter_map(Value::as_str) {
        let declared = properties.is_some_and(|props| props.contains_key(entry));
        if declared {
            continue;
        }
        findings.push(
            ctx.finding(
                format!("schemas.{}", name),
                format!("required property '{}' is not declared", entry),
            )
            .with_suggestion(format!(
                "declare '{}' under properties or drop it from required",
                entry
            )),
        );
    }
    Ok(findings)
}
