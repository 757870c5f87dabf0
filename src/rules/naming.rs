//! AIP-122: resource-oriented path naming.

use serde_json::Value;

use crate::finding::{Category, Fix, FixType, Severity, SpecChange};
use crate::pathinfo;
use crate::pointer::Pointer;
use crate::rule::{Rule, RuleContext, RuleKind, RuleOutcome};

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "aip122/plural-resources",
            name: "Plural resource collections",
            category: Category::Naming,
            severity: Severity::Warning,
            description: "Resource collection segments should use plural nouns",
            aip: Some(122),
            kind: RuleKind::Path(check_plural_resources),
        },
        Rule {
            id: "aip122/no-verbs",
            name: "No verbs in resource paths",
            category: Category::Naming,
            severity: Severity::Warning,
            description: "Path segments should name resources, not actions",
            aip: Some(122),
            kind: RuleKind::Path(check_no_verbs),
        },
        Rule {
            id: "aip122/ambiguous-id",
            name: "Resource-specific path parameters",
            category: Category::Naming,
            severity: Severity::Suggestion,
            description: "Deeply nested paths should not end in a generic {id} parameter",
            aip: Some(122),
            kind: RuleKind::Path(check_ambiguous_id),
        },
    ]
}

/// Collection segments must be plural. Singletons (no `{param}` sibling
/// anywhere in the document) and verb segments (owned by `no-verbs`) are
/// exempt. A shared singular segment is reported once, on the first path in
/// document order that contains it.
fn check_plural_resources(ctx: &RuleContext, path: &str, _path_item: &Value) -> RuleOutcome {
    let segs = pathinfo::segments(path);
    let mut findings = Vec::new();

    for index in pathinfo::collection_segment_indices(ctx.document, &segs) {
        let segment = segs[index];
        if pathinfo::is_plural(segment) || pathinfo::is_verb(segment) {
            continue;
        }
        if pathinfo::is_singleton(ctx.document, segment) {
            continue;
        }
        if pathinfo::first_path_with_segment(ctx.document, segment).map(String::as_str)
            != Some(path)
        {
            continue;
        }

        let plural = pathinfo::pluralize(segment);
        let fix = rename_segment_fix(ctx.document, segment, &plural);
        findings.push(
            ctx.finding(
                path,
                format!("resource collection '{}' should be plural", segment),
            )
            .with_suggestion(format!("rename '{}' to '{}'", segment, plural))
            .with_json_path(crate::rules::path_pointer(path).to_string())
            .with_fix(fix),
        );
    }

    Ok(findings)
}

/// Rename `segment` in every path that contains it, one ordered rename-key
/// per affected path.
fn rename_segment_fix(document: &Value, segment: &str, replacement: &str) -> Fix {
    let mut fix = Fix::new(FixType::RenamePathSegment, "/paths")
        .target(segment)
        .replacement(replacement);

    for (path, _) in crate::model::paths(document) {
        let segs = pathinfo::segments(path);
        if !segs.contains(&segment) {
            continue;
        }
        let renamed: Vec<&str> = segs
            .iter()
            .map(|s| if *s == segment { replacement } else { *s })
            .collect();
        let new_path = format!("/{}", renamed.join("/"));
        fix = fix.change(SpecChange::rename_key(
            Pointer::root().key("paths"),
            path.clone(),
            new_path,
        ));
    }

    fix
}

/// Resource segments must not be verbs. Custom methods (colon-prefixed,
/// hyphenated actions, or actions under item/singleton paths) are exempt.
fn check_no_verbs(ctx: &RuleContext, path: &str, _path_item: &Value) -> RuleOutcome {
    let segs = pathinfo::segments(path);
    let mut findings = Vec::new();

    for index in pathinfo::collection_segment_indices(ctx.document, &segs) {
        let segment = segs[index];
        if !pathinfo::is_verb(segment) {
            continue;
        }
        findings.push(
            ctx.finding(path, format!("path segment '{}' is a verb", segment))
                .with_suggestion(
                    "name segments after resources; express actions as custom methods \
                     (e.g. ':cancel') or standard HTTP methods",
                )
                .with_json_path(crate::rules::path_pointer(path).to_string()),
        );
    }

    Ok(findings)
}

/// A terminal generic `{id}` is ambiguous only in genuinely nested paths:
/// at least two resource/parameter pairs must precede it.
fn check_ambiguous_id(ctx: &RuleContext, path: &str, _path_item: &Value) -> RuleOutcome {
    let segs = pathinfo::segments(path);
    let Some(last) = segs.last() else {
        return Ok(Vec::new());
    };
    if !pathinfo::is_parameter(last) || pathinfo::parameter_name(last) != "id" {
        return Ok(Vec::new());
    }
    if pathinfo::ownership_pairs(&segs) < 2 {
        return Ok(Vec::new());
    }

    // The resource this parameter identifies is the preceding segment.
    let owner = segs[segs.len() - 2];
    let singular = owner.strip_suffix('s').unwrap_or(owner);
    Ok(vec![ctx
        .finding(
            path,
            "generic {id} parameter is ambiguous in a nested path".to_string(),
        )
        .with_suggestion(format!("rename to a resource-specific name, e.g. {{{}_id}}", singular))
        .with_json_path(crate::rules::path_pointer(path).to_string())])
}
