//! AIP-192: document-level metadata.

use serde_json::Value;

use crate::finding::{Category, Severity};
use crate::rule::{Rule, RuleContext, RuleKind, RuleOutcome};

pub fn rules() -> Vec<Rule> {
    vec![Rule {
        id: "aip192/info-metadata",
        name: "Document metadata is complete",
        category: Category::Documentation,
        severity: Severity::Suggestion,
        description: "The info block should carry a title, version, and description",
        aip: Some(192),
        kind: RuleKind::Spec(check_info_metadata),
    }]
}

fn check_info_metadata(ctx: &RuleContext) -> RuleOutcome {
    let info = ctx.document.get("info");
    let mut findings = Vec::new();

    for field in ["title", "version", "description"] {
        let present = info
            .and_then(|i| i.get(field))
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty());
        if present {
            continue;
        }
        findings.push(
            ctx.finding("info", format!("info.{} is missing or empty", field))
                .with_json_path(format!("/info/{}", field)),
        );
    }

    Ok(findings)
}
