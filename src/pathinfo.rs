//! Path-segment classification for the naming and pagination rule family.
//!
//! These heuristics decide what a URL segment *is* before any rule decides
//! whether it is wrong: version prefixes are excluded from resource analysis,
//! singletons are exempt from plural naming, and custom methods are exempt
//! from the no-verbs rule. Getting these boundaries right is what keeps the
//! naming rules from producing false positives on real-world specs.

use serde_json::Value;

use crate::model;

/// Nouns accepted in singular form (uncountable or conventional).
pub const UNCOUNTABLE: &[&str] = &[
    "data", "config", "status", "health", "metrics", "info", "search",
];

/// Verbs that should not appear as resource segments.
const VERBS: &[&str] = &[
    "get", "list", "create", "update", "delete", "fetch", "retrieve", "remove", "add", "new",
    "edit", "modify", "set", "do", "make", "post", "put",
];

/// Split a template path into its segments, dropping empties.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// True for `{param}` template segments.
pub fn is_parameter(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// The name inside a `{param}` segment.
pub fn parameter_name(segment: &str) -> &str {
    segment.trim_start_matches('{').trim_end_matches('}')
}

/// True for `v1`, `v2`, ... segments.
pub fn is_version_segment(segment: &str) -> bool {
    let digits = match segment.strip_prefix('v') {
        Some(rest) => rest,
        None => return false,
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Number of leading segments forming a version prefix: `v1` or `api/v1`.
/// Those segments carry no resource meaning and are skipped by every rule.
pub fn version_prefix_len(segs: &[&str]) -> usize {
    match segs {
        [first, second, ..] if *first == "api" && is_version_segment(second) => 2,
        [first, ..] if is_version_segment(first) => 1,
        _ => 0,
    }
}

/// True when a segment reads as a recognized verb/action word.
pub fn is_verb(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    lower.split('-').any(|token| VERBS.contains(&token))
}

/// Simple English plural check. Uncountable nouns pass as-is.
pub fn is_plural(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return true;
    }
    if lower.ends_with("ies") || lower.ends_with("es") {
        return true;
    }
    lower.ends_with('s') && !lower.ends_with("ss")
}

/// Naive pluralization for fix suggestions.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if let Some(stem) = lower.strip_suffix('y') {
        let before = stem.bytes().last();
        let is_vowel = matches!(before, Some(b'a' | b'e' | b'i' | b'o' | b'u'));
        if !is_vowel && !stem.is_empty() {
            return format!("{}ies", stem);
        }
    }
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", lower);
    }
    format!("{}s", lower)
}

/// True when no path anywhere in the document parameterizes this resource
/// (`<resource>/{param}`). Singletons are exempt from plural naming, and
/// actions under them count as custom methods.
pub fn is_singleton(document: &Value, resource: &str) -> bool {
    for (path, _) in model::paths(document) {
        let segs = segments(path);
        for pair in segs.windows(2) {
            if pair[0] == resource && is_parameter(pair[1]) {
                return false;
            }
        }
    }
    true
}

/// True when the segment at `index` is a trailing custom method:
/// colon-prefixed (`:cancel`), a hyphenated action (`batch-get`), or a bare
/// word directly under an item path (`/models/{id}/train`) or a singleton
/// resource (`/database/backup`).
pub fn is_custom_method(document: &Value, segs: &[&str], index: usize) -> bool {
    if index + 1 != segs.len() {
        return false;
    }
    let segment = segs[index];
    if segment.contains(':') {
        return true;
    }
    if segment.contains('-') && is_verb(segment) {
        return true;
    }
    if index == 0 {
        return false;
    }
    let previous = segs[index - 1];
    if is_parameter(previous) {
        return true;
    }
    !is_parameter(previous) && !is_version_segment(previous) && is_singleton(document, previous)
}

/// Count the resource/parameter pairs preceding the final parameter.
///
/// `/v1/shelves/{shelf}/books/{book}` has two pairs; `/v1/users/{id}` has
/// one. A terminal generic `{id}` is only ambiguous when at least two pairs
/// exist, i.e. the path is genuinely nested rather than merely versioned.
pub fn ownership_pairs(segs: &[&str]) -> usize {
    let start = version_prefix_len(segs);
    segs[start..]
        .windows(2)
        .filter(|pair| !is_parameter(pair[0]) && is_parameter(pair[1]))
        .count()
}

/// The indices of segments that name resource collections: not parameters,
/// not version prefixes, not custom methods.
pub fn collection_segment_indices(document: &Value, segs: &[&str]) -> Vec<usize> {
    let start = version_prefix_len(segs);
    (start..segs.len())
        .filter(|&i| !is_parameter(segs[i]) && !is_custom_method(document, segs, i))
        .collect()
}

/// True when `path` is a collection path: its final meaningful segment is a
/// resource collection name (not a parameter, not a custom method).
pub fn is_collection_path(document: &Value, path: &str) -> bool {
    let segs = segments(path);
    match segs.last() {
        Some(last) => {
            !is_parameter(last)
                && !is_version_segment(last)
                && !is_custom_method(document, &segs, segs.len() - 1)
        }
        None => false,
    }
}

/// The first path in document order containing `segment`. Used to report a
/// shared offending segment exactly once.
pub fn first_path_with_segment<'a>(document: &'a Value, segment: &str) -> Option<&'a String> {
    model::paths(document)
        .map(|(path, _)| path)
        .find(|path| segments(path).contains(&segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(paths: Value) -> Value {
        json!({ "paths": paths })
    }

    #[test]
    fn segments_drop_empties() {
        assert_eq!(segments("/v1/users/{id}"), vec!["v1", "users", "{id}"]);
        assert_eq!(segments("/"), Vec::<&str>::new());
    }

    #[test]
    fn version_segments() {
        assert!(is_version_segment("v1"));
        assert!(is_version_segment("v12"));
        assert!(!is_version_segment("v"));
        assert!(!is_version_segment("version"));
        assert!(!is_version_segment("users"));
    }

    #[test]
    fn version_prefix_handles_api() {
        assert_eq!(version_prefix_len(&["v1", "users"]), 1);
        assert_eq!(version_prefix_len(&["api", "v2", "users"]), 2);
        assert_eq!(version_prefix_len(&["api", "users"]), 0);
        assert_eq!(version_prefix_len(&["users"]), 0);
    }

    #[test]
    fn plural_heuristics() {
        assert!(is_plural("users"));
        assert!(is_plural("companies"));
        assert!(is_plural("boxes"));
        assert!(!is_plural("user"));
        assert!(!is_plural("address"));
        // Uncountable exceptions pass in singular form
        assert!(is_plural("data"));
        assert!(is_plural("config"));
        assert!(is_plural("health"));
    }

    #[test]
    fn pluralize_forms() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("company"), "companies");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("branch"), "branches");
    }

    #[test]
    fn verbs_recognized() {
        assert!(is_verb("create"));
        assert!(is_verb("getUser") == false);
        assert!(is_verb("batch-get"));
        assert!(!is_verb("users"));
        assert!(!is_verb("orders"));
    }

    #[test]
    fn singleton_detection() {
        let d = doc(json!({
            "/v1/database/backup": {},
            "/v1/users": {},
            "/v1/users/{id}": {}
        }));
        assert!(is_singleton(&d, "database"));
        assert!(!is_singleton(&d, "users"));
    }

    #[test]
    fn custom_method_colon() {
        let d = doc(json!({"/v1/operations/{id}:cancel": {}}));
        let segs = segments("/v1/operations/{id}:cancel");
        assert!(is_custom_method(&d, &segs, 2));
    }

    #[test]
    fn custom_method_under_item_path() {
        let d = doc(json!({"/models/{id}/train": {}}));
        let segs = segments("/models/{id}/train");
        assert!(is_custom_method(&d, &segs, 2));
        // Non-trailing segments are never custom methods
        assert!(!is_custom_method(&d, &segs, 0));
    }

    #[test]
    fn custom_method_under_singleton() {
        let d = doc(json!({
            "/v1/database/backup": {},
            "/v1/database/restore": {}
        }));
        let segs = segments("/v1/database/backup");
        assert!(is_custom_method(&d, &segs, 2));
    }

    #[test]
    fn verb_under_collection_is_not_custom_method() {
        // users has an {id} sibling, so a trailing verb under the bare
        // collection is a naming smell, not a custom method
        let d = doc(json!({
            "/users/create": {},
            "/users/{id}": {}
        }));
        let segs = segments("/users/create");
        assert!(!is_custom_method(&d, &segs, 1));
    }

    #[test]
    fn ownership_pair_counting() {
        assert_eq!(
            ownership_pairs(&["v1", "shelves", "{shelf}", "books", "{book}"]),
            2
        );
        assert_eq!(ownership_pairs(&["v1", "users", "{id}"]), 1);
        assert_eq!(ownership_pairs(&["users"]), 0);
    }

    #[test]
    fn collection_segments_skip_version_and_params() {
        let d = doc(json!({"/v1/users/{id}/orders": {}}));
        let segs = segments("/v1/users/{id}/orders");
        assert_eq!(collection_segment_indices(&d, &segs), vec![1, 3]);
    }

    #[test]
    fn collection_path_detection() {
        let d = doc(json!({
            "/v1/users": {},
            "/v1/users/{id}": {},
            "/models/{id}/train": {}
        }));
        assert!(is_collection_path(&d, "/v1/users"));
        assert!(!is_collection_path(&d, "/v1/users/{id}"));
        assert!(!is_collection_path(&d, "/models/{id}/train"));
    }

    #[test]
    fn first_path_is_document_order() {
        let d = doc(json!({
            "/user": {},
            "/user/{id}": {}
        }));
        assert_eq!(first_path_with_segment(&d, "user").unwrap(), "/user");
        assert!(first_path_with_segment(&d, "orders").is_none());
    }
}
