//! Typed pointers into a spec document.
//!
//! A [`Pointer`] is a parsed sequence of typed segments rather than an opaque
//! string re-split at every use. Segments distinguish mapping keys from
//! sequence indices; resolution checks the container shape at each step so
//! "does this path still exist" is an explicit, testable question before any
//! mutation happens.
//!
//! The textual form follows JSON Pointer conventions: segments joined by `/`,
//! with `~1` escaping `/` and `~0` escaping `~` inside a key.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One step of a pointer: a mapping key or a sequence index.
///
/// A segment of digits parses as [`Segment::Index`]; when it lands on an
/// object during resolution it falls back to its string form, so numeric
/// mapping keys such as `"200"` status codes still address correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn escaped(&self) -> String {
        match self {
            Segment::Key(k) => k.replace('~', "~0").replace('/', "~1"),
            Segment::Index(i) => i.to_string(),
        }
    }

    /// The segment as a mapping key. Indices render as decimal strings.
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(k) => k.clone(),
            Segment::Index(i) => i.to_string(),
        }
    }
}

/// A parsed path into the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pointer {
    segments: Vec<Segment>,
}

impl Pointer {
    /// The root pointer (addresses the document itself).
    pub fn root() -> Self {
        Pointer::default()
    }

    /// Parse a pointer from its textual form.
    ///
    /// Accepts `/paths/~1users/get` style strings; a leading `#` (fragment
    /// prefix) and leading `/` are tolerated, matching how `$ref` fragments
    /// are written.
    pub fn parse(s: &str) -> Self {
        let path = s.trim_start_matches('#').trim_start_matches('/');
        if path.is_empty() {
            return Pointer::root();
        }

        let segments = path
            .split('/')
            .map(|part| {
                let key = part.replace("~1", "/").replace("~0", "~");
                // All-digit tokens address sequence positions; objects with
                // numeric keys are handled by the resolution fallback.
                // Leading zeros stay keys so "01" round-trips literally.
                match key.parse::<usize>() {
                    Ok(i) if key == "0" || !key.starts_with('0') => Segment::Index(i),
                    _ => Segment::Key(key),
                }
            })
            .collect();

        Pointer { segments }
    }

    /// Build a pointer from mapping keys only.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Pointer {
            segments: keys.into_iter().map(|k| Segment::Key(k.into())).collect(),
        }
    }

    /// Extend this pointer with one more key.
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(k.into()));
        self
    }

    /// Extend this pointer with one more index.
    pub fn index(mut self, i: usize) -> Self {
        self.segments.push(Segment::Index(i));
        self
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The final segment, if any.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Split into (parent pointer, final segment). Returns `None` at the root.
    pub fn split_last(&self) -> Option<(Pointer, &Segment)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            Pointer {
                segments: parent.to_vec(),
            },
            last,
        ))
    }

    /// Resolve against a document, returning the addressed value.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = step(current, segment)?;
        }
        Some(current)
    }

    /// Resolve against a document, returning a mutable reference.
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = root;
        for segment in &self.segments {
            current = step_mut(current, segment)?;
        }
        Some(current)
    }
}

fn step<'a>(value: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), Segment::Key(k)) => map.get(k),
        (Value::Object(map), Segment::Index(i)) => map.get(&i.to_string()),
        (Value::Array(arr), Segment::Index(i)) => arr.get(*i),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (value, segment) {
        (Value::Object(map), Segment::Key(k)) => map.get_mut(k),
        (Value::Object(map), Segment::Index(i)) => map.get_mut(&i.to_string()),
        (Value::Array(arr), Segment::Index(i)) => arr.get_mut(*i),
        _ => None,
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment.escaped())?;
        }
        Ok(())
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Pointer::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_simple_keys() {
        let p = Pointer::parse("/paths/get");
        assert_eq!(
            p.segments(),
            &[Segment::Key("paths".into()), Segment::Key("get".into())]
        );
    }

    #[test]
    fn parse_escaped_slash() {
        let p = Pointer::parse("/paths/~1users~1{id}");
        assert_eq!(
            p.segments(),
            &[
                Segment::Key("paths".into()),
                Segment::Key("/users/{id}".into())
            ]
        );
    }

    #[test]
    fn parse_index_segments() {
        let p = Pointer::parse("/parameters/0/name");
        assert_eq!(
            p.segments(),
            &[
                Segment::Key("parameters".into()),
                Segment::Index(0),
                Segment::Key("name".into())
            ]
        );
    }

    #[test]
    fn parse_root_forms() {
        assert!(Pointer::parse("").is_root());
        assert!(Pointer::parse("/").is_root());
        assert!(Pointer::parse("#").is_root());
    }

    #[test]
    fn resolve_nested() {
        let doc = json!({"paths": {"/users": {"get": {"operationId": "listUsers"}}}});
        let p = Pointer::parse("/paths/~1users/get/operationId");
        assert_eq!(p.resolve(&doc), Some(&json!("listUsers")));
    }

    #[test]
    fn resolve_array_index() {
        let doc = json!({"parameters": [{"name": "page_size"}]});
        let p = Pointer::parse("/parameters/0/name");
        assert_eq!(p.resolve(&doc), Some(&json!("page_size")));
    }

    #[test]
    fn numeric_key_falls_back_to_object() {
        let doc = json!({"responses": {"200": {"description": "OK"}}});
        let p = Pointer::parse("/responses/200/description");
        assert_eq!(p.resolve(&doc), Some(&json!("OK")));
    }

    #[test]
    fn resolve_missing_is_none() {
        let doc = json!({"paths": {}});
        assert!(Pointer::parse("/paths/~1users").resolve(&doc).is_none());
    }

    #[test]
    fn resolve_mut_allows_edit() {
        let mut doc = json!({"info": {"title": "old"}});
        *Pointer::parse("/info/title").resolve_mut(&mut doc).unwrap() = json!("new");
        assert_eq!(doc["info"]["title"], "new");
    }

    #[test]
    fn display_round_trips() {
        for s in ["/paths/~1users~1{id}/get", "/parameters/0/name", "/"] {
            let p = Pointer::parse(s);
            assert_eq!(Pointer::parse(&p.to_string()), p);
        }
    }

    #[test]
    fn split_last_gives_parent() {
        let p = Pointer::parse("/paths/~1users");
        let (parent, last) = p.split_last().unwrap();
        assert_eq!(parent, Pointer::parse("/paths"));
        assert_eq!(last, &Segment::Key("/users".into()));
        assert!(Pointer::root().split_last().is_none());
    }

    #[test]
    fn serde_as_string() {
        let p = Pointer::parse("/paths/~1users/get");
        let s = serde_json::to_string(&p).unwrap();
        assert_eq!(s, "\"/paths/~1users/get\"");
        let back: Pointer = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }
}
