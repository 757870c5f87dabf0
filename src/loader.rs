//! Spec loading from files and strings.
//!
//! The engine expects an already dereferenced document; this loader only
//! reads JSON from disk. Directory walking, YAML, and remote refs live with
//! the caller.

use std::path::Path;

use serde_json::Value;

use crate::error::LintError;

/// Load a spec document from a file path.
///
/// # Errors
///
/// Returns `LintError::FileNotFound` if the file doesn't exist,
/// or `LintError::InvalidJson` if the file isn't valid JSON.
pub fn load_spec(path: &Path) -> Result<Value, LintError> {
    if !path.exists() {
        return Err(LintError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LintError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LintError::InvalidJson { source })
}

/// Load a spec document from a JSON string.
///
/// # Errors
///
/// Returns `LintError::InvalidJson` if the string isn't valid JSON.
pub fn load_spec_str(content: &str) -> Result<Value, LintError> {
    serde_json::from_str(content).map_err(|source| LintError::InvalidJson { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_spec_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"openapi": "3.0.3", "paths": {{}}}}"#).unwrap();

        let spec = load_spec(file.path()).unwrap();
        assert_eq!(spec["openapi"], "3.0.3");
    }

    #[test]
    fn load_spec_file_not_found() {
        let result = load_spec(Path::new("/nonexistent/spec.json"));
        assert!(matches!(result, Err(LintError::FileNotFound { .. })));
    }

    #[test]
    fn load_spec_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_spec(file.path());
        assert!(matches!(result, Err(LintError::InvalidJson { .. })));
    }

    #[test]
    fn load_spec_str_preserves_key_order() {
        let spec = load_spec_str(r#"{"paths": {"/b": {}, "/a": {}}}"#).unwrap();
        let keys: Vec<&String> = spec["paths"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["/b", "/a"]);
    }
}
