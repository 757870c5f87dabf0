//! CLI integration tests for the aip-lint binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("aip-lint"))
}

// Helper to create a temp spec file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const CLEAN_SPEC: &str = r#"{
    "info": {"title": "Library", "version": "1.0.0", "description": "Books"},
    "paths": {
        "/users": {"get": {
            "operationId": "listUsers",
            "parameters": [
                {"name": "page_size", "in": "query",
                 "schema": {"type": "integer", "minimum": 1, "maximum": 100}},
                {"name": "page_token", "in": "query", "schema": {"type": "string"}}
            ],
            "responses": {"200": {}, "default": {}}
        }}
    }
}"#;

const SINGULAR_SPEC: &str = r#"{
    "info": {"title": "Library", "version": "1.0.0", "description": "Books"},
    "paths": {
        "/user": {"get": {"operationId": "getUser",
                          "responses": {"200": {}, "default": {}}}},
        "/user/{id}": {"get": {"operationId": "getUserById",
                               "responses": {"200": {}, "default": {}}}}
    }
}"#;

const ERROR_SPEC: &str = r#"{
    "info": {"title": "Library", "version": "1.0.0", "description": "Books"},
    "paths": {
        "/users": {"get": {
            "operationId": "listUsers",
            "requestBody": {"content": {}},
            "parameters": [
                {"name": "page_size", "in": "query",
                 "schema": {"type": "integer", "minimum": 1, "maximum": 100}}
            ],
            "responses": {"200": {}, "default": {}}
        }}
    }
}"#;

mod review_command {
    use super::*;

    #[test]
    fn clean_spec_exits_zero() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", CLEAN_SPEC);

        cmd()
            .args(["review", spec.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("no findings"));
    }

    #[test]
    fn warnings_alone_exit_zero() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", SINGULAR_SPEC);

        cmd()
            .args(["review", spec.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("aip122/plural-resources"));
    }

    #[test]
    fn strict_turns_warnings_into_failure() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", SINGULAR_SPEC);

        cmd()
            .args(["review", spec.to_str().unwrap(), "--strict"])
            .assert()
            .code(1);
    }

    #[test]
    fn error_findings_exit_one() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", ERROR_SPEC);

        cmd()
            .args(["review", spec.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("aip131/get-no-body"));
    }

    #[test]
    fn json_format_emits_the_result_document() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", SINGULAR_SPEC);

        cmd()
            .args(["review", spec.to_str().unwrap(), "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""ruleId": "aip122/plural-resources""#))
            .stdout(predicate::str::contains(r#""summary""#));
    }

    #[test]
    fn skip_rule_suppresses_findings() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", SINGULAR_SPEC);

        cmd()
            .args([
                "review",
                spec.to_str().unwrap(),
                "--skip-rule",
                "aip122/plural-resources",
            ])
            .assert()
            .stdout(predicate::str::contains("aip122/plural-resources").not());
    }

    #[test]
    fn category_filter_limits_output() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", ERROR_SPEC);

        // Only naming rules run, so the GET-body error never surfaces.
        cmd()
            .args(["review", spec.to_str().unwrap(), "--category", "naming"])
            .assert()
            .success()
            .stdout(predicate::str::contains("aip131/get-no-body").not());
    }

    #[test]
    fn missing_file_exits_three() {
        cmd()
            .args(["review", "/nonexistent/spec.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json_exits_two() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", "{ not json");

        cmd()
            .args(["review", spec.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }
}

mod fix_command {
    use super::*;

    #[test]
    fn fix_pluralizes_paths_on_stdout() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", SINGULAR_SPEC);

        cmd()
            .args(["fix", spec.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""/users""#))
            .stderr(predicate::str::contains("fixes applied"));
    }

    #[test]
    fn fix_with_output_file() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", SINGULAR_SPEC);
        let out = dir.path().join("fixed.json");

        cmd()
            .args([
                "fix",
                spec.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
            ])
            .assert()
            .success();

        let fixed = fs::read_to_string(&out).unwrap();
        assert!(fixed.contains(r#""/users""#));
        assert!(fixed.contains(r#""/users/{id}""#));
    }

    #[test]
    fn dry_run_leaves_document_unchanged() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", SINGULAR_SPEC);

        cmd()
            .args(["fix", spec.to_str().unwrap(), "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""/user""#))
            .stdout(predicate::str::contains(r#""/users""#).not())
            .stderr(predicate::str::contains("[dry run]"));
    }

    #[test]
    fn pretty_prints_with_indentation() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", CLEAN_SPEC);

        cmd()
            .args(["fix", spec.to_str().unwrap(), "--pretty"])
            .assert()
            .success()
            .stdout(predicate::str::contains("{\n"));
    }
}

mod rules_command {
    use super::*;

    #[test]
    fn lists_the_full_catalog() {
        cmd()
            .args(["rules"])
            .assert()
            .success()
            .stdout(predicate::str::contains("aip122/plural-resources"))
            .stdout(predicate::str::contains("aip158/list-paginated"))
            .stdout(predicate::str::contains("aip192/info-metadata"));
    }

    #[test]
    fn category_filter_limits_catalog() {
        cmd()
            .args(["rules", "--category", "pagination"])
            .assert()
            .success()
            .stdout(predicate::str::contains("aip158/list-paginated"))
            .stdout(predicate::str::contains("aip122/plural-resources").not());
    }

    #[test]
    fn unknown_category_is_an_error() {
        cmd()
            .args(["rules", "--category", "bogus"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown category"));
    }
}
