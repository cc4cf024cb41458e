mod common;

use common::{TempFile, fixture, fixtures_dir, run_cli};
use insta::assert_snapshot;

const BUF_READ: &str = "implementors/std/io/trait.BufRead.js";
const TIME_ERROR: &str = "time/error/sidebar-items.js";

const EMPTY_TYPES: &str = r#"(function() {var implementors = {};
implementors["a"] = [{"text":"impl A","synthetic":false,"types":[]}];
if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()"#;

#[test]
fn help_shows_usage() {
    let (stdout, stderr, success) = run_cli(&["--help"]);
    assert!(success, "Help should succeed");
    assert!(stderr.is_empty());
    assert!(stdout.contains("Usage: docindex"));
    for command in ["show", "check", "json", "emit", "impls"] {
        assert!(stdout.contains(command), "help should list {command}");
    }
}

#[test]
fn missing_command_fails() {
    let (stdout, stderr, success) = run_cli(&[]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert_snapshot!(stderr, @"Missing command, see --help");
}

#[test]
fn invalid_color_fails() {
    let (_, stderr, success) = run_cli(&["--color", "sometimes", "show", "x.js"]);
    assert!(!success);
    assert!(stderr.contains("invalid value 'sometimes' for '--color <COLOR>'"));
}

#[test]
fn empty_source_fails() {
    let (_, stderr, success) = run_cli(&["show", ""]);
    assert!(!success);
    assert!(stderr.contains("Source cannot be empty"));
}

#[test]
fn show_implementors() {
    let (stdout, stderr, success) = run_cli(&["show", &fixture(BUF_READ)]);
    assert!(success, "{stderr}");
    assert_snapshot!(stdout, @r"
    bytes
      • bytes::buf::reader::Reader
    futures_util
      • futures_util::io::allow_std::AllowStdIo
    protobuf
      • protobuf::coded_input_stream::CodedInputStream
    3 implementors in 3 crates
    ");
}

#[test]
fn show_sidebar() {
    let (stdout, stderr, success) = run_cli(&["show", &fixture(TIME_ERROR)]);
    assert!(success, "{stderr}");
    assert_snapshot!(stdout, @r"
    enum
      Error  A unified error type for anything returned by a method in the time crate.
    struct
      ComponentRange    An error type indicating that a component provided to a method was out of range, causing a failure.
      ConversionRange   An error type indicating that a conversion failed because the target type could not store the initial value.
      DifferentVariant  An error type indicating that a TryFrom call failed because the original value was of a different variant.
      InvalidVariant    An error type indicating that a FromStr call failed because the value was not a valid variant.
    ");
}

#[test]
fn show_unrecognized_script() {
    let file = TempFile::new("main.js", "window.main = function() {};");
    let (_, stderr, success) = run_cli(&["show", &file.path()]);
    assert!(!success);
    assert_snapshot!(stderr, @"Failed to parse [TEMP]/main.js: not a rustdoc implementors or sidebar-items script");
}

#[test]
fn check_tree() {
    let dir = fixtures_dir().display().to_string();
    let (stdout, stderr, success) = run_cli(&["check", &dir]);
    assert!(success, "{stderr}");
    assert_snapshot!(stdout, @r"
    ok implementors/core/ops/bit/trait.BitAndAssign.js
    ok implementors/std/io/trait.BufRead.js
    ok time/error/sidebar-items.js
    3 files checked, 0 errors, 0 warnings
    ");
}

#[test]
fn check_reports_empty_types() {
    let file = TempFile::new("trait.Empty.js", EMPTY_TYPES);
    let (stdout, stderr, success) = run_cli(&["check", &file.path()]);
    assert!(!success);
    assert_snapshot!(stdout, @r"
    FAIL [TEMP]/trait.Empty.js
      error: a[0]: entry has no implementing types
    1 files checked, 1 errors, 0 warnings
    ");
    assert_snapshot!(stderr, @"check failed");
}

#[test]
fn failing_check_keeps_json_report_intact() {
    let file = TempFile::new("trait.EmptyJson.js", EMPTY_TYPES);
    let (stdout, stderr, success) = run_cli(&["check", "--json", &file.path()]);
    assert!(!success);
    assert_snapshot!(stderr, @"check failed");

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report[0]["path"], "[TEMP]/trait.EmptyJson.js");
    assert_eq!(report[0]["kind"], "implementors");
    assert_eq!(report[0]["findings"][0]["severity"], "error");
    assert_eq!(report[0]["findings"][0]["message"], "entry has no implementing types");
}

#[test]
fn check_json_report() {
    let (stdout, stderr, success) = run_cli(&["check", "--json", &fixture(TIME_ERROR)]);
    assert!(success, "{stderr}");
    assert_snapshot!(stdout, @r#"
    [
      {
        "path": "[FIXTURES]/time/error/sidebar-items.js",
        "kind": "sidebar",
        "findings": [],
        "error": null
      }
    ]
    "#);
}

#[test]
fn impls_reverse_lookup() {
    let dir = fixtures_dir().display().to_string();
    let (stdout, stderr, success) = run_cli(&["impls", &dir, "subtle::Choice"]);
    assert!(success, "{stderr}");
    assert_snapshot!(stdout, @r"
    subtle::Choice implements:
      • core::ops::bit::BitAndAssign  (subtle)
    ");
}

#[test]
fn impls_unknown_type() {
    let dir = fixtures_dir().display().to_string();
    let (stdout, _, success) = run_cli(&["impls", &dir, "no::Such"]);
    assert!(success);
    assert_snapshot!(stdout, @"No documented trait implementations found for no::Such");
}

#[test]
fn json_then_emit_reproduces_script() {
    let (json, stderr, success) = run_cli(&["json", &fixture(BUF_READ)]);
    assert!(success, "{stderr}");
    assert!(json.starts_with("{\n  \"kind\": \"implementors\""));

    let file = TempFile::new("buf_read.json", &json);
    let (script, stderr, success) = run_cli(&["emit", &file.path()]);
    assert!(success, "{stderr}");
    let original = std::fs::read_to_string(fixture(BUF_READ)).unwrap();
    assert_eq!(script, original + "\n");
}

#[test]
fn emit_bare_sidebar_table() {
    let file = TempFile::new("sidebar.json", r#"{"fn":[["parse","Parses `input`."]],"macro":["log"]}"#);
    let (stdout, stderr, success) = run_cli(&["emit", "--kind", "sidebar", &file.path()]);
    assert!(success, "{stderr}");
    assert_snapshot!(stdout, @r#"initSidebarItems({"fn":[["parse","Parses `input`."]],"macro":[["log",""]]});"#);
}
