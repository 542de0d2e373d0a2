//! Integration tests for the full scan pipeline.
//!
//! These tests run the scanner against the testdata fixture and verify
//! that each known defect is reported exactly once, in order.

use std::path::PathBuf;

use codemend::scan::{IssueKind, Scanner, Severity};
use codemend::Config;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("buggy.py")
}

fn scan_fixture() -> Vec<codemend::Issue> {
    let scanner = Scanner::new(Config::default());
    let result = scanner.scan(&fixture_path()).expect("scan should succeed");
    result.issues
}

#[test]
fn test_fixture_detections() {
    let issues = scan_fixture();
    let kinds: Vec<IssueKind> = issues.iter().map(|i| i.kind).collect();

    assert!(kinds.contains(&IssueKind::WildcardImport));
    assert!(kinds.contains(&IssueKind::InsecureModule));
    assert!(kinds.contains(&IssueKind::NoneComparison));
    assert!(kinds.contains(&IssueKind::BareExcept));
    assert!(kinds.contains(&IssueKind::UnsafeDeserialization));
    assert!(kinds.contains(&IssueKind::MutableDefaultArgument));
    assert!(kinds.contains(&IssueKind::DangerousEval));
}

#[test]
fn test_fixture_detection_counts() {
    let issues = scan_fixture();
    let count = |kind| issues.iter().filter(|i| i.kind == kind).count();

    assert_eq!(count(IssueKind::NoneComparison), 1);
    assert_eq!(count(IssueKind::BareExcept), 1);
    assert_eq!(count(IssueKind::WildcardImport), 1);
    assert_eq!(count(IssueKind::DangerousEval), 1);
    assert_eq!(count(IssueKind::UnsafeDeserialization), 1);
    assert_eq!(count(IssueKind::MutableDefaultArgument), 1);
    assert_eq!(count(IssueKind::SyntaxError), 0);
}

#[test]
fn test_fixture_lines_and_severities() {
    let issues = scan_fixture();

    let none_cmp = issues
        .iter()
        .find(|i| i.kind == IssueKind::NoneComparison)
        .expect("none comparison reported");
    assert_eq!(none_cmp.line, Some(9));
    assert_eq!(none_cmp.severity, Severity::Warning);

    let eval = issues
        .iter()
        .find(|i| i.kind == IssueKind::DangerousEval)
        .expect("eval reported");
    assert_eq!(eval.line, Some(30));
    assert_eq!(eval.severity, Severity::Critical);

    let loads = issues
        .iter()
        .find(|i| i.kind == IssueKind::UnsafeDeserialization)
        .expect("pickle.loads reported");
    assert_eq!(loads.line, Some(17));
    assert_eq!(loads.severity, Severity::High);
}

#[test]
fn test_detector_registration_order_within_file() {
    let issues = scan_fixture();

    // Pattern findings come before security findings, which come before
    // quality findings, regardless of line numbers.
    let first_security = issues
        .iter()
        .position(|i| i.kind == IssueKind::DangerousEval)
        .unwrap();
    let last_pattern = issues
        .iter()
        .rposition(|i| i.kind == IssueKind::BareExcept)
        .unwrap();
    assert!(last_pattern < first_security);
}

#[test]
fn test_json_report_round_trips() {
    let issues = scan_fixture();
    let json = codemend::report::render_json(&issues).expect("report should render");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(value["total_issues"], issues.len());
    let rendered = value["issues"].as_array().expect("issues array");
    assert_eq!(rendered.len(), issues.len());
    assert!(rendered.iter().all(|i| i["file"].is_string()));
}
