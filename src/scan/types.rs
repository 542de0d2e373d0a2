//! Core types for scan findings.

use serde::{Deserialize, Serialize};

/// Severity levels for issues.
///
/// Severity is advisory: it drives reporting and ordering, never control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    High,
    Critical,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            "error" => Ok(Severity::Error),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// The closed set of issue kinds the detectors can emit.
///
/// This is the single dispatch key used by the fix generator and the
/// applicator; adding a kind here means teaching both of those about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SyntaxError,
    ScanError,
    NoneComparison,
    BareExcept,
    MutableDefaultArgument,
    WildcardImport,
    DangerousEval,
    DangerousExec,
    UnsafeDeserialization,
    InsecureModule,
    TooManyArguments,
    MissingDocstring,
    HighComplexity,
    TooManyMethods,
    MagicNumber,
    AssertStatement,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::SyntaxError => "syntax_error",
            IssueKind::ScanError => "scan_error",
            IssueKind::NoneComparison => "none_comparison",
            IssueKind::BareExcept => "bare_except",
            IssueKind::MutableDefaultArgument => "mutable_default_argument",
            IssueKind::WildcardImport => "wildcard_import",
            IssueKind::DangerousEval => "dangerous_eval",
            IssueKind::DangerousExec => "dangerous_exec",
            IssueKind::UnsafeDeserialization => "unsafe_deserialization",
            IssueKind::InsecureModule => "insecure_module",
            IssueKind::TooManyArguments => "too_many_arguments",
            IssueKind::MissingDocstring => "missing_docstring",
            IssueKind::HighComplexity => "high_complexity",
            IssueKind::TooManyMethods => "too_many_methods",
            IssueKind::MagicNumber => "magic_number",
            IssueKind::AssertStatement => "assert_statement",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected finding.
///
/// Issues are created once during a scan and never mutated afterwards.
/// `line` is 1-indexed and absent for file-level findings such as scan errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    pub severity: Severity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_roundtrip() {
        for s in ["info", "warning", "high", "critical", "error"] {
            let sev: Severity = s.parse().unwrap();
            assert_eq!(sev.to_string(), s);
        }
        assert!("bogus".parse::<Severity>().is_err());
    }

    #[test]
    fn test_issue_serializes_with_type_field() {
        let issue = Issue {
            file: "app.py".to_string(),
            line: Some(3),
            kind: IssueKind::NoneComparison,
            message: "use is None".to_string(),
            severity: Severity::Warning,
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "none_comparison");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["line"], 3);
    }

    #[test]
    fn test_file_level_issue_omits_line() {
        let issue = Issue {
            file: "app.py".to_string(),
            line: None,
            kind: IssueKind::ScanError,
            message: "unreadable".to_string(),
            severity: Severity::Error,
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert!(json.get("line").is_none());
    }
}
