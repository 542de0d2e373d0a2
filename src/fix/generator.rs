//! Deterministic fix generation.
//!
//! Only a small, fixed set of issue kinds has a known remediation. Every
//! generated fix is marked non-automated; determining the exact replacement
//! or refactor still needs surrounding context.

use crate::fix::{Fix, FixKind};
use crate::scan::{Issue, IssueKind};

/// Generate a fix for `issue`, or `None` when no remediation is known.
pub fn generate_fix(issue: &Issue) -> Option<Fix> {
    match issue.kind {
        IssueKind::NoneComparison => Some(Fix {
            issue: issue.clone(),
            kind: FixKind::Replace,
            description: "Replace == None with is None".to_string(),
            suggestion: "Replace \"== None\" with \"is None\" or \"!= None\" with \"is not None\""
                .to_string(),
            changes: Vec::new(),
            automated: false,
        }),
        IssueKind::BareExcept => Some(Fix {
            issue: issue.clone(),
            kind: FixKind::Replace,
            description: "Specify exception type in except clause".to_string(),
            suggestion: "Replace \"except:\" with \"except Exception:\" or more specific exception"
                .to_string(),
            changes: Vec::new(),
            automated: false,
        }),
        IssueKind::DangerousEval => Some(Fix {
            issue: issue.clone(),
            kind: FixKind::Refactor,
            description: "Remove eval() and use safer alternative".to_string(),
            suggestion: "Consider using ast.literal_eval() for literals or json.loads() for JSON"
                .to_string(),
            changes: Vec::new(),
            automated: false,
        }),
        IssueKind::WildcardImport => Some(Fix {
            issue: issue.clone(),
            kind: FixKind::Replace,
            description: "Replace wildcard import with explicit imports".to_string(),
            suggestion: "Import only the specific names you need".to_string(),
            changes: Vec::new(),
            automated: false,
        }),
        _ => None,
    }
}

/// Generate fixes for a batch of issues, skipping those with no remediation.
pub fn generate_fixes(issues: &[Issue]) -> Vec<Fix> {
    issues.iter().filter_map(generate_fix).collect()
}
