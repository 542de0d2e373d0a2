//! Data model for generated fixes and their application results.

use serde::{Deserialize, Serialize};

use crate::scan::Issue;

/// Provenance and nature of a fix.
///
/// The `ai_*` variants exist so fixes produced by an external collaborator
/// share one schema with the deterministic generator; the applicator treats
/// both sources uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    Replace,
    Refactor,
    AiGenerated,
    AiError,
    AiResponse,
}

impl FixKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixKind::Replace => "replace",
            FixKind::Refactor => "refactor",
            FixKind::AiGenerated => "ai_generated",
            FixKind::AiError => "ai_error",
            FixKind::AiResponse => "ai_response",
        }
    }
}

impl std::fmt::Display for FixKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A whole-line replacement at a 1-indexed line number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineChange {
    pub line_number: usize,
    pub old_code: String,
    pub new_code: String,
}

/// A proposed remediation for one issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fix {
    pub issue: Issue,
    #[serde(rename = "fix_type")]
    pub kind: FixKind,
    pub description: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<LineChange>,
    pub automated: bool,
}

/// Result of attempting to apply one fix.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<SyntaxCheck>,
}

impl ApplyResult {
    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            file: None,
            diff: None,
            dry_run: false,
            validation: None,
        }
    }
}

/// Outcome of a syntax validation pass over candidate content.
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxCheck {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

/// Outcome of running the external test command.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

/// Result of restoring one file from its backup.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    pub success: bool,
    pub file: String,
    pub message: String,
}
