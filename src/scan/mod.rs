//! Static analysis of Python source files.
//!
//! Detectors are free functions over a [`crate::parser::ParsedFile`]; the
//! [`Scanner`] enumerates files and runs every detector against each one.

mod pattern;
mod quality;
mod scanner;
mod security;
mod types;

pub use pattern::detect_patterns;
pub use quality::detect_quality;
pub use scanner::{ScanResult, Scanner};
pub use security::detect_security;
pub use types::{Issue, IssueKind, Severity};
