//! Codemend - automated bug detection and fixing for Python codebases.
//!
//! Codemend scans Python source with tree-sitter, detects common bug
//! patterns, security issues, and quality problems, then generates
//! deterministic fixes and applies them with validation, backups, and
//! unified diffs.
//!
//! # Architecture
//!
//! Data flows one direction: files are parsed, detectors emit issues,
//! the generator turns fixable issues into fixes, and the applicator
//! validates and writes them:
//!
//! - `parser`: tree-sitter Python parsing and syntax-error location
//! - `scan`: detectors (pattern, security, quality) and the scan orchestrator
//! - `fix`: fix generation, syntax validation, test running, application
//! - `config`: YAML/JSON configuration with serde defaults
//! - `report`: output formatting (pretty, JSON)

pub mod cli;
pub mod config;
pub mod fix;
pub mod parser;
pub mod report;
pub mod scan;

pub use config::Config;
pub use fix::{Fix, FixApplicator, FixKind};
pub use parser::{ParsedFile, PythonParser};
pub use scan::{Issue, IssueKind, ScanResult, Scanner, Severity};
