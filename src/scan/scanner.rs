//! Scan orchestration: file enumeration and per-file detector dispatch.
//!
//! One unreadable or unparseable file never aborts a scan. Read failures
//! surface as a single `scan_error` issue, parse failures as a single
//! `syntax_error` issue, and the remaining files are processed normally.

use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;

use crate::config::Config;
use crate::parser::PythonParser;
use crate::scan::{detect_patterns, detect_quality, detect_security};
use crate::scan::{Issue, IssueKind, Severity};

/// Outcome of scanning a path.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub issues: Vec<Issue>,
    pub files_scanned: usize,
}

/// Scans a file or directory tree and returns every issue found.
pub struct Scanner {
    config: Config,
    parser: PythonParser,
}

impl Scanner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            parser: PythonParser::new(),
        }
    }

    /// Scan `path`, which may be a single file or a directory.
    pub fn scan(&self, path: &Path) -> anyhow::Result<ScanResult> {
        let files = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            self.collect_files(path)?
        } else {
            anyhow::bail!("path does not exist: {}", path.display());
        };

        let mut result = ScanResult::default();
        for file in &files {
            result.issues.extend(self.scan_file(file));
            result.files_scanned += 1;
        }
        Ok(result)
    }

    /// Scan a single file. Failures are reported as issues, never as errors.
    pub fn scan_file(&self, path: &Path) -> Vec<Issue> {
        let display = path.display().to_string();

        let source = match std::fs::read(path) {
            Ok(source) => source,
            Err(err) => {
                return vec![Issue {
                    file: display,
                    line: None,
                    kind: IssueKind::ScanError,
                    message: format!("could not read file: {err}"),
                    severity: Severity::Error,
                }];
            }
        };

        let parsed = match self.parser.parse(path, &source) {
            Ok(parsed) => parsed,
            Err(err) => {
                return vec![Issue {
                    file: display,
                    line: None,
                    kind: IssueKind::ScanError,
                    message: format!("could not parse file: {err}"),
                    severity: Severity::Error,
                }];
            }
        };

        if let Some(detail) = parsed.first_error() {
            // A broken tree would produce nonsense findings, so detectors
            // are skipped for this file.
            return vec![Issue {
                file: display,
                line: Some(detail.line),
                kind: IssueKind::SyntaxError,
                message: format!(
                    "{} at line {}, column {}",
                    detail.message, detail.line, detail.column
                ),
                severity: Severity::Critical,
            }];
        }

        let mut issues = Vec::new();
        issues.extend(detect_patterns(&parsed));
        issues.extend(detect_security(&parsed));
        issues.extend(detect_quality(&parsed));
        issues
    }

    /// Enumerate eligible files under `root` in sorted order.
    fn collect_files(&self, root: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let exclusions = self
            .config
            .exclude_matcher()
            .context("failed to compile exclude patterns")?;
        let max_bytes = self.config.max_file_size_bytes();

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                // Skip hidden directories, but never the walk root itself:
                // a root like "." would otherwise match and skip everything
                if e.depth() > 0
                    && e.file_type().is_dir()
                    && e.file_name().to_string_lossy().starts_with('.')
                {
                    return false;
                }
                true
            })
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();

            let has_extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| {
                    self.config
                        .scanner
                        .file_extensions
                        .iter()
                        .any(|allowed| allowed == ext)
                })
                .unwrap_or(false);
            if !has_extension {
                continue;
            }

            if exclusions.is_match(path) {
                continue;
            }

            if let Ok(metadata) = entry.metadata() {
                if metadata.len() > max_bytes {
                    continue;
                }
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }
}
