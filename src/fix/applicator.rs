//! Applies fixes to files: candidate computation, validation, backup,
//! atomic write, and restore-from-backup.

use std::fs;
use std::io::Write;
use std::path::Path;

use similar::TextDiff;
use tempfile::NamedTempFile;

use crate::fix::validator;
use crate::fix::{ApplyResult, Fix, RestoreResult};
use crate::scan::IssueKind;

/// Applies fixes and keeps a history of what was written.
///
/// The history is the only mutable state retained across calls; one
/// applicator instance must not be shared across concurrent batches.
pub struct FixApplicator {
    create_backup: bool,
    backup_suffix: String,
    applied: Vec<Fix>,
}

impl FixApplicator {
    pub fn new(create_backup: bool, backup_suffix: impl Into<String>) -> Self {
        Self {
            create_backup,
            backup_suffix: backup_suffix.into(),
            applied: Vec::new(),
        }
    }

    /// Apply a single fix. With `dry_run` the file is left untouched and the
    /// result carries the diff that would have been written.
    pub fn apply(&mut self, fix: &Fix, dry_run: bool) -> ApplyResult {
        let file = fix.issue.file.clone();
        let path = Path::new(&file);
        if !path.exists() {
            return ApplyResult {
                dry_run,
                ..ApplyResult::failure(format!("File not found: {file}"))
            };
        }

        let original = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                return ApplyResult {
                    dry_run,
                    ..ApplyResult::failure(format!("Error applying fix: {err}"))
                };
            }
        };

        let candidate = match apply_fix_to_content(fix, &original) {
            Some(candidate) => candidate,
            None => {
                return ApplyResult {
                    dry_run,
                    ..ApplyResult::failure("Could not apply fix to content")
                };
            }
        };

        let validation = validator::validate_syntax(&candidate);
        if !validation.valid {
            return ApplyResult {
                success: false,
                message: format!("Fix introduces syntax errors: {}", validation.message),
                file: None,
                diff: None,
                dry_run,
                validation: Some(validation),
            };
        }

        if !dry_run {
            if self.create_backup {
                let backup = format!("{file}{}", self.backup_suffix);
                if let Err(err) = fs::copy(path, &backup) {
                    // An unwritable backup must block the write itself.
                    return ApplyResult {
                        dry_run,
                        ..ApplyResult::failure(format!("Error creating backup: {err}"))
                    };
                }
            }

            if let Err(err) = write_atomic(path, &candidate) {
                return ApplyResult {
                    dry_run,
                    ..ApplyResult::failure(format!("Error applying fix: {err}"))
                };
            }

            self.applied.push(fix.clone());
        }

        let diff = TextDiff::from_lines(&original, &candidate)
            .unified_diff()
            .header(&format!("a/{file}"), &format!("b/{file}"))
            .to_string();

        ApplyResult {
            success: true,
            message: "Fix applied successfully".to_string(),
            file: Some(file),
            diff: Some(diff),
            dry_run,
            validation: None,
        }
    }

    /// Apply every fix in order. One failure never blocks the rest; the
    /// result list matches the input in length and order.
    pub fn apply_batch(&mut self, fixes: &[Fix], dry_run: bool) -> Vec<ApplyResult> {
        fixes.iter().map(|fix| self.apply(fix, dry_run)).collect()
    }

    /// Restore files from backup. `paths` defaults to every file in the
    /// applied-fix history; a missing backup fails that path only.
    pub fn restore_backups(&self, paths: Option<&[String]>) -> Vec<RestoreResult> {
        let from_history: Vec<String>;
        let paths = match paths {
            Some(paths) => paths,
            None => {
                from_history = self
                    .applied
                    .iter()
                    .map(|fix| fix.issue.file.clone())
                    .collect();
                &from_history
            }
        };

        let mut results = Vec::new();
        for file in paths {
            let backup = format!("{file}{}", self.backup_suffix);
            if !Path::new(&backup).exists() {
                results.push(RestoreResult {
                    success: false,
                    file: file.clone(),
                    message: format!("No backup found: {backup}"),
                });
                continue;
            }
            match fs::copy(&backup, file) {
                Ok(_) => results.push(RestoreResult {
                    success: true,
                    file: file.clone(),
                    message: "File restored from backup".to_string(),
                }),
                Err(err) => results.push(RestoreResult {
                    success: false,
                    file: file.clone(),
                    message: format!("Error restoring backup: {err}"),
                }),
            }
        }
        results
    }

    /// Fixes successfully written so far, in application order.
    pub fn applied_fixes(&self) -> &[Fix] {
        &self.applied
    }
}

/// Compute candidate content for `fix`, or `None` when the fix cannot be
/// applied mechanically.
fn apply_fix_to_content(fix: &Fix, content: &str) -> Option<String> {
    if !fix.changes.is_empty() {
        return apply_line_changes(fix, content);
    }
    apply_simple_fix(fix, content)
}

/// Apply explicit line edits, highest line first so earlier replacements
/// never shift a pending index.
fn apply_line_changes(fix: &Fix, content: &str) -> Option<String> {
    let mut lines = split_keep_ends(content);

    let mut changes: Vec<_> = fix.changes.iter().collect();
    changes.sort_by(|a, b| b.line_number.cmp(&a.line_number));

    for change in changes {
        if change.line_number < 1 || change.line_number > lines.len() {
            return None;
        }
        lines[change.line_number - 1] = with_newline(&change.new_code);
    }

    Some(lines.concat())
}

/// Single-line remediation keyed on the issue kind.
fn apply_simple_fix(fix: &Fix, content: &str) -> Option<String> {
    let line_number = fix.issue.line?;
    let mut lines = split_keep_ends(content);
    if line_number < 1 || line_number > lines.len() {
        return None;
    }
    let idx = line_number - 1;
    let original_line = lines[idx].clone();

    match fix.issue.kind {
        IssueKind::NoneComparison => {
            lines[idx] = original_line
                .replace("== None", "is None")
                .replace("!= None", "is not None");
            Some(lines.concat())
        }
        IssueKind::BareExcept => {
            if original_line.contains("except:") {
                lines[idx] = original_line.replace("except:", "except Exception:");
                Some(lines.concat())
            } else {
                None
            }
        }
        // Rewriting a wildcard import needs usage analysis this applicator
        // does not have.
        IssueKind::WildcardImport => None,
        _ => {
            if !fix.suggestion.is_empty() && fix.suggestion.lines().count() == 1 {
                lines[idx] = with_newline(&fix.suggestion);
                Some(lines.concat())
            } else {
                None
            }
        }
    }
}

/// Write `content` via a temporary file in the target's directory, then
/// persist over the original in one rename.
fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}

fn split_keep_ends(content: &str) -> Vec<String> {
    content
        .split_inclusive('\n')
        .map(|line| line.to_string())
        .collect()
}

fn with_newline(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{line}\n")
    }
}
