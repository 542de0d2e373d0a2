//! Command-line interface for codemend.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::fix::{self, generate_fixes, FixApplicator};
use crate::report;
use crate::scan::Scanner;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Automated bug detection and fixing for Python codebases.
///
/// Codemend scans Python source for common bug patterns, security issues,
/// and quality problems, then generates and applies deterministic fixes
/// with backups and unified diffs.
#[derive(Parser)]
#[command(name = "codemend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a file or directory for issues
    Scan(ScanArgs),
    /// Generate fixes for detected issues and apply them
    Fix(FixArgs),
    /// Restore files from their backups
    Restore(RestoreArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the fix command.
#[derive(Parser)]
pub struct FixArgs {
    /// Path to scan and fix (file or directory)
    pub path: PathBuf,

    /// Write fixes to disk (default is a dry-run preview)
    #[arg(long)]
    pub apply: bool,

    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the restore command.
#[derive(Parser)]
pub struct RestoreArgs {
    /// Files to restore from `<path><suffix>` backups
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Backup suffix used when the fixes were applied
    #[arg(long, default_value = ".backup")]
    pub suffix: String,
}

fn load_config(path: &Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}

pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = load_config(&args.config)?;
    let scanner = Scanner::new(config);
    let result = scanner.scan(&args.path)?;

    match args.format.as_str() {
        "json" => println!("{}", report::render_json(&result.issues)?),
        _ => report::write_pretty(
            &args.path.display().to_string(),
            &result.issues,
            result.files_scanned,
        ),
    }

    if result.issues.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

pub fn run_fix(args: &FixArgs) -> anyhow::Result<i32> {
    let config = load_config(&args.config)?;
    let dry_run = !args.apply && !config.fixer.auto_apply_fixes;

    let scanner = Scanner::new(config.clone());
    let result = scanner.scan(&args.path)?;
    if result.issues.is_empty() {
        println!("No issues found.");
        return Ok(EXIT_SUCCESS);
    }

    let fixes = generate_fixes(&result.issues);
    if fixes.is_empty() {
        println!(
            "{} issues found, none have a known automatic fix.",
            result.issues.len()
        );
        return Ok(EXIT_FAILED);
    }

    let mut applicator =
        FixApplicator::new(config.fixer.create_backup, config.fixer.backup_suffix.clone());
    let results = applicator.apply_batch(&fixes, dry_run);

    let mut applied = 0;
    for (fix, apply_result) in fixes.iter().zip(&results) {
        let tag = if apply_result.success {
            if dry_run {
                "would fix".yellow()
            } else {
                "fixed".green()
            }
        } else {
            "skipped".red()
        };
        let location = match fix.issue.line {
            Some(line) => format!("{}:{}", fix.issue.file, line),
            None => fix.issue.file.clone(),
        };
        println!("  {tag:>10} {location} {}", fix.description.dimmed());
        if apply_result.success {
            applied += 1;
            if let Some(diff) = &apply_result.diff {
                for line in diff.lines() {
                    println!("             {line}");
                }
            }
        } else {
            println!("             {}", apply_result.message);
        }
    }

    println!();
    if dry_run {
        println!(
            "{applied} of {} fixes applicable (dry run; pass --apply to write them)",
            fixes.len()
        );
    } else {
        println!("{applied} of {} fixes applied", fixes.len());
    }

    let mut tests_passed = true;
    if !dry_run && applied > 0 && config.validation.run_tests {
        let working_dir = if args.path.is_dir() {
            args.path.clone()
        } else {
            args.path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        println!();
        println!("Running tests: {}", config.validation.test_command);
        let outcome = fix::run_tests(
            &config.validation.test_command,
            &working_dir,
            Duration::from_secs(config.validation.test_timeout_secs),
        )?;
        if outcome.timed_out {
            println!("  {} test run timed out", "failed".red());
            tests_passed = false;
        } else if outcome.success {
            println!("  {} tests pass", "ok".green());
        } else {
            println!(
                "  {} tests exited with {}",
                "failed".red(),
                outcome
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string())
            );
            if !outcome.stderr.is_empty() {
                for line in outcome.stderr.lines() {
                    println!("    {line}");
                }
            }
            tests_passed = false;
        }
    }

    if applied == fixes.len() && tests_passed {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

pub fn run_restore(args: &RestoreArgs) -> anyhow::Result<i32> {
    let applicator = FixApplicator::new(true, args.suffix.clone());
    let paths: Vec<String> = args
        .paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    let results = applicator.restore_backups(Some(&paths));

    let mut failed = 0;
    for result in &results {
        if result.success {
            println!("  {} {}", "restored".green(), result.file);
        } else {
            println!("  {} {}: {}", "failed".red(), result.file, result.message);
            failed += 1;
        }
    }

    if failed == 0 {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}
