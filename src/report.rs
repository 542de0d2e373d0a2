//! Output formatting for scan results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use std::collections::BTreeMap;

use colored::*;
use serde::Serialize;

use crate::scan::{Issue, Severity};

/// JSON report structure.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub total_issues: usize,
    pub issues_by_severity: BTreeMap<&'static str, usize>,
    pub issues: &'a [Issue],
}

/// Render issues as a JSON report string.
pub fn render_json(issues: &[Issue]) -> anyhow::Result<String> {
    let report = JsonReport {
        total_issues: issues.len(),
        issues_by_severity: count_by_severity(issues),
        issues,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write a human-readable report to stdout.
pub fn write_pretty(path: &str, issues: &[Issue], files_scanned: usize) {
    println!();
    print!("  ");
    print!("{}", "codemend".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{path}");
    print!("  {}", "Files:    ".dimmed());
    println!("{files_scanned}");
    println!();

    if issues.is_empty() {
        println!("  {} no issues found", "OK".green().bold());
        println!();
        return;
    }

    println!("  {} ({}):", "Issues".bold(), issues.len());
    println!();
    for issue in issues {
        write_severity_tag(issue.severity);
        print!("   ");
        print!("{:<24}", issue.kind.as_str().dimmed());
        print!("{}", issue.file.blue());
        if let Some(line) = issue.line {
            print!("{}", format!(":{line}").dimmed());
        }
        println!();
        println!("            {}", issue.message);
        println!();
    }

    println!("  {}", "By severity:".bold());
    for (severity, count) in count_by_severity(issues) {
        println!("    {severity:<10} {count}");
    }
    println!();
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Critical => print!("    {} ", "CRIT ".red().bold()),
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::High => print!("    {} ", "HIGH ".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn count_by_severity(issues: &[Issue]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for issue in issues {
        *counts.entry(issue.severity.as_str()).or_insert(0) += 1;
    }
    counts
}
