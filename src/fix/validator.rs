//! Fix validation: syntax checks on candidate content and external test runs.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::fix::{SyntaxCheck, TestOutcome};
use crate::parser::PythonParser;

/// Check that `code` parses as valid Python.
pub fn validate_syntax(code: &str) -> SyntaxCheck {
    let parser = PythonParser::new();
    let parsed = match parser.parse(Path::new("<candidate>"), code.as_bytes()) {
        Ok(parsed) => parsed,
        Err(err) => {
            return SyntaxCheck {
                valid: false,
                message: format!("could not parse candidate: {err}"),
                line: None,
                column: None,
            };
        }
    };

    match parsed.first_error() {
        None => SyntaxCheck {
            valid: true,
            message: "Syntax is valid".to_string(),
            line: None,
            column: None,
        },
        Some(detail) => SyntaxCheck {
            valid: false,
            message: format!("Syntax error: {} at line {}", detail.message, detail.line),
            line: Some(detail.line),
            column: Some(detail.column),
        },
    }
}

/// Check that a fix does not introduce syntax errors.
///
/// Only the fixed side is parsed; a file that was already broken before the
/// fix is the scanner's problem, not the validator's.
pub fn validate_fix(fixed_code: &str) -> SyntaxCheck {
    let check = validate_syntax(fixed_code);
    if check.valid {
        SyntaxCheck {
            valid: true,
            message: "Fix is valid".to_string(),
            line: None,
            column: None,
        }
    } else {
        SyntaxCheck {
            valid: false,
            message: format!("Fix introduces syntax errors: {}", check.message),
            line: check.line,
            column: check.column,
        }
    }
}

/// Run the configured test command under a wall-clock timeout.
///
/// On timeout the child is killed and `timed_out` is set; partial output from
/// a killed run is not reported.
pub fn run_tests(
    test_command: &str,
    working_dir: &Path,
    timeout: Duration,
) -> anyhow::Result<TestOutcome> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(test_command)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn test command: {test_command}"))?;

    let stdout = child
        .stdout
        .take()
        .context("failed to capture test stdout")?;
    let stderr = child
        .stderr
        .take()
        .context("failed to capture test stderr")?;

    let stdout_acc = Arc::new(Mutex::new(String::new()));
    let stderr_acc = Arc::new(Mutex::new(String::new()));
    let out_thread = spawn_stream_reader(stdout, stdout_acc.clone());
    let err_thread = spawn_stream_reader(stderr, stderr_acc.clone());

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().context("failed to poll test command")? {
            break status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            let _ = out_thread.join();
            let _ = err_thread.join();
            return Ok(TestOutcome {
                success: false,
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                timed_out: true,
            });
        }
        thread::sleep(Duration::from_millis(50));
    };

    let _ = out_thread.join();
    let _ = err_thread.join();

    let stdout = stdout_acc
        .lock()
        .map_err(|_| anyhow::anyhow!("test stdout reader panicked"))?
        .clone();
    let stderr = stderr_acc
        .lock()
        .map_err(|_| anyhow::anyhow!("test stderr reader panicked"))?
        .clone();

    Ok(TestOutcome {
        success: status.success(),
        exit_code: status.code(),
        stdout,
        stderr,
        timed_out: false,
    })
}

fn spawn_stream_reader<R: std::io::Read + Send + 'static>(
    input: R,
    acc: Arc<Mutex<String>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let reader = BufReader::new(input);
        for line in reader.lines().map_while(Result::ok) {
            if let Ok(mut guard) = acc.lock() {
                guard.push_str(&line);
                guard.push('\n');
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_syntax() {
        let check = validate_syntax("def f():\n    return 1\n");
        assert!(check.valid);
        assert_eq!(check.message, "Syntax is valid");
    }

    #[test]
    fn test_invalid_syntax_reports_line() {
        let check = validate_syntax("def f(:\n    pass\n");
        assert!(!check.valid);
        assert!(check.line.is_some());
        assert!(check.message.starts_with("Syntax error:"));
    }

    #[test]
    fn test_validate_fix_messages() {
        assert_eq!(validate_fix("x = 1\n").message, "Fix is valid");
        let bad = validate_fix("if x\n    pass\n");
        assert!(bad.message.starts_with("Fix introduces syntax errors:"));
    }

    #[test]
    fn test_run_tests_success() {
        let outcome = run_tests("echo ok", Path::new("."), Duration::from_secs(10)).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.stdout.trim(), "ok");
        assert!(!outcome.timed_out);
    }

    #[test]
    fn test_run_tests_failure_captures_stderr() {
        let outcome =
            run_tests("echo broken >&2; exit 3", Path::new("."), Duration::from_secs(10)).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stderr.trim(), "broken");
    }

    #[test]
    fn test_run_tests_timeout() {
        let outcome = run_tests("sleep 5", Path::new("."), Duration::from_millis(200)).unwrap();
        assert!(!outcome.success);
        assert!(outcome.timed_out);
        assert!(outcome.exit_code.is_none());
    }
}
