//! Detection of code-quality issues.
//!
//! The walk threads two explicit stacks through the recursion: a stack of
//! per-function frames carrying the complexity counter, and a stack of
//! ancestor nodes for context-sensitive checks. Nothing is mutated on the
//! tree itself, so the same tree can be walked by other detectors freely.

use tree_sitter::Node;

use crate::parser::ParsedFile;

use super::{Issue, IssueKind, Severity};

/// Maximum recommended formal parameter count.
const MAX_ARGUMENTS: usize = 7;
/// Cyclomatic complexity ceiling per function.
const MAX_COMPLEXITY: u32 = 10;
/// Method count ceiling per class body.
const MAX_METHODS: usize = 20;
/// Numeric literals that are never magic.
const NUMBER_WHITELIST: &[f64] = &[0.0, 1.0, -1.0, 2.0, 10.0, 100.0, 1000.0];

/// Per-function traversal frame.
///
/// Pushed on entering a function definition, popped on leaving; constructs
/// inside the function increment the top frame only, so sibling and nested
/// functions never bleed into each other.
struct FunctionFrame {
    name: String,
    line: usize,
    complexity: u32,
}

/// Walk the tree and report quality issues for one file.
pub fn detect_quality(parsed: &ParsedFile) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut frames: Vec<FunctionFrame> = Vec::new();
    let mut ancestors: Vec<Node> = Vec::new();
    visit(
        parsed.tree.root_node(),
        parsed,
        &mut frames,
        &mut ancestors,
        &mut issues,
    );
    issues
}

fn visit<'a>(
    node: Node<'a>,
    parsed: &ParsedFile,
    frames: &mut Vec<FunctionFrame>,
    ancestors: &mut Vec<Node<'a>>,
    issues: &mut Vec<Issue>,
) {
    let entering_function = node.kind() == "function_definition";

    match node.kind() {
        "function_definition" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| parsed.node_text(n).to_string())
                .unwrap_or_default();
            let line = node.start_position().row + 1;

            check_argument_count(node, parsed, &name, line, issues);
            check_docstring(node, parsed, &name, line, "function", issues);

            frames.push(FunctionFrame {
                name,
                line,
                complexity: 1,
            });
        }
        "class_definition" => check_class(node, parsed, issues),
        "if_statement" | "elif_clause" | "for_statement" | "while_statement"
        | "except_clause" | "with_statement" => {
            if let Some(frame) = frames.last_mut() {
                frame.complexity += 1;
            }
        }
        "assert_statement" => issues.push(Issue {
            file: parsed.path.clone(),
            line: Some(node.start_position().row + 1),
            kind: IssueKind::AssertStatement,
            message: "Using assert in production code (can be disabled with python -O)"
                .to_string(),
            severity: Severity::Info,
        }),
        "integer" | "float" => check_magic_number(node, parsed, ancestors, issues),
        _ => {}
    }

    ancestors.push(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, parsed, frames, ancestors, issues);
    }
    ancestors.pop();

    if entering_function {
        // restore the caller's frame; the popped counter belongs to this
        // function alone
        if let Some(frame) = frames.pop() {
            if frame.complexity > MAX_COMPLEXITY {
                issues.push(Issue {
                    file: parsed.path.clone(),
                    line: Some(frame.line),
                    kind: IssueKind::HighComplexity,
                    message: format!(
                        "Function \"{}\" has high cyclomatic complexity ({})",
                        frame.name, frame.complexity
                    ),
                    severity: Severity::Warning,
                });
            }
        }
    }
}

fn check_argument_count(
    node: Node,
    parsed: &ParsedFile,
    name: &str,
    line: usize,
    issues: &mut Vec<Issue>,
) {
    let params = match node.child_by_field_name("parameters") {
        Some(p) => p,
        None => return,
    };

    let mut cursor = params.walk();
    let total = params
        .named_children(&mut cursor)
        .filter(|p| {
            !matches!(
                p.kind(),
                "positional_separator" | "keyword_separator" | "comment"
            )
        })
        .count();

    if total > MAX_ARGUMENTS {
        issues.push(Issue {
            file: parsed.path.clone(),
            line: Some(line),
            kind: IssueKind::TooManyArguments,
            message: format!(
                "Function \"{}\" has {} arguments (max recommended: {})",
                name, total, MAX_ARGUMENTS
            ),
            severity: Severity::Info,
        });
    }
}

/// Missing docstring on a public definition. Underscore-prefixed names are
/// treated as private and skipped.
fn check_docstring(
    node: Node,
    parsed: &ParsedFile,
    name: &str,
    line: usize,
    what: &str,
    issues: &mut Vec<Issue>,
) {
    if name.starts_with('_') {
        return;
    }
    if has_docstring(node) {
        return;
    }

    issues.push(Issue {
        file: parsed.path.clone(),
        line: Some(line),
        kind: IssueKind::MissingDocstring,
        message: format!("Public {} \"{}\" is missing a docstring", what, name),
        severity: Severity::Info,
    });
}

/// True when the first statement of the body block is a string expression.
fn has_docstring(node: Node) -> bool {
    let body = match node.child_by_field_name("body") {
        Some(b) => b,
        None => return false,
    };
    let first = match body.named_child(0) {
        Some(s) => s,
        None => return false,
    };
    first.kind() == "expression_statement"
        && first
            .named_child(0)
            .map(|e| e.kind() == "string")
            .unwrap_or(false)
}

fn check_class(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    let name = node
        .child_by_field_name("name")
        .map(|n| parsed.node_text(n).to_string())
        .unwrap_or_default();
    let line = node.start_position().row + 1;

    check_docstring(node, parsed, &name, line, "class", issues);

    let body = match node.child_by_field_name("body") {
        Some(b) => b,
        None => return,
    };

    let mut cursor = body.walk();
    let method_count = body
        .named_children(&mut cursor)
        .filter(|item| is_method(*item))
        .count();

    if method_count > MAX_METHODS {
        issues.push(Issue {
            file: parsed.path.clone(),
            line: Some(line),
            kind: IssueKind::TooManyMethods,
            message: format!(
                "Class \"{}\" has {} methods (possible God object)",
                name, method_count
            ),
            severity: Severity::Warning,
        });
    }
}

fn is_method(item: Node) -> bool {
    match item.kind() {
        "function_definition" => true,
        "decorated_definition" => item
            .child_by_field_name("definition")
            .map(|d| d.kind() == "function_definition")
            .unwrap_or(false),
        _ => false,
    }
}

/// A numeric literal outside the whitelist that is not the right-hand side
/// of a direct assignment. A wrapping unary minus is transparent: it flips
/// the value and the ancestor used for the assignment check.
fn check_magic_number(
    node: Node,
    parsed: &ParsedFile,
    ancestors: &[Node],
    issues: &mut Vec<Issue>,
) {
    let mut text = parsed.node_text(node).to_string();
    let mut value = match parse_numeric(&text) {
        Some(v) => v,
        None => return,
    };

    let mut context = ancestors.last().copied();
    if let Some(parent) = context {
        if parent.kind() == "unary_operator" && parsed.node_text(parent).starts_with('-') {
            value = -value;
            text = format!("-{}", text);
            context = ancestors.len().checked_sub(2).and_then(|i| ancestors.get(i)).copied();
        }
    }

    if NUMBER_WHITELIST.contains(&value) {
        return;
    }
    if context.map(|n| n.kind() == "assignment").unwrap_or(false) {
        return;
    }

    issues.push(Issue {
        file: parsed.path.clone(),
        line: Some(node.start_position().row + 1),
        kind: IssueKind::MagicNumber,
        message: format!("Magic number {} should be a named constant", text),
        severity: Severity::Info,
    });
}

/// Parse a Python numeric literal. Underscore separators and hex/octal/binary
/// prefixes are handled; anything else that fails to parse is skipped rather
/// than reported.
fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned = text.replace('_', "");
    let lower = cleaned.to_lowercase();

    if let Some(hex) = lower.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).ok().map(|v| v as f64);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return i64::from_str_radix(bin, 2).ok().map(|v| v as f64);
    }

    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PythonParser;
    use std::path::Path;

    fn scan(source: &str) -> Vec<Issue> {
        let parsed = PythonParser::new()
            .parse(Path::new("test.py"), source.as_bytes())
            .unwrap();
        detect_quality(&parsed)
    }

    fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_too_many_arguments() {
        let source = "def f(a, b, c, d, e, f, g, h):\n    \"\"\"doc\"\"\"\n    return a\n";
        let issues = scan(source);
        let args: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::TooManyArguments)
            .collect();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].line, Some(1));
        assert!(args[0].message.contains("8 arguments"));
    }

    #[test]
    fn test_seven_arguments_is_clean() {
        let source = "def f(a, b, c, d, e, f, g):\n    \"\"\"doc\"\"\"\n    return a\n";
        let issues = scan(source);
        assert!(!kinds(&issues).contains(&IssueKind::TooManyArguments));
    }

    #[test]
    fn test_missing_docstring_public_function() {
        let issues = scan("def handler():\n    return 1\n");
        let docs: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingDocstring)
            .collect();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].message.contains("\"handler\""));
    }

    #[test]
    fn test_private_function_without_docstring_is_clean() {
        let issues = scan("def _internal():\n    return 1\n");
        assert!(!kinds(&issues).contains(&IssueKind::MissingDocstring));
    }

    #[test]
    fn test_documented_class_and_function_are_clean() {
        let source =
            "class Widget:\n    \"\"\"A widget.\"\"\"\n\n    def spin(self):\n        \"\"\"Spin.\"\"\"\n        return 1\n";
        let issues = scan(source);
        assert!(!kinds(&issues).contains(&IssueKind::MissingDocstring));
    }

    #[test]
    fn test_high_complexity() {
        // 1 base + 11 ifs = 12
        let mut body = String::from("def busy(x):\n    \"\"\"doc\"\"\"\n");
        for i in 0..11 {
            body.push_str(&format!("    if x > {}:\n        x -= 1\n", i));
        }
        body.push_str("    return x\n");

        let issues = scan(&body);
        let complex: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::HighComplexity)
            .collect();
        assert_eq!(complex.len(), 1);
        assert_eq!(complex[0].line, Some(1));
        assert!(complex[0].message.contains("(12)"));
    }

    #[test]
    fn test_nested_function_complexity_is_independent() {
        // Outer has 1 if; inner has 2; neither crosses the threshold even
        // though a shared counter would reach 4.
        let source = "def outer(x):\n    \"\"\"doc\"\"\"\n    if x:\n        pass\n    def inner(y):\n        \"\"\"doc\"\"\"\n        if y:\n            pass\n        if y > 1:\n            pass\n    return inner\n";
        let issues = scan(source);
        assert!(!kinds(&issues).contains(&IssueKind::HighComplexity));
    }

    #[test]
    fn test_too_many_methods() {
        let mut source = String::from("class Hub:\n    \"\"\"doc\"\"\"\n");
        for i in 0..21 {
            source.push_str(&format!(
                "    def m{}(self):\n        \"\"\"doc\"\"\"\n        return {}\n",
                i, 0
            ));
        }
        let issues = scan(&source);
        let gods: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::TooManyMethods)
            .collect();
        assert_eq!(gods.len(), 1);
        assert!(gods[0].message.contains("21 methods"));
    }

    #[test]
    fn test_magic_number_in_call() {
        let issues = scan("retry(42)\n");
        let magic: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::MagicNumber)
            .collect();
        assert_eq!(magic.len(), 1);
        assert!(magic[0].message.contains("42"));
    }

    #[test]
    fn test_whitelisted_numbers_are_clean() {
        let issues = scan("f(0, 1, -1, 2, 10, 100, 1000)\n");
        assert!(!kinds(&issues).contains(&IssueKind::MagicNumber));
    }

    #[test]
    fn test_assignment_rhs_is_not_magic() {
        let issues = scan("TIMEOUT = 300\n");
        assert!(!kinds(&issues).contains(&IssueKind::MagicNumber));
    }

    #[test]
    fn test_negative_magic_number() {
        let issues = scan("f(-5)\n");
        let magic: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::MagicNumber)
            .collect();
        assert_eq!(magic.len(), 1);
        assert!(magic[0].message.contains("-5"));
    }

    #[test]
    fn test_negative_assignment_rhs_is_not_magic() {
        let issues = scan("OFFSET = -40\n");
        assert!(!kinds(&issues).contains(&IssueKind::MagicNumber));
    }

    #[test]
    fn test_assert_statement() {
        let issues = scan("assert total >= 0\n");
        let asserts: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::AssertStatement)
            .collect();
        assert_eq!(asserts.len(), 1);
        assert_eq!(asserts[0].severity, Severity::Info);
    }
}
