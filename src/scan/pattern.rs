//! Detection of common Python anti-patterns.
//!
//! Each check is an independent node-kind match; no check depends on another
//! or on traversal order beyond visiting every node once.

use tree_sitter::Node;

use crate::parser::ParsedFile;

use super::{Issue, IssueKind, Severity};

/// Walk the tree and report anti-pattern issues for one file.
pub fn detect_patterns(parsed: &ParsedFile) -> Vec<Issue> {
    let mut issues = Vec::new();
    visit(parsed.tree.root_node(), parsed, &mut issues);
    issues
}

fn visit(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    match node.kind() {
        "comparison_operator" => check_none_comparison(node, parsed, issues),
        "except_clause" => check_bare_except(node, parsed, issues),
        "function_definition" => check_mutable_defaults(node, parsed, issues),
        "import_from_statement" => check_wildcard_from_import(node, parsed, issues),
        "import_statement" => check_wildcard_import(node, parsed, issues),
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, parsed, issues);
    }
}

/// `x == None` / `x != None` instead of `is None` / `is not None`.
fn check_none_comparison(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    let children: Vec<Node> = {
        let mut cursor = node.walk();
        node.children(&mut cursor).collect()
    };

    for (i, child) in children.iter().enumerate() {
        if child.kind() != "==" && child.kind() != "!=" {
            continue;
        }
        let neighbor_is_none = [i.checked_sub(1), Some(i + 1)]
            .into_iter()
            .flatten()
            .filter_map(|j| children.get(j))
            .any(|n| n.kind() == "none");

        if neighbor_is_none {
            issues.push(Issue {
                file: parsed.path.clone(),
                line: Some(node.start_position().row + 1),
                kind: IssueKind::NoneComparison,
                message: "Use \"is None\" or \"is not None\" instead of \"== None\" or \"!= None\""
                    .to_string(),
                severity: Severity::Warning,
            });
        }
    }
}

/// `except:` with no declared exception type.
fn check_bare_except(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    let mut cursor = node.walk();
    let has_type = node
        .named_children(&mut cursor)
        .any(|c| c.kind() != "block" && c.kind() != "comment");

    if !has_type {
        issues.push(Issue {
            file: parsed.path.clone(),
            line: Some(node.start_position().row + 1),
            kind: IssueKind::BareExcept,
            message: "Bare except clause should specify exception type".to_string(),
            severity: Severity::Warning,
        });
    }
}

/// A parameter default that is a list, dict, or set literal.
fn check_mutable_defaults(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    let name = node
        .child_by_field_name("name")
        .map(|n| parsed.node_text(n).to_string())
        .unwrap_or_default();

    let params = match node.child_by_field_name("parameters") {
        Some(p) => p,
        None => return,
    };

    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        if param.kind() != "default_parameter" && param.kind() != "typed_default_parameter" {
            continue;
        }
        let default_is_mutable = param
            .child_by_field_name("value")
            .map(|v| matches!(v.kind(), "list" | "dictionary" | "set"))
            .unwrap_or(false);

        if default_is_mutable {
            issues.push(Issue {
                file: parsed.path.clone(),
                line: Some(node.start_position().row + 1),
                kind: IssueKind::MutableDefaultArgument,
                message: format!("Function \"{}\" has mutable default argument", name),
                severity: Severity::Warning,
            });
        }
    }
}

/// `from module import *`.
fn check_wildcard_from_import(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    let mut cursor = node.walk();
    let has_wildcard = node.children(&mut cursor).any(|c| c.kind() == "wildcard_import");
    if !has_wildcard {
        return;
    }

    let module = node
        .child_by_field_name("module_name")
        .map(|n| parsed.node_text(n).to_string())
        .unwrap_or_else(|| "module".to_string());

    issues.push(Issue {
        file: parsed.path.clone(),
        line: Some(node.start_position().row + 1),
        kind: IssueKind::WildcardImport,
        message: format!("Avoid wildcard imports (from {} import *)", module),
        severity: Severity::Info,
    });
}

/// A plain import whose target is the bare name `*`.
fn check_wildcard_import(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    let mut cursor = node.walk();
    let imports_everything = node
        .named_children(&mut cursor)
        .any(|c| parsed.node_text(c) == "*");

    if imports_everything {
        issues.push(Issue {
            file: parsed.path.clone(),
            line: Some(node.start_position().row + 1),
            kind: IssueKind::WildcardImport,
            message: "Avoid wildcard imports (from module import *)".to_string(),
            severity: Severity::Info,
        });
    }
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
        detect_patterns(&parsed)
    }

    #[test]
    fn test_none_comparison_eq() {
        let issues = scan("if value == None:\n    pass\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::NoneComparison);
        assert_eq!(issues[0].line, Some(1));
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_none_comparison_neq() {
        let issues = scan("x = 1\nif value != None:\n    pass\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(2));
    }

    #[test]
    fn test_is_none_is_clean() {
        let issues = scan("if value is None:\n    pass\nif value is not None:\n    pass\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_eq_comparison_without_none_is_clean() {
        let issues = scan("if value == 3:\n    pass\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_bare_except() {
        let issues = scan("try:\n    work()\nexcept:\n    pass\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::BareExcept);
        assert_eq!(issues[0].line, Some(3));
    }

    #[test]
    fn test_typed_except_is_clean() {
        let issues = scan("try:\n    work()\nexcept ValueError:\n    pass\n");
        assert!(issues.is_empty());

        let issues = scan("try:\n    work()\nexcept (IOError, OSError) as e:\n    raise\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_mutable_default_argument() {
        let issues = scan("def f(a=[]):\n    a.append(1)\n    return a\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MutableDefaultArgument);
        assert_eq!(issues[0].line, Some(1));
        assert!(issues[0].message.contains("\"f\""));
    }

    #[test]
    fn test_mutable_default_dict_and_set() {
        let issues = scan("def g(m={}, s={1}):\n    pass\n");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::MutableDefaultArgument));
    }

    #[test]
    fn test_immutable_defaults_are_clean() {
        let issues = scan("def h(a=None, b=0, c=()):\n    pass\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_wildcard_import() {
        let issues = scan("from os.path import *\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::WildcardImport);
        assert_eq!(issues[0].severity, Severity::Info);
        assert!(issues[0].message.contains("os.path"));
    }

    #[test]
    fn test_named_imports_are_clean() {
        let issues = scan("import os\nfrom pathlib import Path\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_checks_are_independent() {
        let source = "from json import *\n\ndef f(a=[]):\n    try:\n        return a == None\n    except:\n        pass\n";
        let issues = scan(source);
        let kinds: Vec<IssueKind> = issues.iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&IssueKind::WildcardImport));
        assert!(kinds.contains(&IssueKind::MutableDefaultArgument));
        assert!(kinds.contains(&IssueKind::NoneComparison));
        assert!(kinds.contains(&IssueKind::BareExcept));
    }
}
