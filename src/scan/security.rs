//! Detection of security-sensitive constructs.
//!
//! Name resolution here is purely lexical: `pickle.loads` is matched by the
//! attribute-base identifier and attribute name alone. Aliasing and
//! reassignment are intentionally not tracked; that is a precision/recall
//! trade-off, not an oversight.

use tree_sitter::Node;

use crate::parser::ParsedFile;

use super::{Issue, IssueKind, Severity};

/// The serialization module whose use is flagged as unsafe.
const UNSAFE_MODULE: &str = "pickle";

/// Walk the tree and report security issues for one file.
pub fn detect_security(parsed: &ParsedFile) -> Vec<Issue> {
    let mut issues = Vec::new();
    visit(parsed.tree.root_node(), parsed, &mut issues);
    issues
}

fn visit(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    match node.kind() {
        "call" => check_call(node, parsed, issues),
        "import_statement" => check_import(node, parsed, issues),
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, parsed, issues);
    }
}

fn check_call(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    let callee = match node.child_by_field_name("function") {
        Some(c) => c,
        None => return,
    };
    let line = node.start_position().row + 1;

    match callee.kind() {
        "identifier" => match parsed.node_text(callee) {
            "eval" => issues.push(Issue {
                file: parsed.path.clone(),
                line: Some(line),
                kind: IssueKind::DangerousEval,
                message: "Use of eval() is dangerous and should be avoided".to_string(),
                severity: Severity::Critical,
            }),
            "exec" => issues.push(Issue {
                file: parsed.path.clone(),
                line: Some(line),
                kind: IssueKind::DangerousExec,
                message: "Use of exec() is dangerous and should be avoided".to_string(),
                severity: Severity::Critical,
            }),
            _ => {}
        },
        "attribute" => {
            let base = callee
                .child_by_field_name("object")
                .filter(|n| n.kind() == "identifier")
                .map(|n| parsed.node_text(n));
            let attr = callee
                .child_by_field_name("attribute")
                .map(|n| parsed.node_text(n));

            if base == Some(UNSAFE_MODULE) && attr == Some("loads") {
                issues.push(Issue {
                    file: parsed.path.clone(),
                    line: Some(line),
                    kind: IssueKind::UnsafeDeserialization,
                    message: "pickle.loads() can execute arbitrary code; use with caution"
                        .to_string(),
                    severity: Severity::High,
                });
            }
        }
        _ => {}
    }
}

fn check_import(node: Node, parsed: &ParsedFile, issues: &mut Vec<Issue>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let imported = match child.kind() {
            "dotted_name" => parsed.node_text(child),
            // `import pickle as p` still imports the unsafe module
            "aliased_import" => child
                .child_by_field_name("name")
                .map(|n| parsed.node_text(n))
                .unwrap_or(""),
            _ => continue,
        };

        if imported == UNSAFE_MODULE {
            issues.push(Issue {
                file: parsed.path.clone(),
                line: Some(node.start_position().row + 1),
                kind: IssueKind::InsecureModule,
                message: "pickle module can be unsafe; consider using json instead".to_string(),
                severity: Severity::Info,
            });
        }
    }
}
