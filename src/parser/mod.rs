//! Tree-sitter backed Python parsing.
//!
//! Every other component consumes this module: the detectors walk the parsed
//! tree, and the fix validator re-parses candidate content before anything is
//! written to disk. A tree containing ERROR or MISSING nodes counts as a
//! parse failure; `ParsedFile::first_error` reports the earliest one.

use std::path::Path;

use once_cell::sync::Lazy;
use tree_sitter::{Language, Node, Parser, Tree};

static PYTHON: Lazy<Language> = Lazy::new(|| tree_sitter_python::LANGUAGE.into());

/// Location and message for the first syntax error in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorDetail {
    /// 1-indexed line of the error.
    pub line: usize,
    /// 1-indexed column of the error.
    pub column: usize,
    pub message: String,
}

/// A parsed Python source file.
pub struct ParsedFile {
    pub tree: Tree,
    pub source: Vec<u8>,
    pub path: String,
}

impl ParsedFile {
    /// Get the source text of a node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Total number of lines in the source.
    pub fn line_count(&self) -> usize {
        let text = String::from_utf8_lossy(&self.source);
        text.lines().count()
    }

    /// Whether the tree contains any syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Find the earliest syntax error in the tree, if any.
    pub fn first_error(&self) -> Option<ParseErrorDetail> {
        first_error_node(self.tree.root_node()).map(|node| {
            let pos = node.start_position();
            let message = if node.is_missing() {
                format!("expected {}", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            ParseErrorDetail {
                line: pos.row + 1,
                column: pos.column + 1,
                message,
            }
        })
    }
}

/// Pre-order search for the first ERROR or MISSING node.
///
/// Only subtrees flagged by `has_error` are descended, so this stays cheap on
/// large clean files.
fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    // has_error was set but no child carried it; the node itself is the error
    Some(node)
}

/// Parser for Python source files.
pub struct PythonParser {
    language: Language,
}

impl PythonParser {
    pub fn new() -> Self {
        Self {
            language: PYTHON.clone(),
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse Python source into a tree.
    ///
    /// Returns an error only when tree-sitter itself fails to produce a tree;
    /// syntactically invalid input still parses, with the defects surfaced
    /// through `ParsedFile::first_error`.
    pub fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Python source: {}", path.display()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        PythonParser::new()
            .parse(Path::new("test.py"), source.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_valid_source_has_no_errors() {
        let parsed = parse("def f(x):\n    return x + 1\n");
        assert!(!parsed.has_errors());
        assert!(parsed.first_error().is_none());
    }

    #[test]
    fn test_unmatched_delimiter_reports_error_at_or_after_defect() {
        let parsed = parse("x = 1\ndef f(:\n    pass\n");
        assert!(parsed.has_errors());
        let err = parsed.first_error().unwrap();
        assert!(err.line >= 2, "error line {} before defect", err.line);
    }

    #[test]
    fn test_unclosed_paren_reports_error() {
        let parsed = parse("value = compute(1, 2\n");
        let err = parsed.first_error().unwrap();
        assert!(err.line >= 1);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_line_count() {
        let parsed = parse("a = 1\nb = 2\nc = 3\n");
        assert_eq!(parsed.line_count(), 3);
    }

    #[test]
    fn test_node_text() {
        let parsed = parse("name = 'hello'\n");
        let root = parsed.tree.root_node();
        assert_eq!(parsed.node_text(root).trim(), "name = 'hello'");
    }
}
