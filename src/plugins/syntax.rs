//! Source languages understood by the quality gate.
//!
//! Each language maps file extensions to a Tree-sitter grammar plus the
//! line prefixes the import and complexity heuristics look for. Grammars are
//! cargo features (`lang-python`, `lang-rust`); a language whose grammar is
//! compiled out still gets the heuristics, and its syntax check reports
//! "unavailable".

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static RUST_FN_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:pub(?:\([^)]*\))?\s+)?(?:default\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+(?:"[^"]*"\s+)?)?fn\s"#,
    )
    .unwrap()
});

static RUST_TYPE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?(?:struct|enum|trait|union)\s").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    Python,
    Rust,
}

impl SourceLanguage {
    /// `.rs` files are Rust; everything else is treated as Python.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("rs") => SourceLanguage::Rust,
            _ => SourceLanguage::Python,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "python",
            SourceLanguage::Rust => "rust",
        }
    }

    pub fn import_prefixes(&self) -> &'static [&'static str] {
        match self {
            SourceLanguage::Python => &["import ", "from "],
            SourceLanguage::Rust => &["use ", "pub use ", "pub(crate) use ", "extern crate "],
        }
    }

    pub fn is_import(&self, trimmed: &str) -> bool {
        self.import_prefixes().iter().any(|p| trimmed.starts_with(p))
    }

    pub fn is_function_def(&self, trimmed: &str) -> bool {
        match self {
            SourceLanguage::Python => trimmed.starts_with("def "),
            SourceLanguage::Rust => RUST_FN_ITEM.is_match(trimmed),
        }
    }

    pub fn is_class_def(&self, trimmed: &str) -> bool {
        match self {
            SourceLanguage::Python => trimmed.starts_with("class "),
            SourceLanguage::Rust => RUST_TYPE_ITEM.is_match(trimmed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxOutcome {
    Valid,
    Invalid(String),
    /// No grammar compiled in for the language.
    Unavailable(String),
}

/// Parse `content` and report the first syntax error, if any.
pub fn check_source(language: SourceLanguage, content: &str) -> SyntaxOutcome {
    grammar::check(language, content)
}

#[cfg(any(feature = "lang-python", feature = "lang-rust"))]
mod grammar {
    use super::{SourceLanguage, SyntaxOutcome};
    use crate::core::output;
    use tree_sitter::{Node, Parser};

    fn grammar_for(language: SourceLanguage) -> Option<tree_sitter::Language> {
        match language {
            #[cfg(feature = "lang-python")]
            SourceLanguage::Python => Some(tree_sitter_python::LANGUAGE.into()),
            #[cfg(feature = "lang-rust")]
            SourceLanguage::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
        None
    }

    /// Python 2 statement forms the grammar still accepts.
    const PYTHON2_ONLY: &[&str] = &["print_statement", "exec_statement"];

    fn first_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
        if kinds.contains(&node.kind()) {
            return Some(node);
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if let Some(found) = first_of_kind(child, kinds) {
                return Some(found);
            }
        }
        None
    }

    fn describe(node: Node<'_>, source: &[u8]) -> String {
        let pos = node.start_position();
        if node.is_missing() {
            return format!(
                "missing `{}` at line {}, column {}",
                node.kind(),
                pos.row + 1,
                pos.column + 1
            );
        }
        let snippet = node
            .utf8_text(source)
            .ok()
            .and_then(|t| t.lines().next())
            .map(|t| output::compact_line(t, 40))
            .unwrap_or_default();
        if snippet.is_empty() {
            format!("invalid syntax at line {}, column {}", pos.row + 1, pos.column + 1)
        } else {
            format!(
                "invalid syntax at line {}, column {} near `{}`",
                pos.row + 1,
                pos.column + 1,
                snippet
            )
        }
    }

    pub(super) fn check(language: SourceLanguage, content: &str) -> SyntaxOutcome {
        let Some(grammar) = grammar_for(language) else {
            return SyntaxOutcome::Unavailable(format!(
                "no {} grammar compiled in",
                language.name()
            ));
        };
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&grammar) {
            return SyntaxOutcome::Unavailable(format!("grammar load failed: {}", e));
        }
        let Some(tree) = parser.parse(content, None) else {
            return SyntaxOutcome::Invalid("parser produced no tree".to_string());
        };
        let root = tree.root_node();
        if root.has_error() {
            let message = first_error(root)
                .map(|node| describe(node, content.as_bytes()))
                .unwrap_or_else(|| "invalid syntax".to_string());
            return SyntaxOutcome::Invalid(message);
        }
        if language == SourceLanguage::Python
            && let Some(node) = first_of_kind(root, PYTHON2_ONLY)
        {
            return SyntaxOutcome::Invalid(describe(node, content.as_bytes()));
        }
        SyntaxOutcome::Valid
    }
}

#[cfg(not(any(feature = "lang-python", feature = "lang-rust")))]
mod grammar {
    use super::{SourceLanguage, SyntaxOutcome};

    pub(super) fn check(language: SourceLanguage, _content: &str) -> SyntaxOutcome {
        SyntaxOutcome::Unavailable(format!("no {} grammar compiled in", language.name()))
    }
}
