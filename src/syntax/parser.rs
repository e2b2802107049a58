//! Parser capability consumed by the highlighter, plus a tree-sitter adapter
//!
//! The highlighter never parses by itself: it asks a [`SyntaxParser`] for the
//! active grammar and the most recent tree. [`TreeSitterParser`] is the
//! adapter used by the CLI and tests; it caches the last tree so that edits
//! are re-parsed incrementally.

use std::borrow::Cow;

use tree_sitter::{InputEdit, Language, Parser, Point, Tree};

use super::highlights::ByteRange;
use super::languages::LanguageId;

const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;
const PYTHON_HIGHLIGHTS: &str = tree_sitter_python::HIGHLIGHTS_QUERY;
const GO_HIGHLIGHTS: &str = tree_sitter_go::HIGHLIGHTS_QUERY;
const PHP_HIGHLIGHTS: &str = tree_sitter_php::HIGHLIGHTS_QUERY;
// Some grammars export HIGHLIGHT_QUERY (singular)
const C_HIGHLIGHTS: &str = tree_sitter_c::HIGHLIGHT_QUERY;
const CPP_HIGHLIGHTS: &str = tree_sitter_cpp::HIGHLIGHT_QUERY;
const JAVA_HIGHLIGHTS: &str = tree_sitter_java::HIGHLIGHTS_QUERY;
const BASH_HIGHLIGHTS: &str = tree_sitter_bash::HIGHLIGHT_QUERY;
const SCHEME_HIGHLIGHTS: &str = tree_sitter_racket::HIGHLIGHTS_QUERY;
const INI_HIGHLIGHTS: &str = tree_sitter_ini::HIGHLIGHTS_QUERY;
const XML_HIGHLIGHTS: &str = tree_sitter_xml::XML_HIGHLIGHT_QUERY;

/// A tree-sitter language together with its highlight query source
#[derive(Clone)]
pub struct Grammar {
    id: LanguageId,
    language: Language,
    highlights_query: Cow<'static, str>,
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("id", &self.id)
            .field("query_len", &self.highlights_query.len())
            .finish()
    }
}

impl Grammar {
    pub fn new(
        id: LanguageId,
        language: Language,
        highlights_query: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            id,
            language,
            highlights_query: highlights_query.into(),
        }
    }

    /// Grammar and query bundled with the crate, `None` for plain text
    pub fn builtin(id: LanguageId) -> Option<Self> {
        let (language, query): (Language, &'static str) = match id {
            LanguageId::Rust => (tree_sitter_rust::LANGUAGE.into(), RUST_HIGHLIGHTS),
            LanguageId::Python => (tree_sitter_python::LANGUAGE.into(), PYTHON_HIGHLIGHTS),
            LanguageId::Go => (tree_sitter_go::LANGUAGE.into(), GO_HIGHLIGHTS),
            LanguageId::Php => (tree_sitter_php::LANGUAGE_PHP.into(), PHP_HIGHLIGHTS),
            LanguageId::C => (tree_sitter_c::LANGUAGE.into(), C_HIGHLIGHTS),
            LanguageId::Cpp => (tree_sitter_cpp::LANGUAGE.into(), CPP_HIGHLIGHTS),
            LanguageId::Java => (tree_sitter_java::LANGUAGE.into(), JAVA_HIGHLIGHTS),
            LanguageId::Bash => (tree_sitter_bash::LANGUAGE.into(), BASH_HIGHLIGHTS),
            LanguageId::Scheme => (tree_sitter_racket::LANGUAGE.into(), SCHEME_HIGHLIGHTS),
            LanguageId::Ini => (tree_sitter_ini::LANGUAGE.into(), INI_HIGHLIGHTS),
            LanguageId::Xml => (tree_sitter_xml::LANGUAGE_XML.into(), XML_HIGHLIGHTS),
            LanguageId::PlainText => return None,
        };
        Some(Self::new(id, language, query))
    }

    /// Load grammar with query priority: user override → builtin
    ///
    /// Searches `~/.config/token-editor/queries/{lang}/highlights.scm` first.
    pub fn load(id: LanguageId) -> Option<Self> {
        let builtin = Self::builtin(id)?;

        let Some(path) = crate::config_paths::query_override_file(id.short_name()) else {
            return Some(builtin);
        };
        if !path.exists() {
            return Some(builtin);
        }

        match std::fs::read_to_string(&path) {
            Ok(source) => {
                tracing::info!("Loading user highlight query from {}", path.display());
                Some(builtin.with_query(source))
            }
            Err(e) => {
                tracing::warn!("Failed to read query override {}: {}", path.display(), e);
                Some(builtin)
            }
        }
    }

    /// Same language with a different highlight query
    pub fn with_query(self, highlights_query: impl Into<Cow<'static, str>>) -> Self {
        Self {
            highlights_query: highlights_query.into(),
            ..self
        }
    }

    pub fn id(&self) -> LanguageId {
        self.id
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn highlights_query(&self) -> &str {
        &self.highlights_query
    }
}

/// What the highlighter needs from a parser
pub trait SyntaxParser {
    /// Active grammar, including its highlight query source
    fn grammar(&self) -> Option<&Grammar>;

    /// Most recently produced full parse result
    fn latest_tree(&self) -> Option<&Tree>;

    /// Text the latest tree was parsed from (needed by query predicates)
    fn text(&self) -> &[u8];

    /// Byte ranges of the latest tree that may differ from the previous one.
    ///
    /// `None` means unknown (first parse, full re-parse), so every line must be
    /// treated as changed.
    fn changed_ranges(&self) -> Option<&[ByteRange]> {
        None
    }
}

/// Convert a byte offset to a tree-sitter Point (row, column in bytes)
fn byte_to_point(text: &str, byte_offset: usize) -> Point {
    let mut row = 0usize;
    let mut col = 0usize;

    for &byte in text.as_bytes().iter().take(byte_offset) {
        if byte == b'\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    Point { row, column: col }
}

/// Compute an InputEdit by diffing old and new source text.
/// Returns None if the sources are identical.
fn compute_incremental_edit(old_src: &str, new_src: &str) -> Option<InputEdit> {
    if old_src == new_src {
        return None;
    }

    let old_bytes = old_src.as_bytes();
    let new_bytes = new_src.as_bytes();

    // Common prefix
    let mut start = 0;
    let max_start = old_bytes.len().min(new_bytes.len());
    while start < max_start && old_bytes[start] == new_bytes[start] {
        start += 1;
    }

    // Common suffix, not overlapping the prefix
    let mut old_end = old_bytes.len();
    let mut new_end = new_bytes.len();
    while old_end > start && new_end > start && old_bytes[old_end - 1] == new_bytes[new_end - 1] {
        old_end -= 1;
        new_end -= 1;
    }

    Some(InputEdit {
        start_byte: start,
        old_end_byte: old_end,
        new_end_byte: new_end,
        start_position: byte_to_point(old_src, start),
        old_end_position: byte_to_point(old_src, old_end),
        new_end_position: byte_to_point(new_src, new_end),
    })
}

/// Edited bytes plus the ranges whose syntax differs between the edited old
/// tree and the new one, in new-source coordinates
fn changed_ranges(old: &Tree, new: &Tree, edit: &InputEdit) -> Vec<ByteRange> {
    let mut changed = vec![ByteRange::from_bounds(edit.start_byte, edit.new_end_byte)];
    changed.extend(
        old.changed_ranges(new)
            .map(|range| ByteRange::from_bounds(range.start_byte, range.end_byte)),
    );
    tracing::trace!("Re-parse changed {} byte ranges", changed.len());
    changed
}

/// Tree-sitter parser for one document (tree-sitter parsers are !Sync)
pub struct TreeSitterParser {
    grammar: Grammar,
    parser: Parser,
    /// Last successful parse
    tree: Option<Tree>,
    /// Source the tree was parsed from (needed for computing edits)
    source: String,
    /// What the last parse changed, `None` after a from-scratch parse
    changed: Option<Vec<ByteRange>>,
}

impl TreeSitterParser {
    pub fn new(grammar: Grammar) -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(grammar.language())
            .map_err(|e| format!("Failed to set language for {:?}: {}", grammar.id(), e))?;

        Ok(Self {
            grammar,
            parser,
            tree: None,
            source: String::new(),
            changed: None,
        })
    }

    /// Parse `source`, reusing the previous tree when there is one.
    ///
    /// Returns whether a tree is available afterwards. After an incremental
    /// parse, [`SyntaxParser::changed_ranges`] reports the edited bytes plus
    /// every range whose syntax changed (an opened block comment reaches
    /// far beyond the edit).
    pub fn parse(&mut self, source: &str) -> bool {
        let (old_tree, edit) = match self.tree.take() {
            Some(mut tree) => match compute_incremental_edit(&self.source, source) {
                Some(edit) => {
                    tree.edit(&edit);
                    tracing::trace!(
                        "Incremental parse: edit at byte {}..{} -> {}..{}",
                        edit.start_byte,
                        edit.old_end_byte,
                        edit.start_byte,
                        edit.new_end_byte
                    );
                    (Some(tree), Some(edit))
                }
                None => {
                    tracing::trace!("Source unchanged, reusing cached tree");
                    self.tree = Some(tree);
                    self.changed = Some(Vec::new());
                    return true;
                }
            },
            None => (None, None),
        };

        let (parsed, incremental) = match self.parser.parse(source, old_tree.as_ref()) {
            Some(tree) => (Some(tree), old_tree.is_some()),
            None if old_tree.is_some() => {
                tracing::warn!(
                    "Incremental parse failed for {:?}, falling back to full parse",
                    self.grammar.id()
                );
                (self.parser.parse(source, None), false)
            }
            None => (None, false),
        };

        match parsed {
            Some(tree) => {
                self.changed = match (incremental, &old_tree, edit) {
                    (true, Some(old), Some(edit)) => Some(changed_ranges(old, &tree, &edit)),
                    _ => None,
                };
                self.tree = Some(tree);
                self.source = source.to_owned();
                true
            }
            None => {
                tracing::error!("Parse failed for {:?}", self.grammar.id());
                self.source.clear();
                self.changed = None;
                false
            }
        }
    }

    /// Drop the cached tree (the next parse starts from scratch)
    pub fn clear_tree(&mut self) {
        self.tree = None;
        self.source.clear();
        self.changed = None;
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl SyntaxParser for TreeSitterParser {
    fn grammar(&self) -> Option<&Grammar> {
        Some(&self.grammar)
    }

    fn latest_tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    fn text(&self) -> &[u8] {
        self.source.as_bytes()
    }

    fn changed_ranges(&self) -> Option<&[ByteRange]> {
        self.changed.as_deref()
    }
}
