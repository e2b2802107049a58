//! Per-document highlighter
//!
//! Ties the parser capability, the lazily compiled query, the theme and the
//! token cache together. One `Highlighter` belongs to one document and is
//! driven from the thread that owns that document; there is no locking.
//!
//! ## Flow
//!
//! ```text
//! tokens_for_line(line, range)
//!   → cache hit (current generation)  → tokens
//!   → miss → captures(range) → attributes(captures, range) → store → tokens
//! ```

use tree_sitter::Query;

use super::cache::TokenCache;
use super::captures;
use super::clamp;
use super::error::HighlightError;
use super::highlights::{ByteRange, Capture, HighlightToken, LineId, QueryGeneration};
use super::parser::{SyntaxParser, TreeSitterParser};
use super::query::QueryManager;
use crate::theme::{Theme, ThemePolicy};

pub struct Highlighter<P = TreeSitterParser, T = Theme> {
    parser: Option<P>,
    theme: T,
    query: QueryManager,
    cache: TokenCache,
}

impl<P: SyntaxParser, T: ThemePolicy> Highlighter<P, T> {
    /// Highlighter with no parser configured yet
    pub fn new(theme: T) -> Self {
        Self {
            parser: None,
            theme,
            query: QueryManager::new(),
            cache: TokenCache::new(),
        }
    }

    pub fn with_parser(parser: P, theme: T) -> Self {
        Self {
            parser: Some(parser),
            ..Self::new(theme)
        }
    }

    /// True when a parser is configured and holds a tree.
    ///
    /// Does not look at the query: a highlighter can be ready to try while
    /// its query is still uncompiled.
    pub fn can_highlight(&self) -> bool {
        self.parser
            .as_ref()
            .is_some_and(|parser| parser.latest_tree().is_some())
    }

    /// Compile the highlight query if none is installed
    pub fn prepare(&mut self) {
        let grammar = self.parser.as_ref().and_then(|parser| parser.grammar());
        self.query.prepare(grammar);
    }

    /// Drop the query and every cached line
    pub fn reset(&mut self) {
        self.query.reset();
        self.cache.clear();
    }

    pub fn generation(&self) -> QueryGeneration {
        self.query.generation()
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.query()
    }

    /// Captures intersecting `range`, in query order
    pub fn captures(&self, range: ByteRange) -> Result<Vec<Capture>, HighlightError> {
        captures::captures(self.parser.as_ref(), self.query.query(), range)
    }

    /// Line-local tokens for `captures` on the line spanning `line`
    pub fn attributes(&self, captures: &[Capture], line: ByteRange) -> Vec<HighlightToken> {
        clamp::attributes(captures, line, &self.theme)
    }

    /// Cache `tokens` for `line` if they were computed under the current
    /// generation. Returns false (and stores nothing) for a stale result.
    pub fn store(
        &mut self,
        line: LineId,
        tokens: Vec<HighlightToken>,
        generation: QueryGeneration,
    ) -> bool {
        if generation != self.query.generation() {
            tracing::debug!(
                "Discarding tokens for line {} computed under generation {} (current {})",
                line.get(),
                generation.get(),
                self.query.generation().get()
            );
            return false;
        }
        self.cache.store(line, tokens, generation);
        true
    }

    /// Cached tokens for `line`, `None` if absent or stale
    pub fn fetch(&self, line: LineId) -> Option<&[HighlightToken]> {
        self.cache.fetch(line, self.query.generation())
    }

    /// Forget one line's tokens (its text or byte range changed)
    pub fn invalidate(&mut self, line: LineId) {
        self.cache.invalidate(line);
    }

    /// Drop entries left over from older generations
    pub fn prune_stale(&mut self) {
        self.cache.retain_generation(self.query.generation());
    }

    /// Forget every line's tokens, keeping the query
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Tokens for one line, computing and caching them on a miss.
    ///
    /// Compiles the query first if needed.
    pub fn tokens_for_line(
        &mut self,
        line: LineId,
        range: ByteRange,
    ) -> Result<&[HighlightToken], HighlightError> {
        self.prepare();
        let generation = self.query.generation();
        let parser = self.parser.as_ref();
        let query = self.query.query();
        let theme = &self.theme;

        self.cache.get_or_try_insert_with(line, generation, || {
            tracing::trace!("Token cache miss for line {}", line.get());
            let captures = captures::captures(parser, query, range)?;
            Ok(clamp::attributes(&captures, range, theme))
        })
    }

    /// Install or remove the parser. A new parser may bring a new grammar,
    /// so the query and cache are reset.
    pub fn set_parser(&mut self, parser: Option<P>) {
        self.parser = parser;
        self.reset();
    }

    pub fn parser(&self) -> Option<&P> {
        self.parser.as_ref()
    }

    /// Mutable access for re-parsing. Callers report the new tree with
    /// [`Self::reparsed`] afterwards.
    pub fn parser_mut(&mut self) -> Option<&mut P> {
        self.parser.as_mut()
    }

    /// The whole tree was rebuilt; every cached line may be wrong
    pub fn tree_replaced(&mut self) {
        self.cache.clear();
    }

    /// The parser produced a new tree. `lines` are the document's lines with
    /// their current byte ranges; every line touching a range the parser
    /// reports as changed is dropped. Without change information the whole
    /// cache goes.
    ///
    /// Tokens are line-local, so a line that merely moved keeps its entry.
    pub fn reparsed<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = (LineId, ByteRange)>,
    {
        let Some(changed) = self.parser.as_ref().and_then(|parser| parser.changed_ranges()) else {
            self.tree_replaced();
            return;
        };

        let mut dropped = 0usize;
        for (line, range) in lines {
            if changed.iter().any(|c| touches(*c, range)) {
                self.cache.invalidate(line);
                dropped += 1;
            }
        }
        tracing::debug!(
            "Re-parse touched {} byte ranges, dropped {} lines",
            changed.len(),
            dropped
        );
    }

    /// Swap the theme. Cached tokens carry resolved colors, so this goes
    /// through the same reset as a grammar change.
    pub fn set_theme(&mut self, theme: T) {
        self.theme = theme;
        self.reset();
    }

    pub fn theme(&self) -> &T {
        &self.theme
    }

    /// Number of cached lines, stale ones included
    pub fn cached_lines(&self) -> usize {
        self.cache.len()
    }
}

/// Overlap test that also counts ranges meeting at a boundary, so an
/// insertion at a line's edge (or an empty line) is not missed
fn touches(changed: ByteRange, line: ByteRange) -> bool {
    changed.start <= line.end() && line.start <= changed.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::languages::LanguageId;
    use crate::syntax::parser::Grammar;
    use crate::theme::{Color, FontStyle};

    /// Every tag gets the same color
    struct FlatTheme(Color);

    impl ThemePolicy for FlatTheme {
        fn color_for(&self, _tag: &str) -> Option<Color> {
            Some(self.0)
        }

        fn font_for(&self, _tag: &str) -> FontStyle {
            FontStyle::default()
        }
    }

    fn rust_highlighter(source: &str) -> Highlighter<TreeSitterParser, FlatTheme> {
        let grammar = Grammar::builtin(LanguageId::Rust).unwrap();
        let mut parser = TreeSitterParser::new(grammar).unwrap();
        parser.parse(source);
        Highlighter::with_parser(parser, FlatTheme(Color::rgb(0xCC, 0x78, 0x32)))
    }

    #[test]
    fn test_tokens_for_line_caches() {
        let mut highlighter = rust_highlighter("fn main() {}");
        let line = LineId::new(0);
        let range = ByteRange::new(0, 12);

        let first = highlighter.tokens_for_line(line, range).unwrap().to_vec();
        assert!(!first.is_empty());
        assert_eq!(highlighter.fetch(line), Some(first.as_slice()));
        assert_eq!(highlighter.cached_lines(), 1);
    }

    #[test]
    fn test_store_rejects_stale_generation() {
        let mut highlighter = rust_highlighter("fn main() {}");
        highlighter.prepare();
        let started_under = highlighter.generation();
        let range = ByteRange::new(0, 12);
        let captures = highlighter.captures(range).unwrap();
        let tokens = highlighter.attributes(&captures, range);

        highlighter.reset();
        highlighter.prepare();

        assert!(!highlighter.store(LineId::new(0), tokens, started_under));
        assert!(highlighter.fetch(LineId::new(0)).is_none());
    }

    #[test]
    fn test_theme_swap_clears_cache() {
        let mut highlighter = rust_highlighter("fn main() {}");
        let line = LineId::new(0);
        highlighter
            .tokens_for_line(line, ByteRange::new(0, 12))
            .unwrap();

        highlighter.set_theme(FlatTheme(Color::rgb(0, 0, 0xFF)));
        assert!(highlighter.fetch(line).is_none());
        assert!(highlighter.query().is_none());

        let tokens = highlighter
            .tokens_for_line(line, ByteRange::new(0, 12))
            .unwrap();
        assert!(tokens
            .iter()
            .all(|t| t.color == Some(Color::rgb(0, 0, 0xFF))));
    }

    #[test]
    fn test_reparsed_drops_only_changed_lines() {
        let mut highlighter = rust_highlighter("fn a() {}\nfn b() {}");
        let lines = [
            (LineId::new(0), ByteRange::new(0, 9)),
            (LineId::new(1), ByteRange::new(10, 9)),
        ];
        for (line, range) in lines {
            highlighter.tokens_for_line(line, range).unwrap();
        }

        highlighter
            .parser_mut()
            .unwrap()
            .parse("fn a() {}\nfn c() {}");
        highlighter.reparsed(lines);

        assert!(highlighter.fetch(LineId::new(0)).is_some());
        assert!(highlighter.fetch(LineId::new(1)).is_none());
    }

    #[test]
    fn test_reparsed_without_change_info_clears_all() {
        let mut highlighter = rust_highlighter("fn a() {}");
        highlighter
            .tokens_for_line(LineId::new(0), ByteRange::new(0, 9))
            .unwrap();

        // First parse after clear_tree has nothing to diff against
        let parser = highlighter.parser_mut().unwrap();
        parser.clear_tree();
        parser.parse("fn a() {}");
        highlighter.reparsed([(LineId::new(0), ByteRange::new(0, 9))]);

        assert_eq!(highlighter.cached_lines(), 0);
    }

    #[test]
    fn test_touches_boundaries() {
        assert!(touches(ByteRange::new(5, 0), ByteRange::new(0, 5)));
        assert!(touches(ByteRange::new(0, 3), ByteRange::new(3, 0)));
        assert!(!touches(ByteRange::new(0, 3), ByteRange::new(4, 2)));
    }

    #[test]
    fn test_prune_stale_keeps_current_entries() {
        let mut highlighter = rust_highlighter("fn main() {}");
        highlighter.prepare();
        let old = highlighter.generation();
        highlighter.cache.store(LineId::new(7), Vec::new(), old);
        highlighter.query.reset();
        highlighter
            .tokens_for_line(LineId::new(0), ByteRange::new(0, 12))
            .unwrap();
        assert_eq!(highlighter.cached_lines(), 2);

        highlighter.prune_stale();
        assert_eq!(highlighter.cached_lines(), 1);
        assert!(highlighter.fetch(LineId::new(0)).is_some());
    }

    #[test]
    fn test_tree_replaced_keeps_query() {
        let mut highlighter = rust_highlighter("fn main() {}");
        highlighter
            .tokens_for_line(LineId::new(0), ByteRange::new(0, 12))
            .unwrap();
        let generation = highlighter.generation();

        highlighter.tree_replaced();
        assert_eq!(highlighter.cached_lines(), 0);
        assert_eq!(highlighter.generation(), generation);
        assert!(highlighter.query().is_some());
    }
}
