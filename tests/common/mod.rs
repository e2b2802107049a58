//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use token_syntax::syntax::{
    line_ranges, ByteRange, Grammar, HighlightToken, Highlighter, LanguageId, LineId,
    TreeSitterParser,
};
use token_syntax::theme::Theme;

/// Minimal document: text, one stable id per line, and a highlighter
pub struct TestDocument {
    pub text: String,
    pub lines: Vec<(LineId, ByteRange)>,
    pub highlighter: Highlighter,
    next_id: u64,
}

impl TestDocument {
    pub fn new(language: LanguageId, text: &str) -> Self {
        let grammar = Grammar::builtin(language).expect("language has a grammar");
        let mut parser = TreeSitterParser::new(grammar).expect("grammar loads");
        assert!(parser.parse(text));

        let mut doc = Self {
            text: text.to_string(),
            lines: Vec::new(),
            highlighter: Highlighter::with_parser(parser, Theme::default_dark()),
            next_id: 0,
        };
        for range in line_ranges(text) {
            let id = doc.allocate_id();
            doc.lines.push((id, range));
        }
        doc
    }

    pub fn rust(text: &str) -> Self {
        Self::new(LanguageId::Rust, text)
    }

    fn allocate_id(&mut self) -> LineId {
        let id = LineId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn line_id(&self, idx: usize) -> LineId {
        self.lines[idx].0
    }

    pub fn line_range(&self, idx: usize) -> ByteRange {
        self.lines[idx].1
    }

    pub fn line_text(&self, idx: usize) -> &str {
        &self.text[self.line_range(idx).as_range()]
    }

    /// Tokens for line `idx` through the cache
    pub fn tokens(&mut self, idx: usize) -> Vec<HighlightToken> {
        let (id, range) = self.lines[idx];
        self.highlighter
            .tokens_for_line(id, range)
            .expect("highlighting available")
            .to_vec()
    }

    /// Text covered by each token on line `idx`
    pub fn token_texts(&mut self, idx: usize) -> Vec<String> {
        let tokens = self.tokens(idx);
        let line = self.line_text(idx);
        tokens
            .iter()
            .map(|t| line[t.range.as_range()].to_string())
            .collect()
    }

    /// Replace the text of one line, re-parse, and let the highlighter drop
    /// every line the re-parse touched. Line ids are preserved.
    pub fn replace_line(&mut self, idx: usize, new_text: &str) {
        let range = self.line_range(idx);
        let mut text = String::with_capacity(self.text.len() + new_text.len());
        text.push_str(&self.text[..range.start]);
        text.push_str(new_text);
        text.push_str(&self.text[range.end()..]);

        let parser = self.highlighter.parser_mut().expect("parser configured");
        assert!(parser.parse(&text));
        self.text = text;

        let new_ranges = line_ranges(&self.text);
        assert_eq!(new_ranges.len(), self.lines.len(), "line count changed");
        for (line, new_range) in self.lines.iter_mut().zip(new_ranges) {
            line.1 = new_range;
        }
        self.highlighter.reparsed(self.lines.iter().copied());
    }

    /// Tokens for line `idx` computed from scratch, bypassing the cache
    pub fn fresh_tokens(&self, idx: usize) -> Vec<HighlightToken> {
        let range = self.line_range(idx);
        let captures = self
            .highlighter
            .captures(range)
            .expect("highlighting available");
        self.highlighter.attributes(&captures, range)
    }
}
