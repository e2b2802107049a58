//! Syntax highlighting module
//!
//! Provides tree-sitter based, per-line highlight tokens with:
//! - Lazy compilation of the highlight query
//! - Capture extraction scoped to a line's byte range
//! - Clamping of multi-line captures to line-local tokens
//! - A per-line token cache stamped with the query generation
//!
//! ## Architecture
//!
//! ```text
//! renderer → Highlighter::tokens_for_line(line, range)
//!          → TokenCache hit?  ─yes→ tokens
//!          → captures(range) → attributes(captures, range) → TokenCache::store
//! ```
//!
//! Parsing happens elsewhere ([`TreeSitterParser`] is one implementation of
//! [`SyntaxParser`]); the owner decides when to re-parse and which lines to
//! invalidate.

mod cache;
mod captures;
mod clamp;
mod error;
mod highlighter;
mod highlights;
mod languages;
mod lines;
mod parser;
mod query;

pub use cache::TokenCache;
pub use clamp::clamp_to_line;
pub use error::HighlightError;
pub use highlighter::Highlighter;
pub use highlights::{token_at, ByteRange, Capture, HighlightToken, LineId, QueryGeneration};
pub use languages::{LanguageId, HIGHLIGHTED_LANGUAGES};
pub use lines::line_ranges;
pub use parser::{Grammar, SyntaxParser, TreeSitterParser};
pub use query::QueryManager;
