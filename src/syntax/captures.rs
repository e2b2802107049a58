//! Capture extraction
//!
//! Runs the compiled highlight query over the parser's latest tree, limited
//! to the nodes intersecting a byte range. Captures keep the order the query
//! cursor yields them in (start position, then pattern order) and are not
//! clipped here.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor, Tree};

use super::error::HighlightError;
use super::highlights::{ByteRange, Capture};
use super::parser::SyntaxParser;

/// Check preconditions in order (parser, tree, query), then run the query.
pub fn captures<P: SyntaxParser + ?Sized>(
    parser: Option<&P>,
    query: Option<&Query>,
    range: ByteRange,
) -> Result<Vec<Capture>, HighlightError> {
    let parser = parser.ok_or(HighlightError::ParserUnavailable)?;
    let tree = parser.latest_tree().ok_or(HighlightError::TreeUnavailable)?;
    let query = query.ok_or(HighlightError::HighlightsQueryUnavailable)?;

    Ok(run_query(query, tree, parser.text(), range))
}

fn run_query(query: &Query, tree: &Tree, text: &[u8], range: ByteRange) -> Vec<Capture> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    cursor.set_byte_range(range.as_range());

    let mut result = Vec::new();
    let mut matches = cursor.captures(query, tree.root_node(), text);
    while let Some((query_match, capture_idx)) = matches.next() {
        let capture = &query_match.captures[*capture_idx];
        let name = names[capture.index as usize];

        // Underscore captures only feed predicates
        if name.starts_with('_') {
            continue;
        }

        let node = capture.node;
        result.push(Capture::new(
            name,
            ByteRange::from_bounds(node.start_byte(), node.end_byte()),
        ));
    }

    tracing::trace!(
        "Extracted {} captures for bytes {}..{}",
        result.len(),
        range.start,
        range.end()
    );
    result
}
