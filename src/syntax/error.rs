use thiserror::Error;

/// Why captures could not be extracted. All of these are recoverable:
/// they clear up once a parser is configured, a parse completes, or
/// `prepare()` compiles the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HighlightError {
    #[error("no parser configured")]
    ParserUnavailable,
    #[error("parser has not produced a tree yet")]
    TreeUnavailable,
    #[error("highlight query not compiled")]
    HighlightsQueryUnavailable,
}
