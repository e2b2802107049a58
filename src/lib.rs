//! Token syntax highlighting
//!
//! This crate turns tree-sitter captures into per-line highlight tokens for
//! the editor, caching each line's tokens until the line, the tree, the query
//! or the theme changes.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod syntax;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use config::HighlightConfig;
pub use syntax::{HighlightError, HighlightToken, Highlighter, LineId};
pub use theme::{Theme, ThemePolicy};
