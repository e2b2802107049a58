//! Command-line argument parsing for the highlighter
//!
//! Supports:
//! - Highlighting a file and printing its tokens line by line
//! - Overriding the theme and language
//! - JSON output for piping into other tools
//! - Listing available themes

use clap::Parser;
use std::path::PathBuf;

use crate::config::HighlightConfig;
use crate::syntax::LanguageId;

/// Print tree-sitter highlight tokens for a file
#[derive(Parser, Debug)]
#[command(name = "token-syntax", version, about = "Print syntax highlight tokens")]
pub struct CliArgs {
    /// File to highlight
    #[arg(
        value_name = "FILE",
        required_unless_present_any = ["list_themes", "save_theme"]
    )]
    pub file: Option<PathBuf>,

    /// Theme id (defaults to the configured theme)
    #[arg(short, long, value_name = "ID")]
    pub theme: Option<String>,

    /// Language name, e.g. "rust" (defaults to detection from the extension)
    #[arg(short, long, value_name = "NAME")]
    pub language: Option<String>,

    /// Only print lines N..=M (1-indexed), e.g. "10:20"
    #[arg(long, value_name = "N:M")]
    pub lines: Option<String>,

    /// Emit one JSON object per line instead of text
    #[arg(long)]
    pub json: bool,

    /// List available themes and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Store `--theme` as the default theme in the config file
    #[arg(long, requires = "theme")]
    pub save_theme: bool,

    /// Raise console log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Language from `--language`, or detected from the file name
    pub fn resolve_language(&self, config: &HighlightConfig) -> Result<LanguageId, String> {
        if let Some(name) = &self.language {
            return LanguageId::from_name(name).ok_or_else(|| format!("Unknown language: {}", name));
        }
        Ok(self
            .file
            .as_deref()
            .map(|path| config.language_for(path))
            .unwrap_or_default())
    }

    /// Parse `--lines` into a 0-indexed inclusive range
    pub fn line_filter(&self) -> Result<Option<(usize, usize)>, String> {
        let Some(spec) = &self.lines else {
            return Ok(None);
        };

        let parse = |s: &str| {
            s.trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| format!("Invalid line number in --lines: {}", spec))
        };

        let (first, last) = match spec.split_once(':') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let n = parse(spec)?;
                (n, n)
            }
        };
        if last < first {
            return Err(format!("Empty line range: {}", spec));
        }
        Ok(Some((first - 1, last - 1)))
    }
}
