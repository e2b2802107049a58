//! Log setup for the highlighter binary
//!
//! The console level comes from `RUST_LOG` when set, otherwise from the
//! number of `-v` flags:
//! - `RUST_LOG=token_syntax::syntax=trace` - cache misses and incremental edits
//! - `-vv` - debug for everything
//!
//! A second layer appends to `~/.config/token-editor/logs/token-syntax.log`
//! (rotated daily) at debug level regardless of the console setting.

use std::path::Path;

use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::syntax::LanguageId;

const LOG_FILE: &str = "token-syntax.log";

/// Console level used when `RUST_LOG` is not set
pub fn console_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the console (stderr) and rolling file layers
pub fn init(verbose: u8) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level(verbose)));

    // Token output owns stdout
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => Some(
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(logs_dir, LOG_FILE))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new("debug")),
        ),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Span wrapping one highlighting run, so every event carries the file
pub fn file_span(path: &Path, language: LanguageId) -> Span {
    tracing::info_span!(
        "highlight",
        file = %path.display(),
        language = language.short_name()
    )
}
