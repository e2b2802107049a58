use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use token_syntax::cli::CliArgs;
use token_syntax::syntax::{line_ranges, HighlightToken, Highlighter, LineId, TreeSitterParser};
use token_syntax::theme::{list_available_themes, load_theme, ThemeSource};
use token_syntax::HighlightConfig;

#[derive(Serialize)]
struct LineOutput<'a> {
    line: usize,
    tokens: &'a [HighlightToken],
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    token_syntax::tracing::init(args.verbose);

    if args.list_themes {
        for info in list_available_themes() {
            let source = match info.source {
                ThemeSource::User => "user",
                ThemeSource::Builtin => "builtin",
            };
            println!("{:<20} {:<24} {}", info.id, info.name, source);
        }
        return Ok(());
    }

    let mut config = HighlightConfig::load();
    let theme_id = args.theme.as_deref().unwrap_or(&config.theme).to_string();
    let theme = load_theme(&theme_id).map_err(anyhow::Error::msg)?;

    if args.save_theme {
        config.theme = theme_id;
        config.save().map_err(anyhow::Error::msg)?;
    }

    let Some(path) = args.file.as_deref() else {
        if args.save_theme {
            return Ok(());
        }
        bail!("No file given");
    };

    let language = args.resolve_language(&config).map_err(anyhow::Error::msg)?;
    let line_filter = args.line_filter().map_err(anyhow::Error::msg)?;
    let Some(grammar) = config.grammar(language) else {
        bail!(
            "No syntax highlighting for {} ({})",
            path.display(),
            language.display_name()
        );
    };

    let _span = token_syntax::tracing::file_span(path, language).entered();

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut parser = TreeSitterParser::new(grammar).map_err(anyhow::Error::msg)?;
    if !parser.parse(&source) {
        bail!("Failed to parse {}", path.display());
    }

    let mut highlighter = Highlighter::with_parser(parser, theme);
    highlighter.prepare();
    if highlighter.query().is_none() {
        bail!(
            "Highlight query for {} failed to compile (see log)",
            language.display_name()
        );
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for (idx, range) in line_ranges(&source).into_iter().enumerate() {
        if let Some((first, last)) = line_filter {
            if idx < first || idx > last {
                continue;
            }
        }

        let tokens = highlighter.tokens_for_line(LineId::new(idx as u64), range)?;

        if args.json {
            let line = LineOutput {
                line: idx + 1,
                tokens,
            };
            serde_json::to_writer(&mut out, &line)?;
            writeln!(out)?;
            continue;
        }

        let text = &source[range.as_range()];
        for token in tokens {
            let fragment = &text.as_bytes()[token.range.as_range()];
            let font = match (token.font.bold, token.font.italic) {
                (true, true) => "bold+italic",
                (true, false) => "bold",
                (false, true) => "italic",
                (false, false) => "",
            };
            writeln!(
                out,
                "{:>5} {:>4}..{:<4} {:<9} {:<11} {:?}",
                idx + 1,
                token.range.start,
                token.range.end(),
                token.color.map(|c| c.to_hex()).unwrap_or_default(),
                font,
                String::from_utf8_lossy(fragment)
            )?;
        }
    }

    out.flush()?;
    Ok(())
}
