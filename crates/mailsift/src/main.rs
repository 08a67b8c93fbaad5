//! `mailsift` - prints the readable text of a MIME message.
//!
//! Reads one message (optionally preceded by an mbox `From ` line) from
//! stdin, echoes its main headers and writes the text of every plain, HTML
//! and PGP-encrypted part to stdout.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use mailsift_core::dispatch::DEFAULT_MAX_DEPTH;
use mailsift_core::filter::{DEFAULT_DECRYPT_COMMAND, DEFAULT_HTML_COMMAND};
use mailsift_core::{AlternativePolicy, Config, Extractor, HtmlRenderer};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mailsift", version)]
#[command(about = "Print the readable text of a MIME message read from stdin", long_about = None)]
struct Cli {
    /// Echo every header instead of only Date, From, To and Subject.
    #[arg(short, long)]
    verbose: bool,

    /// Command that renders text/html parts (program and space-separated arguments).
    #[arg(long, env = "MAILSIFT_HTML_CMD", default_value = DEFAULT_HTML_COMMAND)]
    html_cmd: String,

    /// Render text/html parts in-process instead of running --html-cmd.
    #[arg(long)]
    builtin_html: bool,

    /// Command that decrypts multipart/encrypted parts.
    #[arg(long, env = "MAILSIFT_DECRYPT_CMD", default_value = DEFAULT_DECRYPT_COMMAND)]
    decrypt_cmd: String,

    /// Maximum multipart and decryption nesting depth.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Stop each multipart/alternative after its first rendered part.
    #[arg(long)]
    first_alternative: bool,
}

impl Cli {
    fn config(self) -> Config {
        Config {
            html_renderer: if self.builtin_html {
                HtmlRenderer::Builtin
            } else {
                HtmlRenderer::Command(self.html_cmd)
            },
            decrypt_command: self.decrypt_cmd,
            verbose: self.verbose,
            max_depth: self.max_depth,
            alternatives: if self.first_alternative {
                AlternativePolicy::FirstRendered
            } else {
                AlternativePolicy::RenderAll
            },
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only extracted content.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsift=warn,mailsift_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let extractor = Extractor::new(cli.config())?;
    debug!(config = ?extractor.config(), "starting extraction");

    let mut raw = Vec::new();
    io::stdin().lock().read_to_end(&mut raw)?;

    let mut out = BufWriter::new(io::stdout().lock());
    let summary = extractor.extract(&raw, &mut out)?;
    out.flush()?;

    debug!(rendered = summary.rendered, "done");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Cli::try_parse_from(["mailsift"]).unwrap().config();
        assert!(!config.verbose);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.alternatives, AlternativePolicy::RenderAll);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_map_onto_config() {
        let config = Cli::try_parse_from([
            "mailsift",
            "-v",
            "--builtin-html",
            "--decrypt-cmd",
            "gpg --batch --decrypt",
            "--max-depth",
            "4",
            "--first-alternative",
        ])
        .unwrap()
        .config();
        assert!(config.verbose);
        assert_eq!(config.html_renderer, HtmlRenderer::Builtin);
        assert_eq!(config.decrypt_command, "gpg --batch --decrypt");
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.alternatives, AlternativePolicy::FirstRendered);
    }

    #[test]
    fn test_html_command() {
        let config = Cli::try_parse_from(["mailsift", "--html-cmd", "lynx -dump -stdin"])
            .unwrap()
            .config();
        assert_eq!(
            config.html_renderer,
            HtmlRenderer::Command("lynx -dump -stdin".to_string())
        );
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let config = Cli::try_parse_from(["mailsift", "--max-depth", "0"])
            .unwrap()
            .config();
        assert!(Extractor::new(config).is_err());
    }

    #[test]
    fn test_unknown_flag() {
        assert!(Cli::try_parse_from(["mailsift", "--html"]).is_err());
    }
}
