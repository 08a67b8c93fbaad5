//! Byte filters: external programs (decryption, HTML rendering) and the
//! built-in HTML renderer.
//!
//! The walker only sees the [`Filter`] trait, so tests can plug in closures
//! instead of installed binaries.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default command used to decrypt `multipart/encrypted` bodies.
pub const DEFAULT_DECRYPT_COMMAND: &str = "gpg --decrypt";

/// Default command used to render `text/html` parts as text.
pub const DEFAULT_HTML_COMMAND: &str = "w3m -T text/html";

/// Transforms a byte stream into another, synchronously.
pub trait Filter {
    /// Runs the filter over `input` and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter cannot run or reports failure.
    fn filter(&self, input: &[u8]) -> Result<Vec<u8>>;
}

impl<F> Filter for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
{
    fn filter(&self, input: &[u8]) -> Result<Vec<u8>> {
        self(input)
    }
}

/// Runs an external program with the input on stdin and captures stdout.
///
/// Stderr is inherited so diagnostics from the tool (e.g. gpg prompts) reach
/// the terminal. There is no timeout: a hung program hangs the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFilter {
    program: String,
    args: Vec<String>,
}

impl CommandFilter {
    /// Creates a filter from a program name and arguments.
    #[must_use]
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a filter from a command line split on spaces.
    ///
    /// Quoting is not supported, so arguments cannot contain spaces. Runs of
    /// spaces are treated as a single separator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the command line is blank.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut words = command_line.split(' ').filter(|w| !w.is_empty());
        let program = words
            .next()
            .ok_or_else(|| Error::Config("empty command line".to_string()))?;
        Ok(Self::new(program, words))
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Program arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Filter for CommandFilter {
    fn filter(&self, input: &[u8]) -> Result<Vec<u8>> {
        debug!(program = %self.program, args = ?self.args, bytes = input.len(), "running filter");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("child stdin was not captured"))?;

        // Feed stdin from another thread so a tool that writes before it has
        // read everything cannot deadlock against us.
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || {
                let written = stdin.write_all(input);
                drop(stdin);
                written
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output?;
        if !output.status.success() {
            warn!(program = %self.program, status = %output.status, "filter failed");
            return Err(Error::ToolFailed {
                program: self.program.clone(),
                status: output.status,
            });
        }

        // The tool is allowed to stop reading once it has what it needs.
        if let Err(e) = written
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(e.into());
        }

        debug!(program = %self.program, bytes = output.stdout.len(), "filter finished");
        Ok(output.stdout)
    }
}

/// Renders HTML in-process as Markdown-flavoured text using `htmd`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFilter;

impl Filter for MarkdownFilter {
    fn filter(&self, input: &[u8]) -> Result<Vec<u8>> {
        let html = String::from_utf8_lossy(input);
        let text = htmd::convert(&html)?;
        Ok(text.into_bytes())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let filter = CommandFilter::parse(DEFAULT_HTML_COMMAND).unwrap();
        assert_eq!(filter.program(), "w3m");
        assert_eq!(filter.args(), ["-T", "text/html"]);

        let filter = CommandFilter::parse("  lynx   -dump -stdin ").unwrap();
        assert_eq!(filter.program(), "lynx");
        assert_eq!(filter.args(), ["-dump", "-stdin"]);
    }

    #[test]
    fn test_parse_empty_command_line() {
        assert!(matches!(CommandFilter::parse("   "), Err(Error::Config(_))));
    }

    #[test]
    fn test_closure_filter() {
        let upper = |input: &[u8]| -> Result<Vec<u8>> { Ok(input.to_ascii_uppercase()) };
        assert_eq!(upper.filter(b"abc").unwrap(), b"ABC");
    }

    #[test]
    fn test_markdown_filter() {
        let text = MarkdownFilter.filter(b"<p>Hello <b>world</b></p>").unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
        assert!(!text.contains("<b>"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_filter_round_trips_through_cat() {
        let input = vec![b'x'; 256 * 1024];
        let output = CommandFilter::new("cat", Vec::<String>::new())
            .filter(&input)
            .unwrap();
        assert_eq!(output, input);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_filter_failure_status() {
        let err = CommandFilter::new("false", Vec::<String>::new())
            .filter(b"ignored")
            .unwrap_err();
        assert!(matches!(err, Error::ToolFailed { ref program, .. } if program == "false"));
    }

    #[test]
    fn test_command_filter_missing_program() {
        let err = CommandFilter::parse("mailsift-no-such-program --flag")
            .unwrap()
            .filter(b"")
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
