//! Run configuration.

use crate::dispatch::{AlternativePolicy, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::filter::{DEFAULT_DECRYPT_COMMAND, DEFAULT_HTML_COMMAND};

/// How `text/html` parts are turned into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlRenderer {
    /// Pipe through an external command line (program and space-separated arguments).
    Command(String),
    /// Convert in-process to Markdown-flavoured text.
    Builtin,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::Command(DEFAULT_HTML_COMMAND.to_string())
    }
}

/// Settings fixed for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Renderer for `text/html` parts.
    pub html_renderer: HtmlRenderer,
    /// Command line used to decrypt `multipart/encrypted` parts.
    pub decrypt_command: String,
    /// Echo every header instead of only Date, From, To and Subject.
    pub verbose: bool,
    /// Maximum multipart/decryption nesting depth.
    pub max_depth: usize,
    /// Rendering policy for `multipart/alternative`.
    pub alternatives: AlternativePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            html_renderer: HtmlRenderer::default(),
            decrypt_command: DEFAULT_DECRYPT_COMMAND.to_string(),
            verbose: false,
            max_depth: DEFAULT_MAX_DEPTH,
            alternatives: AlternativePolicy::default(),
        }
    }
}

impl Config {
    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for blank commands or a zero depth limit.
    pub fn validate(&self) -> Result<()> {
        if self.decrypt_command.trim().is_empty() {
            return Err(Error::Config("decrypt command is empty".to_string()));
        }
        if let HtmlRenderer::Command(command) = &self.html_renderer
            && command.trim().is_empty()
        {
            return Err(Error::Config("HTML command is empty".to_string()));
        }
        if self.max_depth == 0 {
            return Err(Error::Config("max depth must be at least 1".to_string()));
        }
        Ok(())
    }
}
