//! Top-level extraction: framing, header echo, walk, and the final check.

use std::io::Write;

use mailsift_mime::{Message, strip_mbox_envelope};
use tracing::info;

use crate::config::{Config, HtmlRenderer};
use crate::dispatch::Walker;
use crate::error::{Error, Result, Traced};
use crate::filter::{CommandFilter, Filter, MarkdownFilter};
use crate::summary::write_header_block;

/// Outcome of a successful extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of leaf parts rendered.
    pub rendered: usize,
}

/// Extracts readable content from raw messages.
pub struct Extractor {
    config: Config,
    decryptor: Box<dyn Filter>,
    html_renderer: Box<dyn Filter>,
}

impl Extractor {
    /// Builds an extractor whose filters come from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let decryptor = Box::new(CommandFilter::parse(&config.decrypt_command)?);
        let html_renderer: Box<dyn Filter> = match &config.html_renderer {
            HtmlRenderer::Command(command) => Box::new(CommandFilter::parse(command)?),
            HtmlRenderer::Builtin => Box::new(MarkdownFilter),
        };
        Ok(Self {
            config,
            decryptor,
            html_renderer,
        })
    }

    /// Builds an extractor with caller-supplied filters.
    ///
    /// The filter settings in `config` are ignored.
    #[must_use]
    pub fn with_filters(
        config: Config,
        decryptor: Box<dyn Filter>,
        html_renderer: Box<dyn Filter>,
    ) -> Self {
        Self {
            config,
            decryptor,
            html_renderer,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Extracts `raw` (optionally preceded by an mbox `From ` line) into `out`.
    ///
    /// Writes the header block, then the content of every renderable part.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be parsed, any part fails, or
    /// nothing renderable was found ([`Error::NoContent`]).
    pub fn extract<W: Write>(&self, raw: &[u8], out: &mut W) -> Result<Summary> {
        let message = Message::parse(strip_mbox_envelope(raw)).traced()?;
        write_header_block(out, &message.headers, self.config.verbose).traced()?;

        let rendered = Walker::new(&mut *out, &*self.decryptor, &*self.html_renderer)
            .max_depth(self.config.max_depth)
            .alternatives(self.config.alternatives)
            .walk(&message.body, &message.headers)
            .traced()?;
        out.flush()?;

        if rendered == 0 {
            return Err(Error::NoContent).traced();
        }

        info!(rendered, "extraction finished");
        Ok(Summary { rendered })
    }
}
