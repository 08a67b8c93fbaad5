//! Error types for the core library.

use std::io;
use std::panic::Location;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while extracting a message.
#[derive(Debug, Error)]
pub enum Error {
    /// Message framing or header block could not be parsed.
    #[error(transparent)]
    Mime(#[from] mailsift_mime::Error),

    /// `Content-Type` header missing or unparseable.
    #[error("{0}")]
    ContentType(#[source] mailsift_mime::Error),

    /// `multipart/encrypted` with a protocol other than PGP/MIME.
    #[error("unsupported multipart/encrypted protocol {0:?}")]
    UnsupportedProtocol(String),

    /// External program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying launch error.
        #[source]
        source: io::Error,
    },

    /// External program exited unsuccessfully.
    #[error("{program} failed: {status}")]
    ToolFailed {
        /// Program name.
        program: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
    },

    /// Transfer-encoded payload could not be decoded.
    #[error("{0}")]
    Decode(#[source] mailsift_mime::Error),

    /// Multipart body could not be split.
    #[error("{0}")]
    Multipart(#[source] mailsift_mime::Error),

    /// Parts nested deeper than the configured limit.
    #[error("parts nested deeper than {limit} levels")]
    NestingTooDeep {
        /// Configured maximum depth.
        limit: usize,
    },

    /// The whole message was walked without rendering anything.
    #[error("no renderable content found")]
    NoContent,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error annotated with the source location it propagated through.
    #[error("{location}: {inner}")]
    At {
        /// Where the error was propagated.
        location: &'static Location<'static>,
        /// The wrapped error.
        #[source]
        inner: Box<Error>,
    },
}

impl Error {
    /// Returns the innermost error, skipping location annotations.
    #[must_use]
    pub fn root(&self) -> &Self {
        let mut error = self;
        while let Self::At { inner, .. } = error {
            error = &**inner;
        }
        error
    }

    /// Returns the chain of locations, outermost first.
    #[must_use]
    pub fn locations(&self) -> Vec<&'static Location<'static>> {
        let mut locations = Vec::new();
        let mut error = self;
        while let Self::At { location, inner } = error {
            locations.push(*location);
            error = &**inner;
        }
        locations
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Annotates errors with the caller's source location.
pub(crate) trait Traced<T> {
    /// Wraps an error in [`Error::At`] pointing at the call site.
    fn traced(self) -> Result<T>;
}

impl<T, E: Into<Error>> Traced<T> for std::result::Result<T, E> {
    #[track_caller]
    fn traced(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Error::At {
                location: Location::caller(),
                inner: Box::new(error.into()),
            }),
        }
    }
}
