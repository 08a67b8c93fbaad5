//! Errors raised while parsing MIME structure.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed input, by the layer that rejected it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header block line that is neither a field nor a continuation.
    #[error("malformed header: {0}")]
    InvalidHeader(String),

    /// A media type that is not `type/subtype *(; name=value)`.
    #[error("malformed Content-Type: {0}")]
    InvalidContentType(String),

    /// A header that must be present is absent.
    #[error("missing {0} header")]
    MissingHeader(String),

    /// A bad base64 payload.
    #[error("invalid base64 data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// A multipart container without a usable `boundary` parameter.
    #[error("multipart container has no boundary")]
    MissingBoundary,

    /// A multipart body whose delimiters or part headers are broken.
    #[error("malformed multipart body: {0}")]
    InvalidMultipart(String),

    /// Input that is not a message at all.
    #[error("not a message: {0}")]
    Parse(String),
}
