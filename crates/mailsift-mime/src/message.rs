//! RFC 822 message framing.

use crate::error::{Error, Result};
use crate::header::{Headers, split_header_block};

/// Prefix of the mbox envelope line that may precede a message.
const MBOX_ENVELOPE_PREFIX: &[u8] = b"From ";

/// Removes a leading mbox `From ` envelope line, if present.
///
/// Everything up to and including the first `\n` is dropped. Input without
/// the prefix is returned unchanged.
#[must_use]
pub fn strip_mbox_envelope(raw: &[u8]) -> &[u8] {
    if !raw.starts_with(MBOX_ENVELOPE_PREFIX) {
        return raw;
    }
    raw.iter()
        .position(|&b| b == b'\n')
        .map_or(&raw[raw.len()..], |i| &raw[i + 1..])
}

/// MIME body part: headers plus the raw (still transfer-encoded) body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body (raw bytes).
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }
}

/// A complete message: top-level headers and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Message body (raw bytes).
    pub body: Vec<u8>,
}

impl Message {
    /// Parses a message.
    ///
    /// The header block ends at the first empty line; a message consisting
    /// only of headers has an empty body.
    ///
    /// # Errors
    ///
    /// Returns an error if the header block is malformed or contains no
    /// fields at all.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let (head, body) = split_header_block(raw);
        let headers = Headers::parse(head)?;
        if headers.is_empty() {
            return Err(Error::Parse("message has no header fields".to_string()));
        }
        Ok(Self {
            headers,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_mbox_envelope() {
        let raw = b"From alice@example.com Thu Jan  1 00:00:00 2026\nSubject: hi\n\nbody";
        assert_eq!(strip_mbox_envelope(raw), b"Subject: hi\n\nbody");
        assert_eq!(strip_mbox_envelope(b"From: alice\n\n"), b"From: alice\n\n");
        assert_eq!(strip_mbox_envelope(b"From nobody"), b"");
    }

    #[test]
    fn test_message_parse() {
        let message = Message::parse(
            b"Subject: Test\r\nContent-Type: text/plain; charset=utf-8\r\n\r\nHello, world!",
        )
        .unwrap();
        assert_eq!(message.headers.get("subject"), Some("Test"));
        assert_eq!(
            message.headers.get("CONTENT-TYPE"),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(message.body, b"Hello, world!");
    }

    #[test]
    fn test_message_headers_only() {
        let message = Message::parse(b"Subject: nothing else\r\n").unwrap();
        assert!(message.body.is_empty());
    }

    #[test]
    fn test_message_parse_rejects_garbage() {
        assert!(Message::parse(b"").is_err());
        assert!(Message::parse(b"\r\nbody without headers").is_err());
        assert!(matches!(
            Message::parse(b"not a header line\n\nbody"),
            Err(Error::InvalidHeader(_))
        ));
    }
}
