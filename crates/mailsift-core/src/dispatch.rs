//! Recursive walk over the MIME part tree.
//!
//! Each part is classified by its `Content-Type` and routed to a renderer, a
//! multipart split, or decryption. Containers recurse back into
//! [`Walker::walk`]'s dispatcher one level deeper, up to a fixed limit.

use std::io::Write;

use mailsift_mime::{ContentType, Headers, Message, MultipartReader, TransferEncoding};
use tracing::debug;

use crate::error::{Error, Result, Traced};
use crate::filter::Filter;
use crate::render::{render_html, render_plain};

/// The only `multipart/encrypted` protocol that can be decrypted (RFC 3156).
pub const PGP_ENCRYPTED_PROTOCOL: &str = "application/pgp-encrypted";

/// Default limit on multipart and decryption nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Read access to a part's header fields.
pub trait HeaderLookup {
    /// Returns the first value of the named header, if present.
    fn header(&self, key: &str) -> Option<&str>;
}

impl HeaderLookup for Headers {
    fn header(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

/// How the sub-parts of a `multipart/alternative` container are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlternativePolicy {
    /// Render every alternative, like `multipart/related`.
    #[default]
    RenderAll,
    /// Stop after the first alternative that rendered something.
    FirstRendered,
}

/// Walks a part tree, writing rendered content to `out`.
pub struct Walker<'a, W: Write> {
    out: W,
    decryptor: &'a dyn Filter,
    html_renderer: &'a dyn Filter,
    max_depth: usize,
    alternatives: AlternativePolicy,
}

impl<'a, W: Write> Walker<'a, W> {
    /// Creates a walker with the default depth limit and alternative policy.
    pub fn new(out: W, decryptor: &'a dyn Filter, html_renderer: &'a dyn Filter) -> Self {
        Self {
            out,
            decryptor,
            html_renderer,
            max_depth: DEFAULT_MAX_DEPTH,
            alternatives: AlternativePolicy::default(),
        }
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the `multipart/alternative` policy.
    #[must_use]
    pub fn alternatives(mut self, policy: AlternativePolicy) -> Self {
        self.alternatives = policy;
        self
    }

    /// Consumes the walker and returns the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Dispatches a top-level part and returns how many leaf parts were
    /// rendered.
    ///
    /// Parts with an unrecognized media type are skipped. Sub-parts are
    /// visited in order and the first error stops the walk; output already
    /// written for earlier parts stays written.
    ///
    /// # Errors
    ///
    /// Returns an error if a `Content-Type` is missing or malformed, a
    /// multipart body cannot be split, a payload cannot be decoded, an
    /// external filter fails, an encryption protocol is unsupported, or the
    /// nesting limit is exceeded.
    pub fn walk(&mut self, body: &[u8], headers: &dyn HeaderLookup) -> Result<usize> {
        self.dispatch(body, headers, 0)
    }

    fn dispatch(&mut self, body: &[u8], headers: &dyn HeaderLookup, depth: usize) -> Result<usize> {
        if depth > self.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        let content_type = parse_content_type(headers).traced()?;
        let encoding = headers
            .header("Content-Transfer-Encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse);
        let mime_type = content_type.mime_type();
        debug!(depth, %mime_type, %encoding, "dispatching part");

        match mime_type.as_str() {
            // TODO: pick a single preferred alternative once consumers agree on
            // which one; FirstRendered is the opt-in approximation.
            "multipart/alternative" => self
                .multipart(body, &content_type, depth, self.alternatives)
                .traced(),
            "multipart/related" => self
                .multipart(body, &content_type, depth, AlternativePolicy::RenderAll)
                .traced(),
            "multipart/encrypted" => self.encrypted(body, &content_type, depth).traced(),
            "text/plain" => {
                render_plain(&mut self.out, body, encoding, content_type.charset()).traced()?;
                Ok(1)
            }
            "text/html" => {
                render_html(
                    &mut self.out,
                    self.html_renderer,
                    body,
                    encoding,
                    content_type.charset(),
                )
                .traced()?;
                Ok(1)
            }
            _ => {
                debug!(depth, %mime_type, "skipping part");
                Ok(0)
            }
        }
    }

    fn multipart(
        &mut self,
        body: &[u8],
        content_type: &ContentType,
        depth: usize,
        policy: AlternativePolicy,
    ) -> Result<usize> {
        let boundary = content_type
            .boundary()
            .ok_or_else(|| Error::Multipart(mailsift_mime::Error::MissingBoundary))?;
        let mut parts = MultipartReader::new(body, boundary).map_err(Error::Multipart)?;

        let mut rendered = 0;
        while let Some(part) = parts.next_part().map_err(Error::Multipart).traced()? {
            rendered += self
                .dispatch(&part.body, &part.headers, depth + 1)
                .traced()?;
            if policy == AlternativePolicy::FirstRendered && rendered > 0 {
                debug!(depth, parts = parts.parts_read(), "alternative rendered, skipping the rest");
                break;
            }
        }
        Ok(rendered)
    }

    fn encrypted(&mut self, body: &[u8], content_type: &ContentType, depth: usize) -> Result<usize> {
        let protocol = content_type.protocol().unwrap_or_default();
        if !protocol.eq_ignore_ascii_case(PGP_ENCRYPTED_PROTOCOL) {
            return Err(Error::UnsupportedProtocol(protocol.to_string()));
        }

        let plaintext = self.decryptor.filter(body).traced()?;
        let message = Message::parse(&plaintext).traced()?;
        debug!(depth, bytes = plaintext.len(), "decrypted part");
        self.dispatch(&message.body, &message.headers, depth + 1)
    }
}

fn parse_content_type(headers: &dyn HeaderLookup) -> Result<ContentType> {
    let value = headers.header("Content-Type").ok_or_else(|| {
        Error::ContentType(mailsift_mime::Error::MissingHeader(
            "Content-Type".to_string(),
        ))
    })?;
    ContentType::parse(value).map_err(Error::ContentType)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn no_filter(_: &[u8]) -> Result<Vec<u8>> {
        Err(Error::Config("no filter expected".to_string()))
    }

    fn headers(content_type: &str) -> Headers {
        let mut headers = Headers::new();
        headers.add("Content-Type", content_type);
        headers
    }

    #[test]
    fn test_plain_part() {
        let mut walker = Walker::new(Vec::new(), &no_filter, &no_filter);
        let rendered = walker.walk(b"Hello, world!", &headers("text/plain")).unwrap();
        assert_eq!(rendered, 1);
        assert_eq!(walker.into_inner(), b"Hello, world!");
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let mut walker = Walker::new(Vec::new(), &no_filter, &no_filter);
        let rendered = walker
            .walk(b"\x89PNG", &headers("image/png; name=logo.png"))
            .unwrap();
        assert_eq!(rendered, 0);
        assert!(walker.into_inner().is_empty());
    }

    #[test]
    fn test_missing_content_type() {
        let mut walker = Walker::new(Vec::new(), &no_filter, &no_filter);
        let err = walker.walk(b"text", &Headers::new()).unwrap_err();
        assert!(matches!(
            err.root(),
            Error::ContentType(mailsift_mime::Error::MissingHeader(name)) if name == "Content-Type"
        ));
        assert!(err.to_string().ends_with(": missing Content-Type header"));
    }

    #[test]
    fn test_multipart_without_boundary() {
        let mut walker = Walker::new(Vec::new(), &no_filter, &no_filter);
        let err = walker
            .walk(b"--X\r\n\r\nx\r\n--X--", &headers("multipart/related"))
            .unwrap_err();
        assert!(matches!(
            err.root(),
            Error::Multipart(mailsift_mime::Error::MissingBoundary)
        ));
    }

    #[test]
    fn test_depth_limit_counts_containers() {
        let body = b"--A\r\nContent-Type: text/plain\r\n\r\ninner\r\n--A--\r\n";
        let mut walker = Walker::new(Vec::new(), &no_filter, &no_filter).max_depth(0);
        let err = walker
            .walk(body, &headers("multipart/related; boundary=A"))
            .unwrap_err();
        assert!(matches!(err.root(), Error::NestingTooDeep { limit: 0 }));

        let mut walker = Walker::new(Vec::new(), &no_filter, &no_filter).max_depth(1);
        assert_eq!(
            walker
                .walk(body, &headers("multipart/related; boundary=A"))
                .unwrap(),
            1
        );
    }
}
