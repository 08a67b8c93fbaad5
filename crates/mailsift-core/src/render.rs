//! Leaf renderers for `text/plain` and `text/html` parts.

use std::io::Write;

use mailsift_mime::TransferEncoding;
use tracing::debug;

use crate::decode::decode;
use crate::error::{Result, Traced};
use crate::filter::Filter;

/// Decodes a `text/plain` body and copies it verbatim to `out`.
///
/// # Errors
///
/// Returns an error if the body cannot be decoded or `out` fails.
pub fn render_plain<W: Write + ?Sized>(
    out: &mut W,
    body: &[u8],
    encoding: TransferEncoding,
    charset: Option<&str>,
) -> Result<()> {
    let text = decode(body, encoding, charset).traced()?;
    out.write_all(&text)?;
    debug!(bytes = text.len(), "rendered text/plain part");
    Ok(())
}

/// Decodes a `text/html` body, runs it through `renderer` and writes the
/// rendered text followed by a newline.
///
/// # Errors
///
/// Returns an error if the body cannot be decoded, the renderer fails, or
/// `out` fails.
pub fn render_html<W: Write + ?Sized>(
    out: &mut W,
    renderer: &dyn Filter,
    body: &[u8],
    encoding: TransferEncoding,
    charset: Option<&str>,
) -> Result<()> {
    let html = decode(body, encoding, charset).traced()?;
    let text = renderer.filter(&html).traced()?;
    out.write_all(&text)?;
    out.write_all(b"\n")?;
    debug!(html = html.len(), bytes = text.len(), "rendered text/html part");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn strip_tags(input: &[u8]) -> Result<Vec<u8>> {
        let mut depth = 0usize;
        Ok(input
            .iter()
            .copied()
            .filter(|&b| match b {
                b'<' => {
                    depth += 1;
                    false
                }
                b'>' => {
                    depth = depth.saturating_sub(1);
                    false
                }
                _ => depth == 0,
            })
            .collect())
    }

    #[test]
    fn test_render_plain_quoted_printable() {
        let mut out = Vec::new();
        render_plain(
            &mut out,
            b"na=C3=AFve=\r\n text",
            TransferEncoding::QuotedPrintable,
            Some("utf-8"),
        )
        .unwrap();
        assert_eq!(out, "naïve text".as_bytes());
    }

    #[test]
    fn test_render_html_appends_newline() {
        let mut out = Vec::new();
        render_html(
            &mut out,
            &strip_tags,
            b"<p>Hi <b>there</b></p>",
            TransferEncoding::SevenBit,
            None,
        )
        .unwrap();
        assert_eq!(out, b"Hi there\n");
    }

    #[test]
    fn test_render_html_renderer_failure() {
        let failing = |_: &[u8]| -> Result<Vec<u8>> { Err(Error::NoContent) };
        let mut out = Vec::new();
        let err = render_html(&mut out, &failing, b"<p/>", TransferEncoding::SevenBit, None)
            .unwrap_err();
        assert!(matches!(err.root(), Error::NoContent));
        assert!(out.is_empty());
    }
}
