//! Transfer-encoding decoder for part bodies.

use std::borrow::Cow;

use mailsift_mime::TransferEncoding;
use mailsift_mime::encoding::{decode_base64, decode_quoted_printable};
use tracing::trace;

use crate::error::{Error, Result};

/// Decodes a part body according to its transfer encoding.
///
/// Base64 and Quoted-Printable bodies are decoded; every other encoding is
/// passed through unchanged and borrowed. The charset is carried for
/// diagnostics only: text is emitted in whatever charset it was declared in.
/// Quoted-Printable decoding never fails; broken escapes are kept as text.
///
/// # Errors
///
/// Returns [`Error::Decode`] if a Base64 payload is malformed.
pub fn decode<'a>(
    body: &'a [u8],
    encoding: TransferEncoding,
    charset: Option<&str>,
) -> Result<Cow<'a, [u8]>> {
    let decoded = match encoding {
        TransferEncoding::Base64 => Cow::Owned(decode_base64(body).map_err(Error::Decode)?),
        TransferEncoding::QuotedPrintable => Cow::Owned(decode_quoted_printable(body)),
        TransferEncoding::SevenBit | TransferEncoding::EightBit | TransferEncoding::Binary => {
            Cow::Borrowed(body)
        }
    };
    trace!(
        %encoding,
        charset = charset.unwrap_or("unspecified"),
        raw = body.len(),
        decoded = decoded.len(),
        "decoded part body"
    );
    Ok(decoded)
}
