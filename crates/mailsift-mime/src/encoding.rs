//! Content transfer encodings.
//!
//! Supports Base64 and Quoted-Printable (RFC 2045). Decoders work on raw
//! bytes so that 8-bit payloads survive untouched.

use crate::error::Result;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine, alphabet};
use std::fmt;

/// Standard padded Base64 that tolerates non-zero bits in the final symbol,
/// as many mailers emit them.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// 7-bit ASCII, also used when the header is absent or unknown.
    #[default]
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from a `Content-Transfer-Encoding` value.
    ///
    /// Unknown values fall back to [`TransferEncoding::SevenBit`], which is
    /// decoded as identity.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit,
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decodes Base64 data, ignoring line breaks and other ASCII whitespace.
///
/// # Errors
///
/// Returns an error if the input is not valid padded standard Base64.
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    BASE64.decode(cleaned).map_err(Into::into)
}

/// Maximum line length for Quoted-Printable encoding.
const MAX_LINE_LENGTH: usize = 76;

/// Encodes bytes using Quoted-Printable encoding (RFC 2045).
///
/// Every byte outside printable ASCII, including line breaks, is escaped, so
/// the output only contains soft line breaks.
#[must_use]
pub fn encode_quoted_printable(data: &[u8]) -> String {
    let mut result = String::new();
    let mut line_length = 0;

    for (i, &byte) in data.iter().enumerate() {
        if line_length >= MAX_LINE_LENGTH - 3 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        match byte {
            b'!'..=b'<' | b'>'..=b'~' => {
                result.push(char::from(byte));
                line_length += 1;
            }
            // Trailing spaces are stripped by decoders, so escape the last one.
            b' ' if i + 1 < data.len() => {
                result.push(' ');
                line_length += 1;
            }
            _ => {
                result.push('=');
                result.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
                result.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
                line_length += 3;
            }
        }
    }

    result
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Decodes Quoted-Printable data (RFC 2045).
///
/// Hard line breaks are kept as they appear in the input; soft line breaks
/// (`=` at the end of a line) are removed together with trailing whitespace
/// on each encoded line. An `=` that is not followed by two hex digits is
/// kept literally, so unencoded text such as `?a=1&b=2` survives.
#[must_use]
pub fn decode_quoted_printable(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());

    for line in data.split_inclusive(|&b| b == b'\n') {
        let (content, ending) = split_line_ending(line);
        let content = trim_trailing_whitespace(content);
        let (mut content, soft_break) = content
            .strip_suffix(b"=")
            .map_or((content, false), |c| (c, true));

        while let Some((&byte, rest)) = content.split_first() {
            if let Some((decoded, tail)) = escaped_byte(content) {
                result.push(decoded);
                content = tail;
            } else {
                result.push(byte);
                content = rest;
            }
        }

        if !soft_break {
            result.extend_from_slice(ending);
        }
    }

    result
}

fn split_line_ending(line: &[u8]) -> (&[u8], &[u8]) {
    if let Some(content) = line.strip_suffix(b"\r\n") {
        (content, b"\r\n".as_slice())
    } else if let Some(content) = line.strip_suffix(b"\n") {
        (content, b"\n".as_slice())
    } else {
        (line, &[][..])
    }
}

fn trim_trailing_whitespace(mut content: &[u8]) -> &[u8] {
    while let [rest @ .., b' ' | b'\t'] = content {
        content = rest;
    }
    content
}

/// Decodes a leading `=XX` escape, returning the byte and the remaining input.
fn escaped_byte(input: &[u8]) -> Option<(u8, &[u8])> {
    let [b'=', high, low, rest @ ..] = input else {
        return None;
    };
    Some(((hex_value(*high)? << 4) | hex_value(*low)?, rest))
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}
