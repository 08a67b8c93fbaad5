//! Header block echoed before the message content.

use std::io::{self, Write};

use mailsift_mime::Headers;

/// Headers shown when not in verbose mode.
pub const SUMMARY_HEADERS: [&str; 4] = ["Date", "From", "To", "Subject"];

/// Returns true if the named header is echoed.
#[must_use]
pub fn is_displayed(name: &str, verbose: bool) -> bool {
    verbose
        || SUMMARY_HEADERS
            .iter()
            .any(|shown| shown.eq_ignore_ascii_case(name))
}

/// Writes `Name: value` lines for the selected headers, then a blank line.
///
/// Repeated headers are written once with their values joined by a space.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_header_block<W: Write + ?Sized>(
    out: &mut W,
    headers: &Headers,
    verbose: bool,
) -> io::Result<()> {
    for (name, values) in headers.grouped() {
        if is_displayed(&name, verbose) {
            writeln!(out, "{name}: {}", values.join(" "))?;
        }
    }
    writeln!(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Headers {
        Headers::parse(
            b"Received: by mx\r\n\
              from: alice@example.com\r\n\
              To: bob@example.com\r\n\
              To: carol@example.com\r\n\
              Subject: Lunch\r\n\
              Content-Type: text/plain\r\n",
        )
        .unwrap()
    }

    #[test]
    fn test_default_header_block() {
        let mut out = Vec::new();
        write_header_block(&mut out, &sample(), false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "From: alice@example.com\n\
             To: bob@example.com carol@example.com\n\
             Subject: Lunch\n\
             \n"
        );
    }

    #[test]
    fn test_verbose_header_block() {
        let mut out = Vec::new();
        write_header_block(&mut out, &sample(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Received: by mx\n"));
        assert!(text.contains("Content-Type: text/plain\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_empty_headers_still_write_separator() {
        let mut out = Vec::new();
        write_header_block(&mut out, &Headers::new(), false).unwrap();
        assert_eq!(out, b"\n");
    }
}
