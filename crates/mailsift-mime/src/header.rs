//! MIME header handling.

use crate::error::{Error, Result};

/// Ordered collection of email headers.
///
/// Field order and the spelling of names as received are preserved; lookups
/// ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Groups fields by name.
    ///
    /// Each distinct name (compared case-insensitively) appears once, in order
    /// of first appearance, under its canonical spelling, with all its values.
    #[must_use]
    pub fn grouped(&self) -> Vec<(String, Vec<&str>)> {
        let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
        for (name, value) in &self.fields {
            let canonical = canonical_name(name);
            match groups.iter_mut().find(|(n, _)| *n == canonical) {
                Some((_, values)) => values.push(value.as_str()),
                None => groups.push((canonical, vec![value.as_str()])),
            }
        }
        groups
    }

    /// Parses a header block.
    ///
    /// Headers are in the format:
    /// ```text
    /// Header-Name: value
    ///   folded continuation
    /// ```
    ///
    /// Parsing stops at the first empty line. Both CRLF and LF line endings
    /// are accepted. Bytes that are not valid UTF-8 are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] for a line without a colon, a
    /// continuation line before the first field, or an empty field name.
    pub fn parse(block: &[u8]) -> Result<Self> {
        let mut headers = Self::new();
        let mut current: Option<(String, String)> = None;

        for raw_line in block.split(|&b| b == b'\n') {
            let line = String::from_utf8_lossy(raw_line.strip_suffix(b"\r").unwrap_or(raw_line));

            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                let Some((_, value)) = current.as_mut() else {
                    return Err(Error::InvalidHeader(format!(
                        "continuation line before first field: {line:?}"
                    )));
                };
                let folded = line.trim();
                if !folded.is_empty() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(folded);
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                headers.add(name, value);
            }

            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| Error::InvalidHeader(format!("malformed header line: {line:?}")))?;
            let name = name.trim_end();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(Error::InvalidHeader(format!("invalid field name: {name:?}")));
            }
            current = Some((name.to_string(), value.trim().to_string()));
        }

        if let Some((name, value)) = current {
            headers.add(name, value);
        }

        Ok(headers)
    }
}

/// Splits raw bytes into a header block and the body after the first empty line.
///
/// The returned header block excludes the empty line. When there is no empty
/// line the whole input is the header block and the body is empty.
#[must_use]
pub fn split_header_block(raw: &[u8]) -> (&[u8], &[u8]) {
    let mut line_start = 0;
    while line_start < raw.len() {
        let line_end = raw[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(raw.len(), |i| line_start + i + 1);
        let line = &raw[line_start..line_end];
        if line == b"\n" || line == b"\r\n" {
            return (&raw[..line_start], &raw[line_end..]);
        }
        line_start = line_end;
    }
    (raw, &[][..])
}

/// Canonicalizes a header name (e.g., "content-type" -> "Content-Type").
#[must_use]
pub fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
        assert_eq!(headers.get("Content-Transfer-Encoding"), None);
    }

    #[test]
    fn test_headers_parse() {
        let text = concat!(
            "From: sender@example.com\r\n",
            "To: recipient@example.com\r\n",
            "Subject: Test Message\r\n",
            "Content-Type: text/plain;\r\n",
            " charset=utf-8\r\n",
            "\r\n",
            "Body: not a header\r\n"
        );

        let headers = Headers::parse(text.as_bytes()).unwrap();
        assert_eq!(headers.grouped().len(), 4);
        assert_eq!(headers.get("From"), Some("sender@example.com"));
        assert_eq!(headers.get("Subject"), Some("Test Message"));
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(headers.get("Body"), None);
    }

    #[test]
    fn test_headers_parse_lf_and_tabs() {
        let headers = Headers::parse(b"Subject: a\n\tlong\n  subject\nX-Empty:\n").unwrap();
        assert_eq!(headers.get("subject"), Some("a long subject"));
        assert_eq!(headers.get("x-empty"), Some(""));
    }

    #[test]
    fn test_headers_parse_malformed() {
        assert!(matches!(
            Headers::parse(b"this is not a header\n"),
            Err(Error::InvalidHeader(_))
        ));
        assert!(matches!(
            Headers::parse(b" leading continuation\n"),
            Err(Error::InvalidHeader(_))
        ));
        assert!(matches!(
            Headers::parse(b": no name\n"),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_grouped_keeps_first_appearance_order() {
        let headers =
            Headers::parse(b"received: a\nSubject: s\nReceived: b\nDATE: d\n").unwrap();
        let grouped = headers.grouped();
        assert_eq!(
            grouped,
            vec![
                ("Received".to_string(), vec!["a", "b"]),
                ("Subject".to_string(), vec!["s"]),
                ("Date".to_string(), vec!["d"]),
            ]
        );
    }

    #[test]
    fn test_split_header_block() {
        let (head, body) = split_header_block(b"A: 1\r\nB: 2\r\n\r\nbody\r\n\r\nmore");
        assert_eq!(head, b"A: 1\r\nB: 2\r\n");
        assert_eq!(body, b"body\r\n\r\nmore");

        let (head, body) = split_header_block(b"\nbody only");
        assert!(head.is_empty());
        assert_eq!(body, b"body only");

        let (head, body) = split_header_block(b"A: 1\nB: 2");
        assert_eq!(head, b"A: 1\nB: 2");
        assert!(body.is_empty());
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("MIME-Version"), "Mime-Version");
        assert_eq!(canonical_name("x--odd"), "X--Odd");
    }
}
