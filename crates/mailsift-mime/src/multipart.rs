//! Multipart body splitting (RFC 2046 §5.1).

use crate::error::{Error, Result};
use crate::header::{Headers, split_header_block};
use crate::message::Part;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the first delimiter; preamble lines are skipped.
    Preamble,
    /// Positioned at the start of a part.
    Parts,
    /// The close delimiter has been read.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    /// `--boundary`
    Next,
    /// `--boundary--`
    Close,
}

/// Splits a multipart body into its parts, in order.
///
/// [`MultipartReader::next_part`] yields `Ok(None)` once the close delimiter
/// has been read; that is the normal end of iteration, not an error.
#[derive(Debug)]
pub struct MultipartReader<'a> {
    body: &'a [u8],
    dash_boundary: Vec<u8>,
    pos: usize,
    state: State,
    parts_read: usize,
}

impl<'a> MultipartReader<'a> {
    /// Creates a reader over `body` using the given boundary parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBoundary`] if the boundary is empty.
    pub fn new(body: &'a [u8], boundary: &str) -> Result<Self> {
        if boundary.is_empty() {
            return Err(Error::MissingBoundary);
        }
        let mut dash_boundary = b"--".to_vec();
        dash_boundary.extend_from_slice(boundary.as_bytes());
        Ok(Self {
            body,
            dash_boundary,
            pos: 0,
            state: State::Preamble,
            parts_read: 0,
        })
    }

    /// Number of parts returned so far.
    #[must_use]
    pub const fn parts_read(&self) -> usize {
        self.parts_read
    }

    /// Returns the next part, or `None` after the close delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMultipart`] if no delimiter is found, if the
    /// body ends inside a part, or if a part's header block is malformed.
    pub fn next_part(&mut self) -> Result<Option<Part>> {
        match self.state {
            State::Done => Ok(None),
            State::Preamble => {
                let Some((_, delimiter, after)) = self.find_delimiter(self.pos) else {
                    return Err(Error::InvalidMultipart(
                        "no boundary delimiter found".to_string(),
                    ));
                };
                self.pos = after;
                if delimiter == Delimiter::Close {
                    self.state = State::Done;
                    return Ok(None);
                }
                self.state = State::Parts;
                self.next_part()
            }
            State::Parts => {
                let start = self.pos;
                let Some((line_start, delimiter, after)) = self.find_delimiter(start) else {
                    return Err(Error::InvalidMultipart(format!(
                        "unexpected end of body in part {}",
                        self.parts_read + 1
                    )));
                };

                // The line break before a delimiter belongs to the delimiter.
                let content = &self.body[start..line_start];
                let content = content
                    .strip_suffix(b"\r\n")
                    .or_else(|| content.strip_suffix(b"\n"))
                    .unwrap_or(content);

                let (head, body) = split_header_block(content);
                let headers = Headers::parse(head).map_err(|e| {
                    Error::InvalidMultipart(format!("part {}: {e}", self.parts_read + 1))
                })?;

                self.pos = after;
                self.parts_read += 1;
                if delimiter == Delimiter::Close {
                    self.state = State::Done;
                }
                Ok(Some(Part::new(headers, body.to_vec())))
            }
        }
    }

    /// Finds the next delimiter line at or after `from`.
    ///
    /// Returns the offset of the delimiter line, its kind, and the offset just
    /// past its line ending.
    fn find_delimiter(&self, from: usize) -> Option<(usize, Delimiter, usize)> {
        let mut line_start = from;
        while line_start < self.body.len() {
            let line_end = self.body[line_start..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(self.body.len(), |i| line_start + i + 1);
            if let Some(delimiter) = self.classify(&self.body[line_start..line_end]) {
                return Some((line_start, delimiter, line_end));
            }
            line_start = line_end;
        }
        None
    }

    fn classify(&self, line: &[u8]) -> Option<Delimiter> {
        let rest = line.strip_prefix(self.dash_boundary.as_slice())?;
        let (kind, rest) = rest
            .strip_prefix(b"--")
            .map_or((Delimiter::Next, rest), |r| (Delimiter::Close, r));
        rest.iter()
            .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
            .then_some(kind)
    }
}
