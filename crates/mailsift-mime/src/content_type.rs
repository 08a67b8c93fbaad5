//! MIME content type handling.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "related").
    pub sub_type: String,
    /// Parameters keyed by lower-cased name (e.g., charset=utf-8, boundary=xxx).
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: HashMap::new(),
        }
    }

    /// Returns `type/subtype` without parameters.
    #[must_use]
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Looks up a parameter by name, ignoring ASCII case.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Returns the protocol parameter if present (multipart/encrypted, multipart/signed).
    #[must_use]
    pub fn protocol(&self) -> Option<&str> {
        self.parameter("protocol")
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="quoted value"`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContentType`] if the type or subtype is missing
    /// or not a token, or if a parameter is malformed or repeated.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(invalid("no media type"));
        }

        let (type_str, rest) = s.split_once(';').unwrap_or((s, ""));
        let (main_type, sub_type) = type_str
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid(format!("expected type/subtype, got {type_str:?}")))?;
        let (main_type, sub_type) = (main_type.trim(), sub_type.trim());

        if !is_token(main_type) {
            return Err(invalid(format!("invalid main type {main_type:?}")));
        }
        if !is_token(sub_type) {
            return Err(invalid(format!("invalid subtype {sub_type:?}")));
        }

        let mut content_type = Self::new(
            main_type.to_ascii_lowercase(),
            sub_type.to_ascii_lowercase(),
        );

        let mut chars = rest.chars().peekable();
        loop {
            skip_whitespace(&mut chars);
            if chars.peek().is_none() {
                break;
            }

            let name = take_token(&mut chars).to_ascii_lowercase();
            if name.is_empty() {
                return Err(invalid("empty parameter name"));
            }

            skip_whitespace(&mut chars);
            if chars.next() != Some('=') {
                return Err(invalid(format!("parameter {name:?} has no value")));
            }
            skip_whitespace(&mut chars);

            let value = if chars.peek() == Some(&'"') {
                chars.next();
                take_quoted(&mut chars)?
            } else {
                let value = take_token(&mut chars);
                if value.is_empty() {
                    return Err(invalid(format!("parameter {name:?} has an empty value")));
                }
                value
            };

            if content_type.parameters.contains_key(&name) {
                return Err(invalid(format!("duplicate parameter {name:?}")));
            }
            content_type.parameters.insert(name, value);

            // A trailing `;` with nothing after it is tolerated by the loop head.
            skip_whitespace(&mut chars);
            match chars.next() {
                None => break,
                Some(';') => {}
                Some(c) => return Err(invalid(format!("unexpected {c:?} after parameter"))),
            }
        }

        Ok(content_type)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidContentType(message.into())
}

/// RFC 2045 `tspecials`.
const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

fn is_token_char(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control() && c != ' ' && !TSPECIALS.contains(c)
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn take_token(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut token = String::new();
    while let Some(c) = chars.next_if(|&c| is_token_char(c)) {
        token.push(c);
    }
    token
}

/// Reads the rest of a quoted string; the opening quote is already consumed.
fn take_quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String> {
    let mut value = String::new();
    loop {
        match chars.next() {
            Some('"') => return Ok(value),
            Some('\\') => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => break,
            },
            Some(c) => value.push(c),
            None => break,
        }
    }
    Err(invalid("unterminated quoted string"))
}
