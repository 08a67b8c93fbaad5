//! # mailsift-core
//!
//! Extracts the readable content of a MIME message.
//!
//! This crate provides:
//! - A recursive part walker that routes each part by media type
//! - Transfer-encoding decoding for part bodies
//! - `text/plain` and `text/html` renderers
//! - PGP/MIME decryption through an external program
//! - The header block echoed before the content
//!
//! External programs sit behind the [`Filter`] trait, so any
//! `Fn(&[u8]) -> Result<Vec<u8>>` can stand in for them.
//!
//! ```
//! use mailsift_core::{Config, Extractor, Result};
//!
//! let shout = |html: &[u8]| -> Result<Vec<u8>> { Ok(html.to_ascii_uppercase()) };
//! let unused = |_: &[u8]| -> Result<Vec<u8>> { Ok(Vec::new()) };
//! let extractor = Extractor::with_filters(Config::default(), Box::new(unused), Box::new(shout));
//!
//! let mut out = Vec::new();
//! let summary = extractor.extract(
//!     b"Subject: hi\r\nContent-Type: text/html\r\n\r\n<p>hello</p>",
//!     &mut out,
//! )?;
//! assert_eq!(summary.rendered, 1);
//! assert_eq!(out, b"Subject: hi\n\n<P>HELLO</P>\n");
//! # Ok::<(), mailsift_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod decode;
pub mod dispatch;
mod error;
pub mod extract;
pub mod filter;
pub mod render;
pub mod summary;

pub use config::{Config, HtmlRenderer};
pub use decode::decode;
pub use dispatch::{AlternativePolicy, HeaderLookup, PGP_ENCRYPTED_PROTOCOL, Walker};
pub use error::{Error, Result};
pub use extract::{Extractor, Summary};
pub use filter::{CommandFilter, Filter, MarkdownFilter};
pub use summary::write_header_block;
