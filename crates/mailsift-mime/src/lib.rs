//! # mailsift-mime
//!
//! MIME primitives used by mailsift to take a message apart.
//!
//! ## Features
//!
//! - **Message framing**: RFC 822 header block and body, mbox envelope stripping
//! - **Headers**: ordered, case-insensitive lookup with folded-line support
//! - **Content types**: `type/subtype` with quoted parameters
//! - **Encodings**: Base64 and Quoted-Printable transfer encodings
//! - **Multipart**: boundary-delimited splitting with an explicit end-of-parts signal
//!
//! ## Quick Start
//!
//! ```
//! use mailsift_mime::{ContentType, Message, MultipartReader};
//!
//! let raw = b"Subject: Test\r\n\
//!             Content-Type: multipart/related; boundary=X\r\n\
//!             \r\n\
//!             --X\r\n\
//!             Content-Type: text/plain\r\n\
//!             \r\n\
//!             first\r\n\
//!             --X--\r\n";
//!
//! let message = Message::parse(raw)?;
//! let content_type = ContentType::parse(message.headers.get("content-type").unwrap_or(""))?;
//! assert_eq!(content_type.mime_type(), "multipart/related");
//!
//! let mut parts = MultipartReader::new(&message.body, content_type.boundary().unwrap_or(""))?;
//! while let Some(part) = parts.next_part()? {
//!     assert_eq!(part.body, b"first");
//! }
//! # Ok::<(), mailsift_mime::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;
mod multipart;

pub mod encoding;

pub use content_type::ContentType;
pub use encoding::TransferEncoding;
pub use error::{Error, Result};
pub use header::{Headers, canonical_name, split_header_block};
pub use message::{Message, Part, strip_mbox_envelope};
pub use multipart::MultipartReader;
