//! smime-rs: MIME canonicalization for S/MIME signing
//!
//! A small utility crate that normalizes a MIME message into the exact
//! byte form required before cryptographic signing, plus the byte-sink
//! writer that serialization runs through.
//!
//! # Features
//!
//! - **Canonicalizer**: serialize, normalize line endings to CRLF, parse
//!   back — the result re-serializes to byte-identical output
//! - **Byte sink writer**: full-buffer, untransformed transcription into
//!   any `io::Write` sink
//! - **Mail library boundary**: message construction and parsing are
//!   delegated to `mail-builder` and `mail-parser`, never reimplemented
//!
//! # Example
//!
//! ```
//! use smime_rs::{canonicalize, Message, Session};
//!
//! # fn main() -> smime_rs::Result<()> {
//! let session = Session::default();
//! let message = Message::builder()
//!     .header("Subject", "Hello")
//!     .text_body("Hello, World!")
//!     .build(&session)?;
//!
//! let canonical = canonicalize(&session, &message)?;
//! assert_eq!(canonical.as_bytes(), message.as_bytes());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: session configuration (encoding defaults, provider limits)
//! - [`error`]: error types and handling
//! - [`mime`]: message model and canonicalizer
//! - [`sink`]: byte sink writer

pub mod config;
pub mod error;
pub mod mime;
pub mod sink;

// Re-export commonly used types
pub use config::Session;
pub use error::{Result, SmimeError};
pub use mime::{canonicalize, Message, MessageBuilder, MimeSource};
pub use sink::SinkWriter;
