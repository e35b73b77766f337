/// MIME message canonicalization
///
/// This module provides the message model over the external mail library
/// and the canonicalizer that produces the byte-stable form used as
/// signing input.

pub mod canonical;
pub mod types;

pub use canonical::canonicalize;
pub use types::{BodyPart, Header, Message, MessageBuilder, MimeSource};
