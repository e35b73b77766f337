//! Canonical message form for signing
//!
//! Signing requires a byte-stable serialized form: the signature is
//! computed over exact bytes, and verification re-derives them. The
//! canonical form fixes line endings to CRLF and leaves every other byte
//! untouched; header folding and transfer encodings are whatever the mail
//! library emitted at construction time. Canonicalizing a message that is
//! already canonical is the identity.

use tracing::debug;

use super::types::{Message, MimeSource};
use crate::config::Session;
use crate::error::Result;

/// Produce the canonical form of a message.
///
/// The message serializes itself into an in-memory buffer, the buffer is
/// normalized to CRLF line endings, and the result is parsed back against
/// the same session into a fresh [`Message`].
///
/// Serialization failures ([`SmimeError::Message`]) and sink failures
/// ([`SmimeError::Io`]) propagate to the caller unmodified; nothing is
/// retried.
///
/// [`SmimeError::Message`]: crate::error::SmimeError::Message
/// [`SmimeError::Io`]: crate::error::SmimeError::Io
pub fn canonicalize(session: &Session, message: &dyn MimeSource) -> Result<Message> {
    let mut buffer = Vec::new();
    message.write_to(&mut buffer)?;

    let canonical = to_crlf(&buffer);
    debug!(
        "canonicalized {} serialized bytes into {} canonical bytes",
        buffer.len(),
        canonical.len()
    );

    Message::parse(session, &canonical)
}

/// Rewrite bare LF and bare CR line endings to CRLF.
///
/// CRLF pairs pass through untouched, so the function is a fixed point on
/// its own output.
fn to_crlf(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'\r' => {
                out.extend_from_slice(b"\r\n");
                if input.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => out.extend_from_slice(b"\r\n"),
            byte => out.push(byte),
        }
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmimeError;
    use crate::mime::types::MockMimeSource;

    #[test]
    fn test_to_crlf_bare_lf() {
        assert_eq!(to_crlf(b"a\nb\n"), b"a\r\nb\r\n");
    }

    #[test]
    fn test_to_crlf_bare_cr() {
        assert_eq!(to_crlf(b"a\rb"), b"a\r\nb");
    }

    #[test]
    fn test_to_crlf_keeps_crlf() {
        assert_eq!(to_crlf(b"a\r\nb\r\n"), b"a\r\nb\r\n");
    }

    #[test]
    fn test_to_crlf_mixed_endings() {
        assert_eq!(to_crlf(b"a\nb\r\nc\rd"), b"a\r\nb\r\nc\r\nd");
    }

    #[test]
    fn test_to_crlf_is_fixed_point() {
        let once = to_crlf(b"line one\nline two\rline three\r\n");
        assert_eq!(to_crlf(&once), once);
    }

    #[test]
    fn test_to_crlf_empty() {
        assert!(to_crlf(b"").is_empty());
    }

    #[test]
    fn test_canonicalize_valid_message() {
        let session = Session::default();
        let original = Message::builder()
            .header("Subject", "Hello")
            .text_body("Hello, World!")
            .build(&session)
            .unwrap();

        let result = canonicalize(&session, &original).unwrap();

        let mut original_bytes = Vec::new();
        let mut result_bytes = Vec::new();
        original.write_to(&mut original_bytes).unwrap();
        result.write_to(&mut result_bytes).unwrap();
        assert_eq!(original_bytes, result_bytes);
    }

    #[test]
    fn test_canonicalize_empty_message() {
        let session = Session::default();
        let result = canonicalize(&session, &Message::empty()).unwrap();
        assert_eq!(result.body_size(), 0);
        assert_eq!(result.part_count(), 0);
    }

    #[test]
    fn test_canonicalize_normalizes_bare_lf() {
        let session = Session::default();
        let message = Message::parse(&session, b"Subject: Hello\n\nline one\nline two\n").unwrap();

        let result = canonicalize(&session, &message).unwrap();

        let bytes = result.as_bytes();
        assert!(bytes.windows(2).any(|w| w == b"\r\n"));
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                assert_eq!(bytes[i - 1], b'\r');
            }
        }
    }

    #[test]
    fn test_canonicalize_propagates_message_fault() {
        let session = Session::default();
        let mut source = MockMimeSource::new();
        source
            .expect_write_to()
            .returning(|_| Err(SmimeError::Message("unreadable body".to_string())));

        let err = canonicalize(&session, &source).unwrap_err();
        assert!(matches!(err, SmimeError::Message(_)));
    }

    #[test]
    fn test_canonicalize_propagates_io_fault() {
        let session = Session::default();
        let mut source = MockMimeSource::new();
        source.expect_write_to().returning(|_| {
            Err(SmimeError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stream closed",
            )))
        });

        let err = canonicalize(&session, &source).unwrap_err();
        assert!(matches!(err, SmimeError::Io(_)));
    }
}
