use std::io::Write;

use mail_builder::headers::content_type::ContentType;
use mail_builder::headers::raw::Raw;
use mail_builder::mime::MimePart;
use mail_builder::MessageBuilder as MailBuilder;
use mail_parser::{MessageParser, PartType};
use tracing::debug;

use crate::config::Session;
use crate::error::{Result, SmimeError};
use crate::sink::SinkWriter;

/// A single message header. Duplicates are allowed; order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Serialization boundary between the canonicalizer and the mail library.
///
/// [`Message`] implements this by emitting its retained bytes; tests
/// substitute doubles to exercise the fault paths.
#[cfg_attr(test, mockall::automock)]
pub trait MimeSource {
    /// Write the serialized form of the message into `buffer`.
    fn write_to(&self, buffer: &mut Vec<u8>) -> Result<()>;
}

/// An immutable MIME message.
///
/// A message owns its serialized byte form, fixed once at construction:
/// either generated by the builder or taken verbatim from parsed input.
/// Re-serializing therefore always yields the exact same bytes.
#[derive(Debug, Clone)]
pub struct Message {
    headers: Vec<Header>,
    raw: Vec<u8>,
    body_size: usize,
    part_count: usize,
}

impl Message {
    /// A message with no headers and no body.
    pub fn empty() -> Self {
        Message {
            headers: Vec::new(),
            raw: Vec::new(),
            body_size: 0,
            part_count: 0,
        }
    }

    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Parse a serialized message against the given session.
    ///
    /// The input bytes are retained verbatim as the message's serialized
    /// form. Empty input yields the empty message. Input the mail library
    /// rejects, or that exceeds the session's size limit, fails with
    /// [`SmimeError::Message`].
    pub fn parse(session: &Session, bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Message::empty());
        }

        if bytes.len() > session.provider.max_message_size {
            return Err(SmimeError::Message(format!(
                "message of {} bytes exceeds limit of {} bytes",
                bytes.len(),
                session.provider.max_message_size
            )));
        }

        let parsed = MessageParser::default()
            .parse(bytes)
            .ok_or_else(|| SmimeError::Message("not a parseable MIME message".to_string()))?;

        let root = parsed
            .parts
            .first()
            .ok_or_else(|| SmimeError::Message("message has no root part".to_string()))?;

        let mut headers = Vec::with_capacity(root.headers.len());
        for header in &root.headers {
            let value = bytes
                .get(header.offset_start..header.offset_end)
                .map(|v| String::from_utf8_lossy(v).trim().to_string())
                .unwrap_or_default();

            headers.push(Header {
                name: header.name.as_str().to_string(),
                value,
            });
        }

        let body_size = root.offset_end.saturating_sub(root.offset_body);
        let part_count = match &root.body {
            PartType::Multipart(parts) => parts.len(),
            _ => 0,
        };

        debug!(
            "parsed message: {} headers, {} parts, {} body bytes",
            headers.len(),
            part_count,
            body_size
        );

        Ok(Message {
            headers,
            raw: bytes.to_vec(),
            body_size,
            part_count,
        })
    }

    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// All headers, in serialized order.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Byte length of the serialized body (0 when no body is set).
    pub fn body_size(&self) -> usize {
        self.body_size
    }

    /// Number of immediate sub-parts (0 for non-multipart messages).
    pub fn part_count(&self) -> usize {
        self.part_count
    }

    /// The serialized form of the message.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Write the serialized form of the message into the given sink.
    pub fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        SinkWriter::new(out).write(&self.raw)
    }
}

impl MimeSource for Message {
    fn write_to(&self, buffer: &mut Vec<u8>) -> Result<()> {
        SinkWriter::new(buffer).write(&self.raw)
    }
}

/// Builds a [`Message`] from headers and a text or multipart body.
///
/// Serialization happens exactly once, in [`MessageBuilder::build`]; the
/// resulting bytes are frozen into the message.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    headers: Vec<Header>,
    text: Option<String>,
    parts: Vec<BodyPart>,
}

/// One sub-part of a multipart body.
#[derive(Debug, Clone)]
pub struct BodyPart {
    pub content_type: String,
    pub content: Vec<u8>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        MessageBuilder::default()
    }

    /// Append a header. May be called repeatedly with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Set a plain-text body.
    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a sub-part. Any part makes the message multipart/mixed.
    pub fn part(mut self, content_type: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.parts.push(BodyPart {
            content_type: content_type.into(),
            content: content.into(),
        });
        self
    }

    /// Serialize through the mail library and freeze the result.
    ///
    /// A builder with no headers, no body and no parts yields the empty
    /// message. A body that cannot be serialized fails with
    /// [`SmimeError::Message`].
    pub fn build(self, session: &Session) -> Result<Message> {
        if self.headers.is_empty() && self.text.is_none() && self.parts.is_empty() {
            return Ok(Message::empty());
        }

        let mut builder = MailBuilder::new();
        for header in &self.headers {
            builder = builder.header(header.name.clone(), Raw::new(header.value.clone()));
        }

        if self.parts.is_empty() {
            let content_type = ContentType::new("text/plain")
                .attribute("charset", session.encoding.default_charset.clone());
            builder = builder.body(MimePart::new(content_type, self.text.unwrap_or_default()));
        } else {
            let parts: Vec<_> = self
                .parts
                .into_iter()
                .map(|p| MimePart::new(ContentType::new(p.content_type), p.content))
                .collect();
            builder = builder.body(MimePart::new(ContentType::new("multipart/mixed"), parts));
        }

        let mut raw = Vec::new();
        builder
            .write_to(&mut raw)
            .map_err(|e| SmimeError::Message(e.to_string()))?;

        Message::parse(session, &raw)
    }
}
