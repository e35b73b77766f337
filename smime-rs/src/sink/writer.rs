//! Byte-for-byte transcription into a caller-provided sink.
//!
//! The writer never transforms what it is given: bytes reach the sink in
//! the exact order and values passed in, or not at all when the sink
//! fails. No write is retried and no partial success is reported.

use std::io::Write;

use crate::error::{Result, SmimeError};

/// Writes raw byte buffers to an underlying sink.
///
/// The sink is held for the duration of the writer; callers that share a
/// sink across threads must serialize access externally.
pub struct SinkWriter<W: Write> {
    sink: W,
}

impl<W: Write> SinkWriter<W> {
    pub fn new(sink: W) -> Self {
        SinkWriter { sink }
    }

    /// Write the whole buffer to the sink.
    ///
    /// An empty buffer is a no-op. A failing sink surfaces as
    /// [`SmimeError::Io`]; how many bytes reached the sink by then is
    /// unspecified.
    pub fn write(&mut self, buffer: &[u8]) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }

        self.sink.write_all(buffer)?;
        Ok(())
    }

    /// Write `len` bytes of the buffer starting at `offset`.
    ///
    /// A range that does not lie within the buffer is a caller error and
    /// fails with [`SmimeError::InvalidArgument`] before any byte reaches
    /// the sink.
    pub fn write_range(&mut self, buffer: &[u8], offset: usize, len: usize) -> Result<()> {
        let end = offset.checked_add(len).ok_or_else(|| {
            SmimeError::InvalidArgument(format!("range {}+{} overflows", offset, len))
        })?;

        let slice = buffer.get(offset..end).ok_or_else(|| {
            SmimeError::InvalidArgument(format!(
                "range {}..{} outside buffer of {} bytes",
                offset,
                end,
                buffer.len()
            ))
        })?;

        self.write(slice)
    }

    /// Write the buffer followed by a CRLF line ending.
    pub fn write_line(&mut self, buffer: &[u8]) -> Result<()> {
        self.write(buffer)?;
        self.sink.write_all(b"\r\n")?;
        Ok(())
    }

    /// Release the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

// Lets the writer stand wherever the mail libraries expect an io sink.
impl<W: Write> Write for SinkWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.sink.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.sink.flush()
    }
}

/// Write `buffer` to `sink` in full.
pub fn write(sink: impl Write, buffer: &[u8]) -> Result<()> {
    SinkWriter::new(sink).write(buffer)
}
