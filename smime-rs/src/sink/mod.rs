//! Byte sink output
//!
//! Low-level transcription of byte buffers into caller-provided sinks:
//! - [`writer`]: the [`SinkWriter`] adapter used by message serialization

pub mod writer;

pub use writer::{write, SinkWriter};
