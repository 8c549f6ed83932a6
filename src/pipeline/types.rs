//! Data types flowing through the transcription pipeline.

use serde::Serialize;

/// A finalized transcript span.
///
/// Adjacent segments in a run never overlap: each segment starts where the
/// previous one ended, and `end_time >= start_time` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionSegment {
    /// Transcribed text.
    pub text: String,
    /// Start of the span in seconds.
    pub start_time: f64,
    /// End of the span in seconds.
    pub end_time: f64,
}

/// A raw, possibly-partial transcript message from the streaming service.
///
/// Only events marked final and carrying non-empty text are retained by
/// the assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEvent {
    /// Whether the recognition result is no longer subject to revision.
    pub is_final: bool,
    /// Recognized text, possibly empty.
    pub text: String,
    /// Reported end time in seconds.
    pub end_time_secs: f64,
}

/// The binary-safe encoded form of one audio chunk: base64 of 16-bit
/// little-endian PCM, tagged with its MIME/rate descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct WireChunk {
    pub data: String,
    pub mime_type: &'static str,
}
