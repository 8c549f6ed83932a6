//! livescribe - stream local audio/video files to a live transcription
//! service.
//!
//! Decodes a media container, resamples to 16kHz mono, chunks and encodes
//! the samples as PCM, and drives one bidirectional streaming session per
//! run, assembling finalized server events into ordered, non-overlapping
//! transcript segments.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod session;

// Entry point
pub use pipeline::orchestrator::{Pipeline, transcribe};

// Core types
pub use media::{MediaFile, MimeCategory};
pub use pipeline::types::{TranscriptEvent, TranscriptionSegment, WireChunk};

// Session seam (for tests and alternative transports)
pub use session::{LiveSession, SessionConnector, SessionEvent, SessionState};

// Error handling
pub use error::{LivescribeError, Result};

// Config
pub use config::{Config, ServiceConfig, StreamConfig};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
