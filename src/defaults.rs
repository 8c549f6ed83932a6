//! Default constants for the transcription pipeline.
//!
//! Shared across configuration, pipeline, and session code to keep the
//! wire format and pacing policy in one place.

/// Target sample rate in Hz for audio sent to the transcription service.
///
/// 16kHz is the standard for speech recognition and is the only rate the
/// streaming endpoint accepts.
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Nominal chunk length in samples (~0.5s at 16kHz).
pub const CHUNK_SIZE: usize = 8192;

/// Delay inserted after each chunk send, in milliseconds.
///
/// The service has no acknowledgment-based flow control; this fixed pacing
/// delay is the pipeline's only backpressure mechanism.
pub const PACING_DELAY_MS: u64 = 25;

/// MIME descriptor attached to every encoded chunk.
pub const PCM_MIME_TYPE: &str = "audio/pcm;rate=16000";

/// Default model identifier sent in the session setup message.
pub const DEFAULT_MODEL: &str = "native-audio-live";

/// Default service endpoint (host:port).
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:9440";

/// System instruction sent once per session.
pub const SYSTEM_INSTRUCTION: &str = "You are a highly accurate audio transcription service. \
     Transcribe the user's speech precisely as spoken, in the original language.";

/// Progress mark reported before decoding starts.
pub const PROGRESS_DECODE_START: u8 = 5;

/// Progress mark reported once the container has been decoded.
pub const PROGRESS_DECODED: u8 = 10;

/// Progress mark reported once resampling to 16kHz mono is complete.
pub const PROGRESS_RESAMPLED: u8 = 20;

/// Progress mark reported once the streaming session is open.
pub const PROGRESS_SESSION_OPEN: u8 = 25;

/// Ceiling for progress reported during the send loop.
///
/// The remaining 95→100 span is reserved for the close confirmation.
pub const PROGRESS_SEND_CEILING: u8 = 95;
