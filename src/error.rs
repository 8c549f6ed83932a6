//! Error types for livescribe.
//!
//! The `Display` text of each pipeline variant is the user-facing message;
//! internal detail lives in the variant fields and is logged at the point
//! of classification, never shown to the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LivescribeError {
    /// Input MIME type is neither `audio/*` nor `video/*`. Checked before
    /// any bytes are touched.
    #[error("Unsupported file type. Please upload an audio or video file.")]
    UnsupportedFormat { mime_type: String },

    /// The decoder could not parse the input as any known media container.
    #[error("Unsupported audio/video format. Please try a different file (e.g., mp3, wav, mp4).")]
    DecodeFailure { message: String },

    /// Transport or protocol failure during the live streaming session.
    /// Terminal for the run; no partial transcript is surfaced.
    #[error(
        "A streaming error occurred during transcription. Please check your network and try again."
    )]
    StreamError { message: String },

    /// Any other failure inside the pipeline.
    #[error("Failed to process the file. It may be corrupted or in an unsupported format.")]
    Other { message: String },

    // Ambient errors, mapped into `Other` at the pipeline boundary.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LivescribeError {
    /// Internal detail for logging; `Display` stays user-facing.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::UnsupportedFormat { mime_type } => Some(mime_type),
            Self::DecodeFailure { message }
            | Self::StreamError { message }
            | Self::Other { message } => Some(message),
            Self::Config(_) | Self::Io(_) => None,
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, LivescribeError>;
