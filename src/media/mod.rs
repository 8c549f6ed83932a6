//! Media input handling: MIME classification, container decoding, and
//! offline resampling to the 16kHz mono pipeline format.

pub mod decoder;
pub mod resampler;

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Category of an input file derived from its declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeCategory {
    Audio,
    Video,
    Other,
}

/// A caller-supplied media file: raw bytes plus a declared MIME type and a
/// display name. Never persisted by the pipeline.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    /// Creates a media file from in-memory bytes.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing the MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = guess_mime(path).to_string();
        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }

    /// Classifies the declared MIME type.
    pub fn mime_category(&self) -> MimeCategory {
        if self.mime_type.starts_with("audio/") {
            MimeCategory::Audio
        } else if self.mime_type.starts_with("video/") {
            MimeCategory::Video
        } else {
            MimeCategory::Other
        }
    }
}

/// Guess a MIME type from the file extension.
fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_mime_classified_as_audio() {
        let file = MediaFile::new("a.wav", "audio/wav", vec![]);
        assert_eq!(file.mime_category(), MimeCategory::Audio);
    }

    #[test]
    fn video_mime_classified_as_video() {
        let file = MediaFile::new("a.mp4", "video/mp4", vec![]);
        assert_eq!(file.mime_category(), MimeCategory::Video);
    }

    #[test]
    fn text_mime_classified_as_other() {
        let file = MediaFile::new("a.txt", "text/plain", vec![]);
        assert_eq!(file.mime_category(), MimeCategory::Other);
    }

    #[test]
    fn empty_mime_classified_as_other() {
        let file = MediaFile::new("a", "", vec![]);
        assert_eq!(file.mime_category(), MimeCategory::Other);
    }

    #[test]
    fn guess_mime_known_extensions() {
        assert_eq!(guess_mime(Path::new("speech.wav")), "audio/wav");
        assert_eq!(guess_mime(Path::new("talk.MP3")), "audio/mpeg");
        assert_eq!(guess_mime(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(guess_mime(Path::new("clip.webm")), "video/webm");
    }

    #[test]
    fn guess_mime_unknown_extension_is_octet_stream() {
        assert_eq!(guess_mime(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(guess_mime(Path::new("no_extension")), "application/octet-stream");
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let result = MediaFile::from_path(Path::new("/nonexistent/clip.wav"));
        assert!(result.is_err());
    }
}
