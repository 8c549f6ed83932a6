//! Container decoding to native-rate multi-channel float samples.
//!
//! The decoder is the seam to the host's audio facilities: the pipeline
//! only ever sees [`DecodedAudio`], so alternative container support can be
//! added without touching the streaming side.

use crate::error::{LivescribeError, Result};
use std::io::Cursor;

/// Native-rate decoded audio, one `Vec<f32>` per channel, samples in
/// [-1.0, 1.0].
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Duration of the decoded audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        let frames = self.channels.first().map(|c| c.len()).unwrap_or(0);
        frames as f64 / self.sample_rate as f64
    }
}

/// Trait for turning raw container bytes into native-rate float audio.
///
/// Implementations must fail with `DecodeFailure` when the bytes cannot be
/// parsed as a known container, and must preserve the full duration.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio>;
}

/// WAV container decoder backed by `hound`.
///
/// Supports integer PCM at 8–32 bits and 32-bit float, any channel count
/// and sample rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl AudioDecoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio> {
        let mut reader =
            hound::WavReader::new(Cursor::new(bytes)).map_err(|e| LivescribeError::DecodeFailure {
                message: format!("failed to parse WAV container: {}", e),
            })?;

        let spec = reader.spec();
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(LivescribeError::DecodeFailure {
                message: format!(
                    "invalid WAV header: {} channels at {}Hz",
                    spec.channels, spec.sample_rate
                ),
            });
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(|v| v.clamp(-1.0, 1.0)))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| LivescribeError::DecodeFailure {
                    message: format!("failed to read float samples: {}", e),
                })?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| LivescribeError::DecodeFailure {
                        message: format!("failed to read integer samples: {}", e),
                    })?
            }
        };

        // Deinterleave into per-channel buffers
        let channel_count = spec.channels as usize;
        let mut channels = vec![Vec::with_capacity(interleaved.len() / channel_count); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Ok(DecodedAudio {
            channels,
            sample_rate: spec.sample_rate,
        })
    }
}
