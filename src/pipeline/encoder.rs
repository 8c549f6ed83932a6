//! Conversion of float sample windows into the PCM wire format.
//!
//! The scaling is asymmetric on purpose: negative samples scale by 32768
//! and non-negative ones by 32767, mirroring the signed 16-bit PCM range.
//! This must stay bit-exact for wire compatibility.

use crate::defaults::PCM_MIME_TYPE;
use crate::pipeline::types::WireChunk;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Encodes a sample window as base64 16-bit little-endian PCM.
///
/// Pure function; samples outside [-1.0, 1.0] are clamped first.
pub fn encode_chunk(samples: &[f32]) -> WireChunk {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = sample_to_i16(sample);
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    WireChunk {
        data: BASE64.encode(&bytes),
        mime_type: PCM_MIME_TYPE,
    }
}

/// Clamp and scale a single float sample to signed 16-bit PCM.
fn sample_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}
