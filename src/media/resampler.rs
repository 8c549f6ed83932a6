//! Offline down-mix and resample pass.
//!
//! Turns native-rate multi-channel audio into the single-channel 16kHz
//! buffer the rest of the pipeline consumes. The output length is exactly
//! `ceil(duration * 16000)` so downstream chunk math is deterministic.

use crate::defaults::TARGET_SAMPLE_RATE;
use crate::media::decoder::DecodedAudio;

/// Renders decoded audio down to mono at the target rate.
pub fn render_mono_16k(audio: &DecodedAudio) -> Vec<f32> {
    let mono = downmix(audio);
    resample(&mono, audio.sample_rate, TARGET_SAMPLE_RATE)
}

/// Averages all channels into a single mono buffer.
fn downmix(audio: &DecodedAudio) -> Vec<f32> {
    match audio.channels.len() {
        0 => Vec::new(),
        1 => audio.channels[0].clone(),
        n => {
            let frames = audio.channels.iter().map(|c| c.len()).min().unwrap_or(0);
            (0..frames)
                .map(|i| audio.channels.iter().map(|c| c[i]).sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Linear interpolation resampling.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as f32
            }
        })
        .collect()
}
