//! Progress reporting for a transcription run.
//!
//! Maps pipeline phase and send position to a 0–100 estimate and forwards
//! it to the caller-supplied sink. Reports never decrease within a run.

use crate::defaults::{PROGRESS_SEND_CEILING, PROGRESS_SESSION_OPEN};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Clonable, thread-safe wrapper around the caller's progress callback.
#[derive(Clone)]
pub struct ProgressReporter {
    sink: Arc<dyn Fn(u8) + Send + Sync>,
    last: Arc<AtomicU8>,
}

impl ProgressReporter {
    /// Wraps a progress sink.
    pub fn new(sink: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            last: Arc::new(AtomicU8::new(0)),
        }
    }

    /// Reports a percentage, clamped to 100 and to be non-decreasing.
    ///
    /// Values at or below the last reported percentage are dropped so the
    /// sink only ever observes a strictly increasing sequence.
    pub fn report(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.last.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            (self.sink)(percent);
        }
    }

    /// Last percentage reported so far.
    pub fn last(&self) -> u8 {
        self.last.load(Ordering::SeqCst)
    }
}

/// Interpolates send-loop progress between the session-open mark and the
/// send ceiling, proportional to samples transmitted.
pub fn send_progress(samples_sent: usize, total_samples: usize) -> u8 {
    if total_samples == 0 {
        return PROGRESS_SEND_CEILING;
    }

    let span = (PROGRESS_SEND_CEILING - PROGRESS_SESSION_OPEN) as f64;
    let fraction = samples_sent as f64 / total_samples as f64;
    let percent = PROGRESS_SESSION_OPEN as f64 + fraction * span;
    (percent.round() as u8).min(PROGRESS_SEND_CEILING)
}
