//! Pipeline entry point: one media file in, ordered transcript segments
//! out.
//!
//! The run resolves exactly once: with the assembled segment list on a
//! clean close, or with a classified error. A dropped stream is terminal;
//! segments assembled before the failure are discarded, never returned.

use crate::config::Config;
use crate::defaults::{
    CHUNK_SIZE, PROGRESS_DECODE_START, PROGRESS_DECODED, PROGRESS_RESAMPLED,
    PROGRESS_SESSION_OPEN,
};
use crate::error::{LivescribeError, Result};
use crate::media::decoder::{AudioDecoder, WavDecoder};
use crate::media::resampler::render_mono_16k;
use crate::media::{MediaFile, MimeCategory};
use crate::pipeline::assembler::SegmentAssembler;
use crate::pipeline::chunker::Chunker;
use crate::pipeline::encoder::encode_chunk;
use crate::pipeline::progress::{ProgressReporter, send_progress};
use crate::pipeline::types::TranscriptionSegment;
use crate::session::client::LiveConnector;
use crate::session::paced::Pacer;
use crate::session::{LiveSession, SessionConnector, SessionEvent};
use log::{debug, error, info, warn};
use std::time::Duration;

/// Transcription pipeline configuration and entry point.
pub struct Pipeline {
    chunk_size: usize,
    pacer: Pacer,
}

impl Pipeline {
    /// Creates a pipeline with default chunking and pacing.
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            pacer: Pacer::default(),
        }
    }

    /// Builds a pipeline from application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.stream.chunk_size.max(1),
            pacer: Pacer::new(Duration::from_millis(config.stream.pacing_delay_ms)),
        }
    }

    /// Overrides the nominal chunk length in samples.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Overrides the pacing policy.
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Runs one transcription: decodes the file, streams it through a
    /// session opened by `connector`, and returns the assembled segments.
    ///
    /// `on_progress` receives a monotonic 0–100 estimate; the final call
    /// before a successful return reports 100.
    pub async fn run(
        &self,
        file: MediaFile,
        connector: &dyn SessionConnector,
        on_progress: impl Fn(u8) + Send + Sync + 'static,
    ) -> Result<Vec<TranscriptionSegment>> {
        let progress = ProgressReporter::new(on_progress);
        self.run_inner(file, connector, &progress)
            .await
            .map_err(classify)
    }

    async fn run_inner(
        &self,
        file: MediaFile,
        connector: &dyn SessionConnector,
        progress: &ProgressReporter,
    ) -> Result<Vec<TranscriptionSegment>> {
        // MIME gate, before any bytes are touched
        if file.mime_category() == MimeCategory::Other {
            return Err(LivescribeError::UnsupportedFormat {
                mime_type: file.mime_type,
            });
        }

        info!("Transcribing '{}' ({})", file.name, file.mime_type);
        progress.report(PROGRESS_DECODE_START);

        // Decode and resample off the cooperative scheduler
        let bytes = file.bytes;
        let decoded = tokio::task::spawn_blocking(move || WavDecoder.decode(&bytes))
            .await
            .map_err(|e| LivescribeError::Other {
                message: format!("decode task failed: {}", e),
            })??;
        progress.report(PROGRESS_DECODED);
        debug!(
            "Decoded {} channel(s) at {}Hz, {:.2}s",
            decoded.channels.len(),
            decoded.sample_rate,
            decoded.duration_secs()
        );

        let samples = tokio::task::spawn_blocking(move || render_mono_16k(&decoded))
            .await
            .map_err(|e| LivescribeError::Other {
                message: format!("resample task failed: {}", e),
            })?;
        progress.report(PROGRESS_RESAMPLED);
        debug!("Resampled to {} samples at 16kHz mono", samples.len());

        let mut session = connector.connect().await?;
        let mut events = session
            .take_events()
            .ok_or_else(|| LivescribeError::StreamError {
                message: "session event channel already taken".to_string(),
            })?;
        progress.report(PROGRESS_SESSION_OPEN);

        // Send task: paced, in-order chunk transmission, then end-of-input
        let chunk_size = self.chunk_size;
        let pacer = self.pacer;
        let send_reporter = progress.clone();
        let sender = tokio::spawn(async move {
            let total = samples.len();
            let mut sent = 0usize;

            for chunk in Chunker::new(&samples, chunk_size) {
                session.send_chunk(encode_chunk(chunk)).await?;
                sent += chunk.len();
                send_reporter.report(send_progress(sent, total));
                pacer.pause().await;
            }

            session.finish().await?;
            Ok::<(), LivescribeError>(())
        });

        // Receive loop: assemble transcript events until the service
        // confirms the close or the stream fails
        let mut assembler = SegmentAssembler::new();
        let mut close_confirmed = false;

        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Transcript(event) => {
                    assembler.push(&event);
                }
                SessionEvent::Closed => {
                    close_confirmed = true;
                    break;
                }
                SessionEvent::Error(message) => {
                    error!("Streaming session failed: {}", message);
                    abort_sender(sender).await;
                    return Err(LivescribeError::StreamError { message });
                }
            }
        }

        if !close_confirmed {
            abort_sender(sender).await;
            return Err(LivescribeError::StreamError {
                message: "session ended without close confirmation".to_string(),
            });
        }

        // The close is only clean if every chunk and the end-of-input
        // signal went out; a failed send side rejects the run even when
        // the service confirmed a close.
        match sender.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("Send side failed before the close: {}", e);
                return Err(e);
            }
            Err(e) => {
                return Err(LivescribeError::StreamError {
                    message: format!("send task failed: {}", e),
                });
            }
        }

        progress.report(100);
        info!("Run complete: {} segment(s)", assembler.len());
        Ok(assembler.into_segments())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Stops the send task and drains its handle.
async fn abort_sender(sender: tokio::task::JoinHandle<Result<()>>) {
    sender.abort();
    match sender.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!("Send task ended with error: {}", e),
        Err(e) if e.is_cancelled() => {}
        Err(e) => warn!("Send task aborted abnormally: {}", e),
    }
}

/// Maps ambient errors into the pipeline taxonomy at the boundary.
fn classify(error: LivescribeError) -> LivescribeError {
    match error {
        e @ (LivescribeError::UnsupportedFormat { .. }
        | LivescribeError::DecodeFailure { .. }
        | LivescribeError::StreamError { .. }
        | LivescribeError::Other { .. }) => e,
        other => LivescribeError::Other {
            message: other.to_string(),
        },
    }
}

/// Transcribes a media file against the configured live service.
///
/// The sole entry point the caller layer uses: connects one session,
/// streams the file, and resolves with either the ordered segment list or
/// a classified error.
pub async fn transcribe(
    file: MediaFile,
    config: &Config,
    on_progress: impl Fn(u8) + Send + Sync + 'static,
) -> Result<Vec<TranscriptionSegment>> {
    let connector = LiveConnector::new(config.service.clone());
    Pipeline::from_config(config)
        .run(file, &connector, on_progress)
        .await
}
