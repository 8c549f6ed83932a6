//! Bidirectional streaming session with the transcription service.
//!
//! One session exists per transcription run. The adapter walks a linear
//! state machine (`Connecting → Open → Sending → Closing → Closed`, with
//! `Errored` reachable from any non-terminal state) and surfaces server
//! messages as [`SessionEvent`]s on a channel, so ordering and termination
//! can be tested without a live transport.

pub mod client;
pub mod paced;
pub mod protocol;

use crate::error::{LivescribeError, Result};
use crate::pipeline::types::{TranscriptEvent, WireChunk};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Lifecycle states of one streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake in flight.
    Connecting,
    /// Handshake complete; no audio sent yet.
    Open,
    /// Forwarding chunks in order.
    Sending,
    /// End-of-input signalled; awaiting close confirmation.
    Closing,
    /// Service confirmed the close. The only successful terminal state.
    Closed,
    /// Transport or protocol failure. Terminal; the run is rejected.
    Errored,
}

impl SessionState {
    /// Whether the session can make no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Errored)
    }

    /// Validates and performs a transition.
    ///
    /// The forward path is strictly linear; `Errored` is reachable from
    /// any non-terminal state. Anything else is a protocol bug and is
    /// rejected as a stream error.
    pub fn advance(self, next: SessionState) -> Result<SessionState> {
        let valid = match (self, next) {
            (SessionState::Connecting, SessionState::Open)
            | (SessionState::Open, SessionState::Sending)
            | (SessionState::Sending, SessionState::Closing)
            | (SessionState::Closing, SessionState::Closed) => true,
            (from, SessionState::Errored) => !from.is_terminal(),
            _ => false,
        };

        if valid {
            Ok(next)
        } else {
            Err(LivescribeError::StreamError {
                message: format!("invalid session transition {:?} -> {:?}", self, next),
            })
        }
    }
}

/// Asynchronous message from the session's receive side.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A transcript message, possibly partial.
    Transcript(TranscriptEvent),
    /// The service confirmed the close.
    Closed,
    /// Transport or protocol failure.
    Error(String),
}

/// One live bidirectional session with the transcription service.
///
/// Implementations forward chunks in strict order and emit every server
/// message on the event channel as it arrives.
#[async_trait]
pub trait LiveSession: Send {
    /// Forwards one encoded chunk to the service.
    async fn send_chunk(&mut self, chunk: WireChunk) -> Result<()>;

    /// Signals end of input and requests close.
    async fn finish(&mut self) -> Result<()>;

    /// Takes the receive side of the session. Yields `None` after the
    /// first call.
    fn take_events(&mut self) -> Option<mpsc::Receiver<SessionEvent>>;
}

/// Opens sessions. The seam that lets tests run the pipeline against a
/// scripted session instead of a live endpoint.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn LiveSession>>;
}
