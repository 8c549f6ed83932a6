//! TCP client for the streaming transcription service.
//!
//! Speaks newline-delimited JSON over one TCP connection per run: a setup
//! line on connect, one `realtimeInput` line per chunk, then a write-side
//! shutdown to signal end of input. A reader task parses server lines and
//! forwards them as [`SessionEvent`]s; EOF after a requested close becomes
//! `Closed`, while EOF with input still pending, like any transport or
//! parse failure, becomes `Error`.

use crate::config::ServiceConfig;
use crate::defaults::SYSTEM_INSTRUCTION;
use crate::error::{LivescribeError, Result};
use crate::pipeline::types::WireChunk;
use crate::session::protocol::{
    RealtimeInput, RealtimeInputMessage, ServerMessage, SetupMessage, SetupPayload,
};
use crate::session::{LiveSession, SessionConnector, SessionEvent, SessionState};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;

/// Buffered events between the reader task and the pipeline.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// A live session over TCP.
pub struct LiveClient {
    write_half: OwnedWriteHalf,
    events: Option<mpsc::Receiver<SessionEvent>>,
    state: SessionState,
    // Tells the reader whether an EOF is a confirmed close or a hangup
    close_requested: Arc<AtomicBool>,
}

impl LiveClient {
    /// Connects to the service and performs the setup handshake.
    pub async fn connect(config: &ServiceConfig) -> Result<Self> {
        info!("Connecting to transcription service at {}", config.endpoint);

        let stream = TcpStream::connect(&config.endpoint).await.map_err(|e| {
            LivescribeError::StreamError {
                message: format!("connect to {} failed: {}", config.endpoint, e),
            }
        })?;
        stream
            .set_nodelay(true)
            .map_err(|e| LivescribeError::StreamError {
                message: format!("failed to configure socket: {}", e),
            })?;

        let (read_half, write_half) = stream.into_split();
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let close_requested = Arc::new(AtomicBool::new(false));
        tokio::spawn(read_events(read_half, tx, Arc::clone(&close_requested)));

        let mut client = Self {
            write_half,
            events: Some(rx),
            state: SessionState::Connecting,
            close_requested,
        };

        let setup = SetupMessage {
            setup: SetupPayload {
                model: &config.model,
                response_modalities: ["AUDIO"],
                input_audio_transcription: Default::default(),
                system_instruction: SYSTEM_INSTRUCTION,
                api_key: config.api_key.as_deref(),
            },
        };
        client.send_json(&setup).await?;
        client.state = client.state.advance(SessionState::Open)?;

        info!("Session open at {}", config.endpoint);
        Ok(client)
    }

    /// Current state of the session's send side.
    pub fn state(&self) -> SessionState {
        self.state
    }

    async fn send_json<T: serde::Serialize>(&mut self, message: &T) -> Result<()> {
        let line = serde_json::to_string(message).map_err(|e| LivescribeError::StreamError {
            message: format!("failed to encode message: {}", e),
        })?;

        if let Err(e) = self.write_line(line.as_bytes()).await {
            self.state = SessionState::Errored;
            return Err(LivescribeError::StreamError {
                message: format!("send failed: {}", e),
            });
        }
        Ok(())
    }

    async fn write_line(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.write_half.write_all(bytes).await?;
        self.write_half.write_all(b"\n").await?;
        self.write_half.flush().await
    }
}

#[async_trait]
impl LiveSession for LiveClient {
    async fn send_chunk(&mut self, chunk: WireChunk) -> Result<()> {
        if self.state == SessionState::Open {
            self.state = self.state.advance(SessionState::Sending)?;
        } else if self.state != SessionState::Sending {
            return Err(LivescribeError::StreamError {
                message: format!("cannot send a chunk in state {:?}", self.state),
            });
        }

        let message = RealtimeInputMessage {
            realtime_input: RealtimeInput {
                data: &chunk.data,
                mime_type: chunk.mime_type,
            },
        };
        self.send_json(&message).await?;
        debug!("Sent chunk ({} base64 bytes)", chunk.data.len());
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        // A run with an empty sample buffer closes without ever sending.
        if self.state == SessionState::Open {
            self.state = self.state.advance(SessionState::Sending)?;
        }
        self.state = self.state.advance(SessionState::Closing)?;

        // Write-side shutdown is the end-of-input signal; the service
        // confirms by closing its side, which the reader sees as EOF.
        // The flag must be set first so that EOF reads as a clean close.
        self.close_requested.store(true, Ordering::SeqCst);
        if let Err(e) = self.write_half.shutdown().await {
            self.state = SessionState::Errored;
            return Err(LivescribeError::StreamError {
                message: format!("close request failed: {}", e),
            });
        }

        debug!("End of input signalled, awaiting close confirmation");
        Ok(())
    }

    fn take_events(&mut self) -> Option<mpsc::Receiver<SessionEvent>> {
        self.events.take()
    }
}

/// Reader task: parses server lines into session events until EOF or a
/// transport failure.
///
/// EOF only confirms the close when the send side has already requested
/// one; a server hanging up mid-stream is a failure, not a close.
async fn read_events(
    read_half: OwnedReadHalf,
    tx: mpsc::Sender<SessionEvent>,
    close_requested: Arc<AtomicBool>,
) {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                if close_requested.load(Ordering::SeqCst) {
                    info!("Transcription service confirmed the close");
                    let _send = tx.send(SessionEvent::Closed).await;
                } else {
                    error!("Transcription service dropped the connection");
                    let _send = tx
                        .send(SessionEvent::Error(
                            "connection closed before end of input".to_string(),
                        ))
                        .await;
                }
                break;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match serde_json::from_str::<ServerMessage>(trimmed) {
                    Ok(message) => {
                        let Some(transcription) = message
                            .server_content
                            .and_then(|content| content.input_transcription)
                        else {
                            continue;
                        };

                        let event = transcription.into_event();
                        debug!(
                            "Transcript event: final={} end={:.3}s",
                            event.is_final, event.end_time_secs
                        );
                        if tx.send(SessionEvent::Transcript(event)).await.is_err() {
                            warn!("Event receiver dropped, stopping reader");
                            break;
                        }
                    }
                    Err(e) => {
                        // Unparseable server output is a protocol violation
                        error!("Malformed server message: {}", e);
                        let _send = tx
                            .send(SessionEvent::Error(format!("malformed server message: {}", e)))
                            .await;
                        break;
                    }
                }
            }
            Err(e) => {
                error!("Read from transcription service failed: {}", e);
                let _send = tx
                    .send(SessionEvent::Error(format!("read failed: {}", e)))
                    .await;
                break;
            }
        }
    }
}

/// Opens [`LiveClient`] sessions from service configuration.
pub struct LiveConnector {
    config: ServiceConfig,
}

impl LiveConnector {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionConnector for LiveConnector {
    async fn connect(&self) -> Result<Box<dyn LiveSession>> {
        let client = LiveClient::connect(&self.config).await?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::TranscriptEvent;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    async fn start_server() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        (listener, addr)
    }

    fn test_config(endpoint: String) -> ServiceConfig {
        ServiceConfig {
            endpoint,
            model: "native-audio-live".to_string(),
            api_key: None,
        }
    }

    async fn read_lines_until_eof(stream: &mut TcpStream) -> Vec<String> {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf).await.unwrap() {
                0 => break,
                n => data.extend_from_slice(&buf[..n]),
            }
        }
        String::from_utf8(data)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[tokio::test]
    async fn handshake_sends_setup_line() {
        let (listener, addr) = start_server().await;

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_lines_until_eof(&mut stream).await
        });

        let mut client = LiveClient::connect(&test_config(addr)).await.unwrap();
        assert_eq!(client.state(), SessionState::Open);
        client.finish().await.unwrap();

        let lines = server.await.unwrap();
        assert_eq!(lines.len(), 1);
        let setup: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(setup["setup"]["model"], "native-audio-live");
        assert_eq!(setup["setup"]["responseModalities"][0], "AUDIO");
        assert!(setup["setup"]["systemInstruction"].is_string());
    }

    #[tokio::test]
    async fn chunks_are_sent_in_order_and_eof_closes() {
        let (listener, addr) = start_server().await;

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let lines = read_lines_until_eof(&mut stream).await;
            // Close our side after the client's shutdown
            drop(stream);
            lines
        });

        let mut client = LiveClient::connect(&test_config(addr)).await.unwrap();
        let mut events = client.take_events().unwrap();

        for data in ["AAAA", "BBBB", "CCCC"] {
            client
                .send_chunk(WireChunk {
                    data: data.to_string(),
                    mime_type: "audio/pcm;rate=16000",
                })
                .await
                .unwrap();
        }
        assert_eq!(client.state(), SessionState::Sending);
        client.finish().await.unwrap();
        assert_eq!(client.state(), SessionState::Closing);

        let lines = server.await.unwrap();
        let payloads: Vec<String> = lines[1..]
            .iter()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).unwrap();
                v["realtimeInput"]["data"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(payloads, vec!["AAAA", "BBBB", "CCCC"]);

        match events.recv().await {
            Some(SessionEvent::Closed) => {}
            other => panic!("expected Closed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn transcript_lines_become_events() {
        let (listener, addr) = start_server().await;

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let line = concat!(
                r#"{"serverContent":{"inputTranscription":{"isFinal":true,"#,
                r#""text":"hi","resultEndTime":{"seconds":0,"nanos":800000000}}}}"#,
                "\n"
            );
            stream.write_all(line.as_bytes()).await.unwrap();
            // Hold the socket open briefly so EOF arrives after the line
            let _ = read_lines_until_eof(&mut stream).await;
        });

        let mut client = LiveClient::connect(&test_config(addr)).await.unwrap();
        let mut events = client.take_events().unwrap();

        match events.recv().await {
            Some(SessionEvent::Transcript(TranscriptEvent {
                is_final: true,
                text,
                end_time_secs,
            })) => {
                assert_eq!(text, "hi");
                assert!((end_time_secs - 0.8).abs() < 1e-9);
            }
            other => panic!("expected transcript event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_server_line_is_an_error_event() {
        let (listener, addr) = start_server().await;

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(b"not json\n").await.unwrap();
        });

        let mut client = LiveClient::connect(&test_config(addr)).await.unwrap();
        let mut events = client.take_events().unwrap();

        match events.recv().await {
            Some(SessionEvent::Error(message)) => {
                assert!(message.contains("malformed server message"));
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn hangup_before_close_request_is_an_error_event() {
        let (listener, addr) = start_server().await;

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            // Drop the connection with the client still mid-stream
            drop(stream);
        });

        let mut client = LiveClient::connect(&test_config(addr)).await.unwrap();
        let mut events = client.take_events().unwrap();

        match events.recv().await {
            Some(SessionEvent::Error(message)) => {
                assert!(message.contains("before end of input"), "got: {}", message);
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connect_to_unreachable_endpoint_is_a_stream_error() {
        // Port 1 on localhost is essentially never listening
        let result = LiveClient::connect(&test_config("127.0.0.1:1".to_string())).await;
        match result {
            Err(LivescribeError::StreamError { message }) => {
                assert!(message.contains("connect"));
            }
            other => panic!("expected StreamError, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn take_events_yields_once() {
        let (listener, addr) = start_server().await;
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_lines_until_eof(&mut stream).await;
        });

        let mut client = LiveClient::connect(&test_config(addr)).await.unwrap();
        assert!(client.take_events().is_some());
        assert!(client.take_events().is_none());
    }
}
