//! Wire message types for the newline-delimited JSON session protocol.
//!
//! The client sends one `setup` line on connect and one `realtimeInput`
//! line per audio chunk. The server replies with `serverContent` lines
//! carrying input transcription results. Field names are camelCase on the
//! wire.

use crate::pipeline::types::TranscriptEvent;
use serde::{Deserialize, Serialize};

/// First line sent on a new connection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupMessage<'a> {
    pub setup: SetupPayload<'a>,
}

/// Session configuration: audio-modality responses with input
/// transcription enabled and a fixed verbatim-transcription instruction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupPayload<'a> {
    pub model: &'a str,
    pub response_modalities: [&'a str; 1],
    pub input_audio_transcription: EmptyConfig,
    pub system_instruction: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

/// Empty JSON object placeholder for enable-by-presence options.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyConfig {}

/// One audio chunk on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInputMessage<'a> {
    pub realtime_input: RealtimeInput<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInput<'a> {
    /// Base64-encoded 16-bit little-endian PCM.
    pub data: &'a str,
    /// MIME/rate descriptor, e.g. `audio/pcm;rate=16000`.
    pub mime_type: &'a str,
}

/// One line received from the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    pub server_content: Option<ServerContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    pub input_transcription: Option<InputTranscription>,
}

/// A recognition result, possibly still subject to revision.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputTranscription {
    pub is_final: bool,
    pub text: Option<String>,
    pub result_end_time: Option<ResultEndTime>,
}

/// Protobuf-style timestamp split into whole seconds and nanoseconds.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ResultEndTime {
    pub seconds: i64,
    pub nanos: i32,
}

impl InputTranscription {
    /// Flattens the wire shape into a pipeline event. A missing end time
    /// maps to 0 seconds, which the assembler drops as stale.
    pub fn into_event(self) -> TranscriptEvent {
        let end_time_secs = self
            .result_end_time
            .map(|t| t.seconds as f64 + t.nanos as f64 / 1e9)
            .unwrap_or(0.0);

        TranscriptEvent {
            is_final: self.is_final,
            text: self.text.unwrap_or_default(),
            end_time_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realtime_input_serializes_with_camel_case_keys() {
        let message = RealtimeInputMessage {
            realtime_input: RealtimeInput {
                data: "AAAA",
                mime_type: "audio/pcm;rate=16000",
            },
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"realtimeInput":{"data":"AAAA","mimeType":"audio/pcm;rate=16000"}}"#
        );
    }

    #[test]
    fn setup_omits_missing_api_key() {
        let message = SetupMessage {
            setup: SetupPayload {
                model: "native-audio-live",
                response_modalities: ["AUDIO"],
                input_audio_transcription: EmptyConfig {},
                system_instruction: "transcribe",
                api_key: None,
            },
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""model":"native-audio-live""#));
        assert!(json.contains(r#""responseModalities":["AUDIO"]"#));
        assert!(json.contains(r#""inputAudioTranscription":{}"#));
        assert!(!json.contains("apiKey"));
    }

    #[test]
    fn parses_final_transcription_with_split_timestamp() {
        let line = r#"{"serverContent":{"inputTranscription":
            {"isFinal":true,"text":"hello world",
             "resultEndTime":{"seconds":1,"nanos":250000000}}}}"#;
        let message: ServerMessage = serde_json::from_str(line).unwrap();
        let event = message
            .server_content
            .unwrap()
            .input_transcription
            .unwrap()
            .into_event();

        assert!(event.is_final);
        assert_eq!(event.text, "hello world");
        assert!((event.end_time_secs - 1.25).abs() < 1e-9);
    }

    #[test]
    fn missing_fields_default_to_a_droppable_event() {
        let line = r#"{"serverContent":{"inputTranscription":{}}}"#;
        let message: ServerMessage = serde_json::from_str(line).unwrap();
        let event = message
            .server_content
            .unwrap()
            .input_transcription
            .unwrap()
            .into_event();

        assert!(!event.is_final);
        assert!(event.text.is_empty());
        assert_eq!(event.end_time_secs, 0.0);
    }

    #[test]
    fn non_transcription_lines_parse_to_empty_content() {
        let message: ServerMessage = serde_json::from_str(r#"{"serverContent":{}}"#).unwrap();
        assert!(message.server_content.unwrap().input_transcription.is_none());

        let message: ServerMessage = serde_json::from_str(r#"{}"#).unwrap();
        assert!(message.server_content.is_none());
    }

    #[test]
    fn nanos_only_timestamp_converts_to_fraction() {
        let transcription = InputTranscription {
            is_final: true,
            text: Some("x".to_string()),
            result_end_time: Some(ResultEndTime {
                seconds: 0,
                nanos: 800_000_000,
            }),
        };
        let event = transcription.into_event();
        assert!((event.end_time_secs - 0.8).abs() < 1e-9);
    }
}
