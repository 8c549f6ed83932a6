use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub stream: StreamConfig,
}

/// Transcription service connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Endpoint in "host:port" form.
    pub endpoint: String,
    /// Model identifier sent in the session setup message.
    pub model: String,
    /// Optional API key forwarded in the setup message.
    pub api_key: Option<String>,
}

/// Outbound streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    /// Nominal chunk length in samples.
    pub chunk_size: usize,
    /// Delay between chunk sends in milliseconds.
    pub pacing_delay_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_ENDPOINT.to_string(),
            model: defaults::DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::CHUNK_SIZE,
            pacing_delay_ms: defaults::PACING_DELAY_MS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LIVESCRIBE_ENDPOINT → service.endpoint
    /// - LIVESCRIBE_MODEL → service.model
    /// - LIVESCRIBE_API_KEY → service.api_key
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("LIVESCRIBE_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.service.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("LIVESCRIBE_MODEL")
            && !model.is_empty()
        {
            self.service.model = model;
        }

        if let Ok(key) = std::env::var("LIVESCRIBE_API_KEY")
            && !key.is_empty()
        {
            self.service.api_key = Some(key);
        }

        self
    }
}
