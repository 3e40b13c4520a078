//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use crate::http::HttpTransportConfig;
use aivy_application::ConsumerConfig;
use aivy_domain::DedupPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8787";
pub const DEFAULT_STREAM_PATH: &str = "/api/messages/stream";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("backend.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("backend.base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("backend.stream_path must start with '/', got {0:?}")]
    InvalidStreamPath(String),

    #[error("{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("request.temperature must be within 0.0..=2.0, got {0}")]
    InvalidTemperature(f32),
}

/// Raw backend configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Scheme, host and port of the chat backend
    pub base_url: String,
    /// Path of the streaming endpoint
    pub stream_path: String,
    /// Timeout in seconds for establishing the connection
    pub connect_timeout_seconds: Option<u64>,
    /// Cap in seconds on the whole request, body included
    pub request_timeout_seconds: Option<u64>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            connect_timeout_seconds: None,
            request_timeout_seconds: None,
        }
    }
}

/// Raw stream consumer configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStreamConfig {
    /// Token de-duplication policy
    pub dedup: DedupPolicy,
    /// Fail a stream that stays silent this long
    pub idle_timeout_seconds: Option<u64>,
}

/// Optional request fields sent with every message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRequestConfig {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of stream events
    pub transcript: Option<PathBuf>,
}

/// Complete file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: FileBackendConfig,
    pub stream: FileStreamConfig,
    pub request: FileRequestConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(base_url.to_string()));
        }
        if !self.backend.stream_path.starts_with('/') {
            return Err(ConfigValidationError::InvalidStreamPath(
                self.backend.stream_path.clone(),
            ));
        }

        let timeouts = [
            ("backend.connect_timeout_seconds", self.backend.connect_timeout_seconds),
            ("backend.request_timeout_seconds", self.backend.request_timeout_seconds),
            ("stream.idle_timeout_seconds", self.stream.idle_timeout_seconds),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, value)| *value == Some(0)) {
            return Err(ConfigValidationError::ZeroTimeout(*name));
        }

        if let Some(t) = self.request.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigValidationError::InvalidTemperature(t));
        }

        Ok(())
    }

    /// Settings for [`HttpChatTransport`](crate::http::HttpChatTransport)
    pub fn to_transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            base_url: self.backend.base_url.trim().to_string(),
            stream_path: self.backend.stream_path.clone(),
            connect_timeout: self.backend.connect_timeout_seconds.map(Duration::from_secs),
            request_timeout: self.backend.request_timeout_seconds.map(Duration::from_secs),
        }
    }

    /// Settings for the streaming reply use case
    pub fn to_consumer_config(&self) -> ConsumerConfig {
        ConsumerConfig::default()
            .with_dedup(self.stream.dedup)
            .with_idle_timeout(self.stream.idle_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[backend]
base_url = "https://aivy.example.com"
stream_path = "/api/v2/stream"
connect_timeout_seconds = 5
request_timeout_seconds = 600

[stream]
dedup = "overlap_merge"
idle_timeout_seconds = 90

[request]
model = "llama3.2:latest"
system_prompt = "You are a study buddy."
temperature = 0.2

[logging]
transcript = "/tmp/aivy.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "https://aivy.example.com");
        assert_eq!(config.backend.stream_path, "/api/v2/stream");
        assert_eq!(config.backend.connect_timeout_seconds, Some(5));
        assert_eq!(config.stream.dedup, DedupPolicy::OverlapMerge);
        assert_eq!(config.stream.idle_timeout_seconds, Some(90));
        assert_eq!(config.request.model.as_deref(), Some("llama3.2:latest"));
        assert_eq!(config.request.temperature, Some(0.2));
        assert_eq!(
            config.logging.transcript,
            Some(PathBuf::from("/tmp/aivy.jsonl"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[stream]\ndedup = \"exact_repeat\"\n").unwrap();
        assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.backend.stream_path, DEFAULT_STREAM_PATH);
        assert!(config.request.model.is_none());
    }

    #[test]
    fn test_unknown_dedup_policy_is_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[stream]\ndedup = \"fuzzy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_backend() {
        let mut config = FileConfig::default();
        config.backend.base_url = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyBaseUrl));

        config.backend.base_url = "127.0.0.1:8787".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidBaseUrl(_))
        ));

        let mut config = FileConfig::default();
        config.backend.stream_path = "api/messages/stream".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidStreamPath(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let mut config = FileConfig::default();
        config.stream.idle_timeout_seconds = Some(0);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroTimeout("stream.idle_timeout_seconds"))
        );
    }

    #[test]
    fn test_validate_rejects_temperature_out_of_range() {
        let mut config = FileConfig::default();
        config.request.temperature = Some(3.5);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTemperature(3.5))
        );
    }

    #[test]
    fn test_conversions() {
        let mut config = FileConfig::default();
        config.backend.base_url = "http://localhost:9000/ ".to_string();
        config.backend.connect_timeout_seconds = Some(3);
        config.stream.dedup = DedupPolicy::OverlapMerge;
        config.stream.idle_timeout_seconds = Some(45);

        let transport = config.to_transport_config();
        assert_eq!(transport.endpoint(), "http://localhost:9000/api/messages/stream");
        assert_eq!(transport.connect_timeout, Some(Duration::from_secs(3)));
        assert!(transport.request_timeout.is_none());

        let consumer = config.to_consumer_config();
        assert_eq!(consumer.dedup, DedupPolicy::OverlapMerge);
        assert_eq!(consumer.idle_timeout, Some(Duration::from_secs(45)));
    }
}
