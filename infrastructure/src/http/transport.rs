//! reqwest implementation of the chat transport port.

use super::wire::WireStreamRequest;
use crate::config::{DEFAULT_BASE_URL, DEFAULT_STREAM_PATH};
use aivy_application::{ByteStream, ChatTransport, TransportError};
use aivy_domain::StreamRequest;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, warn};

/// Where and how to reach the streaming endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpTransportConfig {
    pub base_url: String,
    pub stream_path: String,
    pub connect_timeout: Option<Duration>,
    /// Cap on the whole request, including reading the body.
    pub request_timeout: Option<Duration>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

impl HttpTransportConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full URL of the streaming endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.stream_path
        )
    }
}

/// Opens streamed replies with `POST {base_url}{stream_path}`.
///
/// Dropping the returned body stream closes the connection, which is how
/// a cancelled session aborts its request.
pub struct HttpChatTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatTransport {
    pub fn new(config: &HttpTransportConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn open(&self, request: &StreamRequest) -> Result<ByteStream, TransportError> {
        let body = WireStreamRequest::from(request);
        debug!("POST {} (conversation {})", self.endpoint, body.conversation_id);

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} answered HTTP {}", self.endpoint, status.as_u16());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return Err(TransportError::MissingBody);
        }

        debug!(
            "{} answered HTTP {} ({})",
            self.endpoint,
            status.as_u16(),
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("no content type")
        );

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| TransportError::Read(e.to_string())))
            .boxed())
    }
}
