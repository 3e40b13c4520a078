//! Chat transport port
//!
//! Defines how the application layer opens a streamed reply. The adapter
//! sends the request and hands back the raw response body as a stream of
//! byte chunks; framing and event parsing stay in the use case.

use aivy_domain::StreamRequest;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

/// Raw response body, chunked as the network delivers it.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Errors raised while opening or reading the response body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response has no readable body")]
    MissingBody,

    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Read error: {0}")]
    Read(String),

    #[error("No data received for {0} seconds")]
    IdleTimeout(u64),
}

impl TransportError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Transport for streamed chat replies
///
/// Implementations live in the infrastructure layer. Dropping the returned
/// future or stream must abort the underlying request.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `request` and return the response body.
    ///
    /// Fails with [`TransportError::Status`] for a non-success status and
    /// [`TransportError::MissingBody`] when there is no body to read.
    async fn open(&self, request: &StreamRequest) -> Result<ByteStream, TransportError>;
}
