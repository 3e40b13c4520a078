//! Errors of the streaming reply use case.

use crate::ports::chat_transport::TransportError;
use aivy_domain::DomainError;
use thiserror::Error;

/// Why a streamed reply did not complete.
///
/// Every variant ends the session's read loop. Only [`StreamError::Aborted`]
/// is expected during normal use (a newer message superseded the stream, or
/// the caller cancelled it) and should not be shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Server reported an error: {0}")]
    Protocol(String),

    #[error("Stream aborted")]
    Aborted,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StreamError {
    /// Check if this error represents a cancellation
    pub fn is_aborted(&self) -> bool {
        matches!(self, StreamError::Aborted)
    }

    /// Whether the caller should surface this error to the user
    pub fn is_user_visible(&self) -> bool {
        !self.is_aborted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_is_not_user_visible() {
        assert!(StreamError::Aborted.is_aborted());
        assert!(!StreamError::Aborted.is_user_visible());
        assert!(StreamError::Protocol("boom".to_string()).is_user_visible());
    }

    #[test]
    fn test_display() {
        let err = StreamError::from(TransportError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert_eq!(err.to_string(), "Transport error: HTTP 502: bad gateway");
        assert_eq!(
            StreamError::Protocol("model crashed".to_string()).to_string(),
            "Server reported an error: model crashed"
        );
    }
}
