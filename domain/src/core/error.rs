//! Domain error types

use crate::reply::state::SessionState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid stream request: {0}")]
    InvalidRequest(String),

    #[error("Invalid conversation id: {0}")]
    InvalidConversationId(String),

    #[error("Illegal session transition: {from} -> {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("Unknown de-duplication policy: {0}")]
    UnknownDedupPolicy(String),
}

impl DomainError {
    /// Check if this error came from validating caller input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidRequest(_) | DomainError::InvalidConversationId(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let error = DomainError::InvalidTransition {
            from: SessionState::Completed,
            to: SessionState::Streaming,
        };
        assert_eq!(
            error.to_string(),
            "Illegal session transition: completed -> streaming"
        );
    }

    #[test]
    fn test_is_invalid_input_check() {
        assert!(DomainError::InvalidRequest("empty".to_string()).is_invalid_input());
        assert!(DomainError::InvalidConversationId("".to_string()).is_invalid_input());
        assert!(!DomainError::UnknownDedupPolicy("x".to_string()).is_invalid_input());
    }
}
