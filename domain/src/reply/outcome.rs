//! Result of a finished stream.

use crate::core::conversation::ConversationId;
use serde::{Deserialize, Serialize};

/// How a successful stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The server sent a truthy `done`.
    Done,
    /// The body ended without `done`. Accepted, but the reply may be truncated.
    Eof,
}

/// A successfully completed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyOutcome {
    pub conversation_id: ConversationId,
    pub request_id: u64,
    /// Full reply text after de-duplication.
    pub text: String,
    /// Number of tokens delivered to the caller.
    pub tokens: usize,
    pub termination: Termination,
}

impl ReplyOutcome {
    pub fn terminated_by_done(&self) -> bool {
        self.termination == Termination::Done
    }
}
