//! Domain layer for aivy
//!
//! This crate contains the pure logic of the streaming reply client:
//! value objects, SSE framing, token de-duplication and the session
//! lifecycle. It performs no I/O and has no dependency on the async
//! runtime or the HTTP client.
//!
//! # Core Concepts
//!
//! ## Frames and events
//!
//! A reply arrives as Server-Sent-Events frames separated by a blank line.
//! Each `data:` line of a frame holds a JSON [`ReplyEvent`] with optional
//! `token`, `error` and `done` keys. [`FrameDecoder`] releases a frame only
//! once its separator is complete, so chunk boundaries never matter.
//!
//! ## De-duplication
//!
//! [`TokenFilter`] applies one [`DedupPolicy`] per session; see
//! [`dedup`] for the trade-off between the two policies.

pub mod core;
pub mod dedup;
pub mod reply;
pub mod sse;
pub mod util;

// Re-export commonly used types
pub use crate::core::{conversation::ConversationId, error::DomainError, request::StreamRequest};
pub use dedup::{DedupPolicy, TokenFilter};
pub use reply::{
    buffer::ReplyBuffer,
    outcome::{ReplyOutcome, Termination},
    state::SessionState,
};
pub use sse::{
    decoder::{FrameDecoder, data_payloads},
    event::ReplyEvent,
    utf8::Utf8StreamDecoder,
};
pub use util::log_preview;
