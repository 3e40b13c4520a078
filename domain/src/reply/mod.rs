//! Streamed reply domain.
//!
//! - [`state::SessionState`]: lifecycle of one streamed reply
//! - [`buffer::ReplyBuffer`]: the accumulated reply text
//! - [`outcome::ReplyOutcome`]: what a completed stream hands back

pub mod buffer;
pub mod outcome;
pub mod state;
