//! Server-Sent-Events wire handling.
//!
//! - [`utf8::Utf8StreamDecoder`]: chunk-safe UTF-8 decoding
//! - [`decoder::FrameDecoder`]: blank-line frame splitting and `data:` extraction
//! - [`event::ReplyEvent`]: the `{token, error, done}` payload

pub mod decoder;
pub mod event;
pub mod utf8;
