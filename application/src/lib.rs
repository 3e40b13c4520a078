//! Application layer for aivy
//!
//! This crate contains the streaming reply use case, its port definitions,
//! and consumer configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ConsumerConfig;
pub use ports::{
    chat_transport::{ByteStream, ChatTransport, TransportError},
    stream_logger::{NoStreamLogger, StreamLogEvent, StreamLogger},
};
pub use use_cases::stream_reply::{
    ReplyReader, SessionLease, SessionRegistry, StreamError, StreamReplyUseCase, TokenStream,
};
