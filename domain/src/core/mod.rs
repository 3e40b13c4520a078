//! Core domain concepts shared across all subdomains.
//!
//! - [`conversation::ConversationId`]: opaque id of a chat conversation
//! - [`request::StreamRequest`]: a validated message awaiting a streamed reply
//! - [`error::DomainError`]: domain-level errors

pub mod conversation;
pub mod error;
pub mod request;
