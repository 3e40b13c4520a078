//! Presentation layer for aivy
//!
//! This crate contains CLI definitions, reply output,
//! the connect spinner, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, RequestTemplate};
pub use cli::commands::{Cli, DedupArg, OutputFormat};
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
pub use output::fallback::fallback_reply;
pub use output::reply::ReplyPrinter;
pub use output::token_writer::TokenWriter;
pub use progress::spinner::ConnectSpinner;
