//! Logging infrastructure for structured stream transcripts.
//!
//! Provides [`JsonlStreamLogger`], a JSONL file writer that implements
//! the [`StreamLogger`](aivy_application::StreamLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlStreamLogger;
