//! Port for structured stream logging.
//!
//! Defines the [`StreamLogger`] trait for recording the lifecycle of each
//! streamed reply (opened, tokens, completed, failed, aborted) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable transcript (JSONL).

use serde_json::Value;

/// A structured stream event for logging.
pub struct StreamLogEvent {
    /// Event type identifier (e.g., "stream_opened", "token", "stream_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl StreamLogEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging stream events.
///
/// The `log` method is synchronous and non-fallible so that a broken log
/// never disturbs token delivery.
pub trait StreamLogger: Send + Sync {
    /// Record a stream event.
    fn log(&self, event: StreamLogEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoStreamLogger;

impl StreamLogger for NoStreamLogger {
    fn log(&self, _event: StreamLogEvent) {}
}
