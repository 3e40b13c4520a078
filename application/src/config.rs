//! Application-level configuration.
//!
//! [`ConsumerConfig`] controls how the streaming reply use case filters
//! tokens and how long it waits on a silent connection.

use aivy_domain::DedupPolicy;
use std::time::Duration;

/// Stream consumer behavior configuration.
#[derive(Debug, Clone, Default)]
pub struct ConsumerConfig {
    /// De-duplication policy applied to every session of the consumer.
    pub dedup: DedupPolicy,
    /// Fail the stream when no body chunk arrives for this long.
    pub idle_timeout: Option<Duration>,
}

impl ConsumerConfig {
    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Sets the idle timeout from an optional number of seconds.
    ///
    /// If `seconds` is `None`, the consumer waits indefinitely.
    pub fn with_idle_timeout(mut self, seconds: Option<u64>) -> Self {
        self.idle_timeout = seconds.map(Duration::from_secs);
        self
    }
}
