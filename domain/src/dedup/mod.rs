//! Token de-duplication.
//!
//! Backends occasionally re-emit a token, or start a token with characters
//! that already ended the previous one. Two filters are available and the
//! consumer applies exactly one of them for its whole lifetime:
//!
//! | Policy | Drops | Side effect on legitimate repeats |
//! |--------|-------|-----------------------------------|
//! | [`DedupPolicy::ExactRepeat`] (default) | a token byte-identical to the previous accepted one | "the" + "the" collapses to one |
//! | [`DedupPolicy::OverlapMerge`] | the longest buffer-suffix/token-prefix overlap | "Hel" + "lo" becomes "Helo" |

pub mod overlap;

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which de-duplication strategy a consumer applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Suppress a token identical to the immediately preceding accepted token.
    #[default]
    ExactRepeat,
    /// Append only the part of each token not already at the end of the reply.
    OverlapMerge,
}

impl DedupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupPolicy::ExactRepeat => "exact_repeat",
            DedupPolicy::OverlapMerge => "overlap_merge",
        }
    }
}

impl std::fmt::Display for DedupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DedupPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "exact_repeat" | "exact" => Ok(DedupPolicy::ExactRepeat),
            "overlap_merge" | "overlap" => Ok(DedupPolicy::OverlapMerge),
            other => Err(DomainError::UnknownDedupPolicy(other.to_string())),
        }
    }
}

/// Stateful per-session filter.
///
/// [`accept`](Self::accept) takes the incoming token and the reply text so
/// far. It returns the text to deliver, or `None` when nothing new remains.
/// The caller appends the returned text to its reply buffer.
#[derive(Debug, Clone)]
pub struct TokenFilter {
    policy: DedupPolicy,
    last_accepted: Option<String>,
}

impl TokenFilter {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            last_accepted: None,
        }
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// The last token that passed the filter, as received.
    pub fn last_accepted(&self) -> Option<&str> {
        self.last_accepted.as_deref()
    }

    pub fn accept(&mut self, token: &str, reply_so_far: &str) -> Option<String> {
        if token.is_empty() {
            return None;
        }
        match self.policy {
            DedupPolicy::ExactRepeat => {
                if self.last_accepted.as_deref() == Some(token) {
                    return None;
                }
                self.last_accepted = Some(token.to_string());
                Some(token.to_string())
            }
            DedupPolicy::OverlapMerge => {
                let remainder = overlap::non_overlapping(reply_so_far, token);
                if remainder.is_empty() {
                    return None;
                }
                self.last_accepted = Some(token.to_string());
                Some(remainder.to_string())
            }
        }
    }
}

impl Default for TokenFilter {
    fn default() -> Self {
        Self::new(DedupPolicy::default())
    }
}
