//! Accumulated reply text.

use serde::{Deserialize, Serialize};

/// The reply text of one session, grown only by appends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBuffer {
    text: String,
    appends: usize,
}

impl ReplyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.push_str(text);
        self.appends += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of non-empty appends so far.
    pub fn appends(&self) -> usize {
        self.appends
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_grows_monotonically() {
        let mut buffer = ReplyBuffer::new();
        buffer.append("Hel");
        let before = buffer.as_str().to_string();
        buffer.append("lo");
        assert!(buffer.as_str().starts_with(&before));
        assert_eq!(buffer.as_str(), "Hello");
        assert_eq!(buffer.appends(), 2);
    }

    #[test]
    fn empty_append_ignored() {
        let mut buffer = ReplyBuffer::new();
        buffer.append("");
        assert!(buffer.is_empty());
        assert_eq!(buffer.appends(), 0);
    }
}
