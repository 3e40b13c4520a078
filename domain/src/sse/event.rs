//! Reply events carried in `data:` payloads.
//!
//! The backend emits one JSON object per `data:` line with any of the keys
//! `token`, `error` and `done`. Parsing is lenient: anything that is not a
//! JSON object yields `None` and is skipped by the consumer.

use serde_json::Value;

/// A parsed `data:` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyEvent {
    /// Incremental reply text. Only non-empty strings count.
    pub token: Option<String>,
    /// Server-side failure message.
    pub error: Option<String>,
    /// End-of-reply marker.
    pub done: bool,
}

impl ReplyEvent {
    /// Parse one payload. Returns `None` for malformed JSON or non-objects.
    pub fn parse(payload: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(payload).ok()?;
        let object = value.as_object()?;

        let token = object
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let error = object
            .get("error")
            .filter(|e| is_truthy(e))
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });

        let done = object.get("done").is_some_and(is_truthy);

        Some(Self { token, error, done })
    }

    pub fn token(text: impl Into<String>) -> Self {
        Self {
            token: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn done() -> Self {
        Self {
            done: true,
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether this event ends the stream (`error` or `done`).
    pub fn is_terminal(&self) -> bool {
        self.error.is_some() || self.done
    }
}

/// JSON truthiness as the backend's JavaScript clients see it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
