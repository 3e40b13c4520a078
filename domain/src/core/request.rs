//! Stream request value object

use super::conversation::ConversationId;
use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A chat message submitted for a streamed reply (Value Object)
///
/// Created when the user sends a message and never mutated afterwards;
/// the builder-style `with_*` methods consume and return a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRequest {
    conversation_id: ConversationId,
    message: String,
    system_prompt: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
}

impl StreamRequest {
    /// Create a request, rejecting a blank message
    pub fn try_new(
        conversation_id: ConversationId,
        message: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainError::InvalidRequest(format!(
                "message for conversation {} is empty",
                conversation_id
            )));
        }
        Ok(Self {
            conversation_id,
            message,
            system_prompt: None,
            model: None,
            temperature: None,
        })
    }

    /// Parse both fields from raw strings
    pub fn parse(conversation_id: &str, message: impl Into<String>) -> Result<Self, DomainError> {
        Self::try_new(ConversationId::try_new(conversation_id)?, message)
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}
