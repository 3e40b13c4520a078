//! Builds stream requests for one conversation.

use aivy_domain::{ConversationId, DomainError, StreamRequest};

/// Conversation and optional request fields shared by every message.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    conversation_id: ConversationId,
    model: Option<String>,
    system_prompt: Option<String>,
    temperature: Option<f32>,
}

impl RequestTemplate {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            model: None,
            system_prompt: None,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Request carrying `message`. Fails for a blank message.
    pub fn request(&self, message: &str) -> Result<StreamRequest, DomainError> {
        let mut request = StreamRequest::try_new(self.conversation_id.clone(), message)?;
        if let Some(model) = &self.model {
            request = request.with_model(model.as_str());
        }
        if let Some(prompt) = &self.system_prompt {
            request = request.with_system_prompt(prompt.as_str());
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        Ok(request)
    }
}
