//! JSON body of `POST /api/messages/stream`.

use aivy_domain::StreamRequest;
use serde::Serialize;

/// Request body as the backend expects it.
///
/// `use_chat_endpoint` is always `true`: the backend then routes the
/// message through its chat model instead of plain completion.
#[derive(Debug, Serialize)]
pub struct WireStreamRequest<'a> {
    pub conversation_id: &'a str,
    pub message: &'a str,
    pub use_chat_endpoint: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl<'a> From<&'a StreamRequest> for WireStreamRequest<'a> {
    fn from(request: &'a StreamRequest) -> Self {
        Self {
            conversation_id: request.conversation_id().as_str(),
            message: request.message(),
            use_chat_endpoint: true,
            system_prompt: request.system_prompt(),
            model: request.model(),
            temperature: request.temperature(),
        }
    }
}
