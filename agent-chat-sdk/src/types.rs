//! Wire types for the workspace chat endpoint

use serde::{Deserialize, Serialize};

/// Fallback text when the endpoint answers without any text field
pub const EMPTY_RESPONSE_TEXT: &str = "No response received";

/// Conversation mode understood by the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Free conversation using workspace context and history
    #[default]
    Chat,
    /// Answers grounded strictly in workspace documents
    Query,
}

/// Request body for `POST /api/v1/workspace/{slug}/chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub mode: ChatMode,
}

impl<'a> ChatRequest<'a> {
    pub fn chat(message: &'a str) -> Self {
        Self {
            message,
            mode: ChatMode::Chat,
        }
    }
}

/// Response body; the endpoint is loose about which field carries the text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(rename = "textResponse", default)]
    pub text_response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatResponse {
    /// Text of the answer: `textResponse`, else `message`, else a fixed fallback
    pub fn into_text(self) -> String {
        self.text_response
            .filter(|t| !t.is_empty())
            .or(self.message.filter(|m| !m.is_empty()))
            .unwrap_or_else(|| EMPTY_RESPONSE_TEXT.to_string())
    }
}
