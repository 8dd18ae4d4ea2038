pub mod client;
pub mod groq;

use serde::{Deserialize, Serialize};

pub use client::ChatTransport;
pub use groq::{GroqApiError, GroqClient};

/// A role-tagged chat message in the OpenAI-compatible wire format.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// `POST /chat/completions` request body.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Normalized completion returned by a [`ChatTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    /// Text content of the first choice.
    pub text: String,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}
