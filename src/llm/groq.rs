//! Groq API transport.
//!
//! Calls `POST {base_url}/chat/completions` with an OpenAI-compatible
//! request body and Bearer token authentication, then normalizes the
//! first choice into a [`ChatCompletion`].

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::{LlmConfig, DEFAULT_GROQ_BASE_URL};
use super::client::ChatTransport;
use super::{ChatCompletion, ChatCompletionRequest};

// ── Groq API response types ──────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

// ── Errors ───────────────────────────────────────────────

/// Non-success HTTP response from the Groq API.
///
/// Kept as a concrete type so callers can inspect the status code
/// through `anyhow::Error::downcast_ref`.
#[derive(Debug)]
pub struct GroqApiError {
    pub status: StatusCode,
    pub body: String,
}

impl fmt::Display for GroqApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Groq API error ({}): {}", self.status, self.body)
    }
}

impl std::error::Error for GroqApiError {}

// ── GroqClient ───────────────────────────────────────────

/// Client for the Groq chat completions API.
pub struct GroqClient {
    client: Client,
    base_url: String,
}

impl GroqClient {
    /// Creates a client from configuration.
    ///
    /// Only `base_url` and `timeout_secs` are read; the API key is
    /// supplied per request.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build Groq HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    /// Creates a client against `base_url` with the transport's default timeout.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Default for GroqClient {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_GROQ_BASE_URL)
    }
}

#[async_trait]
impl ChatTransport for GroqClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion> {
        debug!(
            "Calling Groq API ({}) with {} messages",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key.trim())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GroqApiError { status, body }.into());
        }

        let resp: ChatCompletionResponse = response.json().await?;
        into_completion(resp)
    }

    fn description(&self) -> String {
        format!("groq ({})", self.base_url)
    }
}

/// Extracts the first choice's text from a parsed response.
fn into_completion(resp: ChatCompletionResponse) -> Result<ChatCompletion> {
    let (prompt_tokens, completion_tokens) = match resp.usage {
        Some(u) => (Some(u.prompt_tokens), Some(u.completion_tokens)),
        None => (None, None),
    };

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Groq API returned no choices"))?;

    let text = choice
        .message
        .content
        .ok_or_else(|| anyhow::anyhow!("Groq API returned an empty message"))?;

    Ok(ChatCompletion {
        text,
        prompt_tokens,
        completion_tokens,
    })
}
