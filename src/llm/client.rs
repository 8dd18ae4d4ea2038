//! `ChatTransport` trait — the seam between the adapter and the network.
//!
//! The production implementation is [`GroqClient`](super::GroqClient);
//! tests substitute a stub that records requests and replays canned
//! outcomes.

use anyhow::Result;
use async_trait::async_trait;

use super::{ChatCompletion, ChatCompletionRequest};

/// Abstraction over a chat-completion backend.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Submits one chat-completion request authenticated with `api_key`.
    ///
    /// Non-success HTTP responses and malformed bodies are returned as
    /// errors whose text includes the provider's error payload.
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion>;

    /// Human-readable description of the backend, e.g. `"groq (https://api.groq.com/openai/v1)"`.
    fn description(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time verification that `ChatTransport` is object-safe.
    #[test]
    fn test_chat_transport_is_object_safe() {
        fn _assert_object_safe(_: &dyn ChatTransport) {}
    }
}
