//! Symptom analysis adapter.
//!
//! Validates the caller's input, sends one fixed chat-completion request
//! through a [`ChatTransport`] and folds every outcome, including
//! transport failures, into an [`AnalysisResult`].

mod classify;
pub mod prompt;

use std::fmt;

use serde::Serialize;
use tracing::{error, info};

use crate::llm::ChatTransport;

pub use classify::{classify, classify_text};

const MISSING_SYMPTOMS: &str = "Symptoms description is required";
const MISSING_API_KEY: &str = "Groq API key is required";

/// Coarse failure label used for user-facing messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    MissingInput,
    AuthFailure,
    RateLimited,
    ModelUnavailable,
    Unknown,
}

impl ErrorCategory {
    /// User-facing message for this category. `Unknown` embeds the raw
    /// error text; `MissingInput` passes through the field-specific text
    /// chosen by [`AnalysisRequest::validate`].
    fn message(self, raw: &str) -> String {
        match self {
            ErrorCategory::AuthFailure => {
                "Invalid Groq API key. Please check your API key and try again.".to_string()
            }
            ErrorCategory::RateLimited => {
                "API rate limit exceeded. Please try again later.".to_string()
            }
            ErrorCategory::ModelUnavailable => {
                "Model unavailable. Please try again later.".to_string()
            }
            ErrorCategory::MissingInput => raw.to_string(),
            ErrorCategory::Unknown => {
                format!("An error occurred while analyzing symptoms: {raw}")
            }
        }
    }
}

/// Caller input for one analysis.
#[derive(Clone)]
pub struct AnalysisRequest<'a> {
    pub symptoms: &'a str,
    pub api_key: &'a str,
}

impl fmt::Debug for AnalysisRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("symptoms", &self.symptoms)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(symptoms: &'a str, api_key: &'a str) -> Self {
        Self { symptoms, api_key }
    }

    /// Checks symptoms first, then the key.
    pub fn validate(&self) -> Result<(), AnalysisResult> {
        if self.symptoms.trim().is_empty() {
            return Err(AnalysisResult::missing_input(MISSING_SYMPTOMS));
        }
        if self.api_key.trim().is_empty() {
            return Err(AnalysisResult::missing_input(MISSING_API_KEY));
        }
        Ok(())
    }
}

/// Outcome of an analysis. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Success {
        analysis: String,
    },
    Failure {
        category: ErrorCategory,
        message: String,
    },
}

impl AnalysisResult {
    fn missing_input(field_message: &str) -> Self {
        let category = ErrorCategory::MissingInput;
        AnalysisResult::Failure {
            category,
            message: category.message(field_message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success { .. })
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            AnalysisResult::Success { .. } => None,
            AnalysisResult::Failure { category, .. } => Some(*category),
        }
    }

    /// Converts into the `{"analysis": ...}` / `{"error": ...}` response shape.
    pub fn into_response(self) -> AnalysisResponse {
        match self {
            AnalysisResult::Success { analysis } => AnalysisResponse::Analysis { analysis },
            AnalysisResult::Failure { message, .. } => AnalysisResponse::Error { error: message },
        }
    }
}

/// Serializable response shape handed to HTTP handlers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Analysis { analysis: String },
    Error { error: String },
}

/// Stateless adapter over a chat-completion transport.
pub struct SymptomChecker<T: ChatTransport> {
    transport: T,
}

impl<T: ChatTransport> SymptomChecker<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Analyzes a symptom description with a caller-supplied API key.
    ///
    /// Makes at most one network call and never retries. Blank input is
    /// rejected before the transport is touched.
    pub async fn analyze_symptoms(&self, symptoms: &str, api_key: &str) -> AnalysisResult {
        self.analyze(AnalysisRequest::new(symptoms, api_key)).await
    }

    pub async fn analyze(&self, request: AnalysisRequest<'_>) -> AnalysisResult {
        if let Err(rejected) = request.validate() {
            return rejected;
        }

        let chat = prompt::build_request(request.symptoms);

        match self.transport.complete(request.api_key, &chat).await {
            Ok(completion) => {
                if let (Some(input), Some(output)) =
                    (completion.prompt_tokens, completion.completion_tokens)
                {
                    info!("LLM response: {input} in / {output} out tokens");
                }
                info!("Symptom analysis completed successfully");
                AnalysisResult::Success {
                    analysis: completion.text,
                }
            }
            Err(e) => {
                let raw = e.to_string();
                error!("Error in symptom analysis: {raw}");
                let category = classify(&e);
                AnalysisResult::Failure {
                    category,
                    message: category.message(&raw),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use anyhow::Result;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::llm::{ChatCompletion, ChatCompletionRequest, GroqApiError};

    /// Replays queued outcomes and records every request it receives.
    struct StubTransport {
        outcomes: Mutex<VecDeque<Result<ChatCompletion>>>,
        calls: Mutex<Vec<(String, ChatCompletionRequest)>>,
    }

    impl StubTransport {
        fn new(outcomes: Vec<Result<ChatCompletion>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn text(text: &str) -> Self {
            Self::new(vec![Ok(ChatCompletion {
                text: text.to_string(),
                prompt_tokens: Some(10),
                completion_tokens: Some(5),
            })])
        }

        fn failing(err: anyhow::Error) -> Self {
            Self::new(vec![Err(err)])
        }

        fn calls(&self) -> Vec<(String, ChatCompletionRequest)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for StubTransport {
        async fn complete(
            &self,
            api_key: &str,
            request: &ChatCompletionRequest,
        ) -> Result<ChatCompletion> {
            self.calls
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("stub exhausted")))
        }

        fn description(&self) -> String {
            "stub".to_string()
        }
    }

    fn failure(category: ErrorCategory, message: &str) -> AnalysisResult {
        AnalysisResult::Failure {
            category,
            message: message.to_string(),
        }
    }

    // ── Validation ───────────────────────────────────────

    #[tokio::test]
    async fn test_blank_symptoms_rejected_without_call() {
        for symptoms in ["", "   ", "\n\t "] {
            let checker = SymptomChecker::new(StubTransport::text("unused"));
            let result = checker.analyze_symptoms(symptoms, "gsk_key").await;
            assert_eq!(
                result,
                failure(ErrorCategory::MissingInput, "Symptoms description is required")
            );
            assert!(checker.transport().calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_blank_symptoms_checked_before_key() {
        let checker = SymptomChecker::new(StubTransport::text("unused"));
        let result = checker.analyze_symptoms(" ", " ").await;
        assert_eq!(
            result,
            failure(ErrorCategory::MissingInput, "Symptoms description is required")
        );
    }

    #[tokio::test]
    async fn test_blank_api_key_rejected_without_call() {
        for key in ["", "  \t"] {
            let checker = SymptomChecker::new(StubTransport::text("unused"));
            let result = checker.analyze_symptoms("headache", key).await;
            assert_eq!(
                result,
                failure(ErrorCategory::MissingInput, "Groq API key is required")
            );
            assert!(checker.transport().calls().is_empty());
        }
    }

    // ── Success path ─────────────────────────────────────

    #[tokio::test]
    async fn test_success_returns_text_and_fixed_request() {
        let checker = SymptomChecker::new(StubTransport::text("X"));
        let result = checker.analyze_symptoms("sore throat", "gsk_key").await;
        assert_eq!(
            result,
            AnalysisResult::Success {
                analysis: "X".to_string()
            }
        );
        assert!(result.is_success());
        assert!(result.category().is_none());

        let calls = checker.transport().calls();
        assert_eq!(calls.len(), 1);
        let (key, request) = &calls[0];
        assert_eq!(key, "gsk_key");
        assert_eq!(request.model, "llama-3.1-8b-instant");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("Symptoms: sore throat"));
    }

    #[tokio::test]
    async fn test_each_call_hits_transport() {
        let transport = StubTransport::new(vec![
            Ok(ChatCompletion {
                text: "first".to_string(),
                prompt_tokens: None,
                completion_tokens: None,
            }),
            Ok(ChatCompletion {
                text: "second".to_string(),
                prompt_tokens: None,
                completion_tokens: None,
            }),
        ]);
        let checker = SymptomChecker::new(transport);
        let a = checker.analyze_symptoms("cough", "k").await;
        let b = checker.analyze_symptoms("cough", "k").await;
        assert_eq!(a.into_response(), AnalysisResponse::Analysis { analysis: "first".to_string() });
        assert_eq!(b.into_response(), AnalysisResponse::Analysis { analysis: "second".to_string() });
        assert_eq!(checker.transport().calls().len(), 2);
    }

    // ── Failure classification ───────────────────────────

    #[tokio::test]
    async fn test_authentication_error() {
        let checker = SymptomChecker::new(StubTransport::failing(anyhow::anyhow!(
            "Authentication failed for request"
        )));
        let result = checker.analyze_symptoms("fever", "bad").await;
        assert_eq!(
            result,
            failure(
                ErrorCategory::AuthFailure,
                "Invalid Groq API key. Please check your API key and try again."
            )
        );
    }

    #[tokio::test]
    async fn test_rate_limit_error() {
        let checker = SymptomChecker::new(StubTransport::failing(anyhow::anyhow!(
            "Rate limit reached, retry later"
        )));
        let result = checker.analyze_symptoms("fever", "key").await;
        assert_eq!(
            result,
            failure(
                ErrorCategory::RateLimited,
                "API rate limit exceeded. Please try again later."
            )
        );
    }

    #[tokio::test]
    async fn test_model_error() {
        let checker = SymptomChecker::new(StubTransport::failing(anyhow::anyhow!(
            "The model does not exist"
        )));
        let result = checker.analyze_symptoms("fever", "key").await;
        assert_eq!(
            result,
            failure(
                ErrorCategory::ModelUnavailable,
                "Model unavailable. Please try again later."
            )
        );
    }

    #[tokio::test]
    async fn test_unknown_error_embeds_raw_text() {
        let checker = SymptomChecker::new(StubTransport::failing(anyhow::anyhow!("boom")));
        let result = checker.analyze_symptoms("fever", "key").await;
        assert_eq!(
            result,
            failure(
                ErrorCategory::Unknown,
                "An error occurred while analyzing symptoms: boom"
            )
        );
        assert_eq!(result.category(), Some(ErrorCategory::Unknown));
    }

    #[tokio::test]
    async fn test_http_401_classified_as_auth() {
        let checker = SymptomChecker::new(StubTransport::failing(
            GroqApiError {
                status: StatusCode::UNAUTHORIZED,
                body: "Unauthorized".to_string(),
            }
            .into(),
        ));
        let result = checker.analyze_symptoms("fever", "key").await;
        assert_eq!(result.category(), Some(ErrorCategory::AuthFailure));
    }

    // ── Messages and formatting ──────────────────────────

    #[test]
    fn test_category_messages() {
        assert_eq!(
            ErrorCategory::MissingInput.message("Groq API key is required"),
            "Groq API key is required"
        );
        assert_eq!(
            ErrorCategory::Unknown.message("boom"),
            "An error occurred while analyzing symptoms: boom"
        );
        assert_eq!(
            ErrorCategory::ModelUnavailable.message("ignored"),
            "Model unavailable. Please try again later."
        );
    }

    #[test]
    fn test_request_debug_hides_api_key() {
        let request = AnalysisRequest::new("headache", "gsk_secret_value");
        let printed = format!("{request:?}");
        assert!(printed.contains("headache"));
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("gsk_secret_value"));
    }

    // ── Response shape ───────────────────────────────────

    #[test]
    fn test_response_json_shape() {
        let ok = AnalysisResult::Success {
            analysis: "Drink water.".to_string(),
        };
        assert_eq!(
            serde_json::to_value(ok.into_response()).unwrap(),
            serde_json::json!({"analysis": "Drink water."})
        );

        let err = failure(ErrorCategory::MissingInput, "Groq API key is required");
        assert_eq!(
            serde_json::to_value(err.into_response()).unwrap(),
            serde_json::json!({"error": "Groq API key is required"})
        );
    }
}
