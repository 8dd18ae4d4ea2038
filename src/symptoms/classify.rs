//! Maps transport failures onto user-facing error categories.

use reqwest::StatusCode;

use crate::llm::GroqApiError;

use super::ErrorCategory;

/// Classifies a transport error.
///
/// An HTTP status on a [`GroqApiError`] decides auth and rate-limit
/// failures outright; everything else goes through [`classify_text`].
pub fn classify(err: &anyhow::Error) -> ErrorCategory {
    if let Some(api) = err.downcast_ref::<GroqApiError>() {
        match api.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return ErrorCategory::AuthFailure,
            StatusCode::TOO_MANY_REQUESTS => return ErrorCategory::RateLimited,
            _ => {}
        }
    }
    classify_text(&err.to_string())
}

/// Substring heuristic over the lowercased error text. First match wins.
pub fn classify_text(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();
    if lower.contains("api_key") || lower.contains("authentication") {
        ErrorCategory::AuthFailure
    } else if lower.contains("rate limit") || lower.contains("quota") {
        ErrorCategory::RateLimited
    } else if lower.contains("model") {
        ErrorCategory::ModelUnavailable
    } else {
        ErrorCategory::Unknown
    }
}
