//! Symptom analysis adapter over a hosted chat-completion model.
//!
//! The adapter validates a free-text symptom description, sends one
//! fixed-shape request to Groq and folds the outcome into an
//! [`AnalysisResult`]. It never returns an error to the caller.

pub mod config;
pub mod llm;
pub mod symptoms;

pub use llm::{ChatTransport, GroqClient};
pub use symptoms::{AnalysisRequest, AnalysisResponse, AnalysisResult, ErrorCategory, SymptomChecker};
