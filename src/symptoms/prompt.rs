//! Fixed request shape sent for every analysis.

use crate::llm::{ChatCompletionRequest, ChatMessage};

pub const MODEL: &str = "llama-3.1-8b-instant";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1000;

pub const SYSTEM_PROMPT: &str = "You are a helpful medical assistant. Provide clear, \
informative, and responsible medical guidance. Always emphasize the importance of \
consulting healthcare professionals.";

/// Renders the user message around the raw symptom text.
pub fn user_prompt(symptoms: &str) -> String {
    format!(
        "\
You are a medical assistant helping to analyze symptoms. \n\
Please provide a helpful analysis of the following symptoms:

Symptoms: {symptoms}

Please provide:
1. Possible conditions or causes (with appropriate disclaimers)
2. General recommendations (with emphasis on consulting a healthcare professional)
3. When to seek immediate medical attention
4. General self-care tips if applicable

Important: This is not a substitute for professional medical advice. Always consult with a qualified healthcare provider for proper diagnosis and treatment.

Format your response in clear, easy-to-read markdown format."
    )
}

pub fn build_request(symptoms: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: MODEL.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt(symptoms)),
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}
