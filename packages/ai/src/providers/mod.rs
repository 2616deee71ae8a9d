//! LLM provider abstraction and implementations.
//!
//! Supports Google Gemini, Anthropic Claude, and `OpenAI` via a common
//! trait. Providers are plain JSON-over-HTTPS clients; no streaming.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use crate::AiError;

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends a single-turn completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails or the provider reports an
    /// error.
    async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, AiError>;
}

fn detect_provider() -> String {
    if std::env::var("GEMINI_API_KEY").is_ok() {
        "gemini".to_string()
    } else if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        "anthropic".to_string()
    } else if std::env::var("OPENAI_API_KEY").is_ok() {
        "openai".to_string()
    } else {
        "none".to_string()
    }
}

/// Creates an LLM provider based on environment variables.
///
/// If `AI_PROVIDER` is explicitly set, uses that provider. Otherwise
/// auto-detects from available credentials:
///
/// 1. `GEMINI_API_KEY` set -> Google Gemini
/// 2. `ANTHROPIC_API_KEY` set -> Anthropic Claude
/// 3. `OPENAI_API_KEY` set -> `OpenAI`
///
/// `AI_MODEL` overrides each provider's default model name.
///
/// # Errors
///
/// Returns [`AiError::Config`] if no credentials are found or the
/// explicitly requested provider is not configured.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, AiError> {
    let provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| detect_provider());

    match provider.to_lowercase().as_str() {
        "gemini" | "google" => {
            let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| AiError::Config {
                message: "GEMINI_API_KEY environment variable not set".to_string(),
            })?;
            let model =
                std::env::var("AI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
            Ok(Box::new(gemini::GeminiProvider::new(api_key, model)))
        }
        "anthropic" | "claude" => {
            let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| AiError::Config {
                message: "ANTHROPIC_API_KEY environment variable not set".to_string(),
            })?;
            let model = std::env::var("AI_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string());
            Ok(Box::new(anthropic::AnthropicProvider::new(api_key, model)))
        }
        "openai" | "gpt" => {
            let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| AiError::Config {
                message: "OPENAI_API_KEY environment variable not set".to_string(),
            })?;
            let model = std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
            Ok(Box::new(openai::OpenAiProvider::new(api_key, model)))
        }
        other => Err(AiError::Config {
            message: format!(
                "no AI provider configured (requested: {other}); set GEMINI_API_KEY, \
                 ANTHROPIC_API_KEY, or OPENAI_API_KEY"
            ),
        }),
    }
}
