#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! AI explanation layer with LLM provider abstraction.
//!
//! Supports Google Gemini, Anthropic Claude, and `OpenAI` via a common
//! trait; the provider is selected from environment variables. Given a
//! scored analysis site, [`explain_site`] asks the provider for a siting
//! consultant's narrative, and degrades to a deterministic rule-based
//! fallback when the provider fails. The fallback is keyed off the shared
//! [`cafe_map_site_models::RecommendationTier`] taxonomy, so its thresholds
//! cannot drift from the scoring engine's.

pub mod fallback;
pub mod prompt;
pub mod providers;

use cafe_map_warehouse_models::AnalysisSite;
use thiserror::Error;

use crate::providers::LlmProvider;

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to the LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// The provider returned an empty completion.
    #[error("provider returned an empty completion")]
    EmptyCompletion,

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },

    /// Not enough sites supplied for a comparison.
    #[error("comparison requires at least 2 sites, got {count}")]
    NotEnoughSites {
        /// How many sites were supplied.
        count: usize,
    },
}

/// Generates an explanation narrative for one scored site.
///
/// Tries the LLM provider first; if the call fails or returns an empty
/// completion, logs the error and returns the deterministic fallback
/// narrative instead. This function therefore always produces text.
pub async fn explain_site(provider: &dyn LlmProvider, site: &AnalysisSite) -> String {
    let user_prompt = prompt::build_explain_prompt(site);

    match provider.generate(prompt::SYSTEM_PROMPT, &user_prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            log::warn!("Provider returned empty explanation; using fallback narrative");
            fallback::fallback_narrative(site)
        }
        Err(e) => {
            log::error!("AI explanation failed: {e}; using fallback narrative");
            fallback::fallback_narrative(site)
        }
    }
}

/// Generates a comparison narrative across multiple scored sites.
///
/// # Errors
///
/// Returns [`AiError::NotEnoughSites`] for fewer than 2 sites, or the
/// provider error if the LLM call fails. Comparisons have no fallback.
pub async fn compare_sites(
    provider: &dyn LlmProvider,
    sites: &[AnalysisSite],
) -> Result<String, AiError> {
    if sites.len() < 2 {
        return Err(AiError::NotEnoughSites { count: sites.len() });
    }

    let user_prompt = prompt::build_compare_prompt(sites);
    let text = provider
        .generate(prompt::SYSTEM_PROMPT, &user_prompt)
        .await?;
    if text.trim().is_empty() {
        return Err(AiError::EmptyCompletion);
    }
    Ok(text)
}
