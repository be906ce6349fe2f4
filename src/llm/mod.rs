//! Model-backed narrative features.
//!
//! Both features talk to the model through [`TextModel`], so they can run
//! against a scripted model in tests. The Gemini HTTP client is only built
//! with the `gemini` feature.

pub mod chat;
pub mod narrator;
pub mod prompts;

#[cfg(feature = "gemini")]
pub mod client;
#[cfg(feature = "gemini")]
pub mod types;

pub use chat::*;
pub use narrator::*;

#[cfg(feature = "gemini")]
pub use client::GeminiClient;

use crate::error::{AnalysisError, Result};
use async_trait::async_trait;

/// Prompt in, text out.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Cheap pre-flight check, e.g. that a credential is configured.
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// User-facing text for a failed model call.
pub fn describe_failure(activity: &str, err: &AnalysisError) -> String {
    match err {
        AnalysisError::Credential(details) => format!(
            "Error: no usable API key for {}. {}",
            activity, details
        ),
        AnalysisError::ExternalService(_) => format!(
            "Gemini API call failed: check the API key or usage limits. Details: {}",
            err
        ),
        #[cfg(feature = "gemini")]
        AnalysisError::Http(_) => format!(
            "Gemini API call failed: check the API key or usage limits. Details: {}",
            err
        ),
        other => format!("An unexpected error occurred during {}: {}", activity, other),
    }
}
