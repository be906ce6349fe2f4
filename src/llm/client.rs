use crate::config::{SecretStore, Settings};
use crate::error::{AnalysisError, Result};
use crate::llm::types::*;
use crate::llm::TextModel;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, StatusCode};

/// Minimal `generateContent` client: one text prompt in, text out.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    secrets: SecretStore,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            secrets: settings.secrets.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let api_key = self.secrets.api_key()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
        };

        info!("Sending {} byte prompt to {}", prompt.len(), self.model);

        let res = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(classify_failure(status, err_text));
        }

        let body: GenerateContentResponse = res.json().await?;

        if let Some(reason) = body
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(AnalysisError::ExternalService(format!(
                "Prompt was blocked by the model: {}",
                reason
            )));
        }

        let text = body.text().ok_or_else(|| {
            AnalysisError::ExternalService("Model returned no text content".to_string())
        })?;

        debug!("Received {} byte response", text.len());
        Ok(text)
    }
}

fn classify_failure(status: StatusCode, body: String) -> AnalysisError {
    let rejected_key = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || body.contains("API_KEY_INVALID");

    if rejected_key {
        AnalysisError::Credential(format!(
            "The API key was rejected (status {}): {}",
            status, body
        ))
    } else {
        AnalysisError::ExternalService(format!(
            "Gemini API Error (status {}): {}",
            status, body
        ))
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    fn ensure_ready(&self) -> Result<()> {
        self.secrets.api_key().map(|_| ())
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}
