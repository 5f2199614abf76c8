//! Ollama-compatible text generation client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{CollaboratorError, Result};
use crate::utils::truncate_str;

use super::LanguageModel;

/// Client for `POST {base_url}/api/generate`.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.model, config.timeout_secs)
    }

    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CollaboratorError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str, json: bool) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: json.then_some("json"),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(CollaboratorError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body: truncate_str(&body, 200).to_string(),
            }
            .into());
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Unparsable(e.to_string()))?;
        let text = parsed.response.trim();
        if text.is_empty() {
            return Err(CollaboratorError::Unparsable("empty response".to_string()).into());
        }
        Ok(text.to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
