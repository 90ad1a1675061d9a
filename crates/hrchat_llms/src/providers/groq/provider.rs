//! Groq provider implementation

use super::convert::{error_message, from_groq_response, to_groq_request};
use super::types::{GroqConfig, GroqModelList, GroqResponse};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use reqwest::Client;

pub struct GroqProvider {
    config: GroqConfig,
    client: Client,
}

impl GroqProvider {
    pub const API_KEY_ENV: &'static str = "GROQ_API_KEY";

    pub fn new(config: GroqConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey("groq".to_string()));
        }
        let client = crate::providers::http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GroqConfig {
        &self.config
    }
}

#[async_trait]
impl Provider for GroqProvider {
    fn provider_id(&self) -> &str {
        "groq"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}chat/completions", self.config.base_url);
        let mut request = request;
        if request.model.is_empty() {
            request.model = self.config.model.clone();
        }
        let body = to_groq_request(&request);

        tracing::debug!(model = %request.model, messages = request.messages.len(), "groq request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::provider_error(format!(
                "Groq API error {}: {}",
                status,
                error_message(&error_text)
            )));
        }

        let groq_resp: GroqResponse = response.json().await?;
        from_groq_response(groq_resp, &request.model)
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}models", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::provider_error(format!(
                "Groq API error {}: {}",
                status,
                error_message(&error_text)
            )));
        }

        let list: GroqModelList = response.json().await?;
        let mut ids: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
        ids.sort();
        Ok(ids)
    }
}
