//! Groq-specific types

use std::time::Duration;

use hrchat_constant::defaults;
use serde::{Deserialize, Serialize};

/// Configuration for the Groq provider
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    /// Always ends with `/` (default: https://api.groq.com/openai/v1/)
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: format!("{}/", defaults::GROQ_BASE_URL),
            model: defaults::GROQ_MODEL.to_string(),
            timeout: Duration::from_secs(defaults::TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Chat completion request body
#[derive(Debug, Serialize)]
pub struct GroqRequest {
    pub model: String,
    pub messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroqMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
pub struct GroqResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<GroqChoice>,
    #[serde(default)]
    pub usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
pub struct GroqChoice {
    #[serde(default)]
    pub index: u32,
    pub message: GroqMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// `GET /models` response
#[derive(Debug, Deserialize)]
pub struct GroqModelList {
    pub data: Vec<GroqModel>,
}

#[derive(Debug, Deserialize)]
pub struct GroqModel {
    pub id: String,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct GroqErrorBody {
    pub error: GroqErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct GroqErrorDetail {
    pub message: String,
}
