use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GenerateRequest, GenerateResponse};

/// A chat-completion back end.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable id (`groq`, `local`).
    fn provider_id(&self) -> &str;

    /// Model used when a request names none.
    fn default_model(&self) -> &str;

    /// One completion, one HTTP request. Failures are returned, never retried.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Models the back end reports as available.
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(vec![self.default_model().to_string()])
    }
}
