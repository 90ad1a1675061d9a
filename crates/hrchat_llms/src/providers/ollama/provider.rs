//! Ollama provider implementation

use super::types::{
    OllamaChatRequest, OllamaChatResponse, OllamaConfig, OllamaMessage, OllamaOptions, OllamaTags,
};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{GenerateRequest, GenerateResponse, Usage};
use async_trait::async_trait;
use reqwest::Client;

/// Self-hosted model over HTTP. Nothing leaves the machine.
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = crate::providers::http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn to_chat_request(&self, req: &GenerateRequest) -> OllamaChatRequest {
        let options = (req.options.temperature.is_some() || req.options.max_tokens.is_some())
            .then(|| OllamaOptions {
                temperature: req.options.temperature,
                num_predict: req.options.max_tokens,
            });

        OllamaChatRequest {
            model: if req.model.is_empty() {
                self.config.model.clone()
            } else {
                req.model.clone()
            },
            messages: req
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
            options,
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn provider_id(&self) -> &str {
        "local"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/api/chat", self.config.base_url);
        let body = self.to_chat_request(&request);

        tracing::debug!(model = %body.model, messages = body.messages.len(), "ollama request");

        let res = self.client.post(&url).json(&body).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(Error::provider_error(format!("ollama error {}: {}", status, text.trim())));
        }

        let parsed: OllamaChatResponse = serde_json::from_str(&text)?;
        if let Some(err) = parsed.error {
            return Err(Error::provider_error(format!("ollama error: {err}")));
        }
        let content = parsed
            .message
            .map(|m| m.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(Error::invalid_response("No content in Ollama response"));
        }

        let usage = match (parsed.prompt_eval_count, parsed.eval_count) {
            (Some(p), Some(c)) => Some(Usage {
                prompt_tokens: p,
                completion_tokens: c,
                total_tokens: p + c,
            }),
            _ => None,
        };

        Ok(GenerateResponse {
            text: content,
            model: parsed.model.unwrap_or(body.model),
            usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.config.base_url);
        let res = self.client.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(Error::provider_error(format!("ollama error {}: {}", status, text.trim())));
        }
        let tags: OllamaTags = res.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(base_url: &str) -> OllamaProvider {
        OllamaProvider::new(OllamaConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "gemma:2b");
        assert_eq!(
            OllamaConfig::default().with_base_url("http://h:1/").base_url,
            "http://h:1"
        );
    }

    #[test]
    fn test_chat_request_options() {
        let p = provider("http://localhost:11434");
        let req = GenerateRequest::new("", vec![Message::user("q")]).with_temperature(0.2);
        let body = serde_json::to_value(p.to_chat_request(&req)).unwrap();

        assert_eq!(body["model"], "gemma:2b");
        assert_eq!(body["stream"], false);
        assert!(body["options"]["temperature"].as_f64().is_some());
        assert!(body["options"].get("num_predict").is_none());

        let bare = serde_json::to_value(p.to_chat_request(&GenerateRequest::new("m", vec![]))).unwrap();
        assert!(bare.get("options").is_none());
    }

    #[tokio::test]
    async fn test_generate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(Matcher::PartialJson(json!({"model": "gemma:2b", "stream": false})))
            .with_status(200)
            .with_body(
                json!({
                    "model": "gemma:2b",
                    "message": {"role": "assistant", "content": "\nThere are 7 employees.\n"},
                    "done": true,
                    "prompt_eval_count": 40,
                    "eval_count": 6
                })
                .to_string(),
            )
            .create_async()
            .await;

        let req = GenerateRequest::new("gemma:2b", vec![Message::user("How many?")]);
        let out = provider(&server.url()).generate(req).await.unwrap();

        assert_eq!(out.text, "There are 7 employees.");
        assert_eq!(out.usage.unwrap().total_tokens, 46);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_model_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(404)
            .with_body(r#"{"error":"model 'gemma:2b' not found"}"#)
            .create_async()
            .await;

        let req = GenerateRequest::new("gemma:2b", vec![Message::user("q")]);
        let err = provider(&server.url()).generate(req).await.unwrap_err();
        assert!(matches!(&err, Error::Provider(m) if m.contains("not found")));
    }

    #[tokio::test]
    async fn test_generate_empty_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"model":"gemma:2b","message":{"role":"assistant","content":""},"done":true}"#)
            .create_async()
            .await;

        let req = GenerateRequest::new("gemma:2b", vec![Message::user("q")]);
        let err = provider(&server.url()).generate(req).await.unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[{"name":"gemma:2b"},{"name":"llama3.2"}]}"#)
            .create_async()
            .await;

        let models = provider(&server.url()).list_models().await.unwrap();
        assert_eq!(models, vec!["gemma:2b", "llama3.2"]);
    }
}
