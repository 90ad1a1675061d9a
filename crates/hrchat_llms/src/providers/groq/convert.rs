//! Conversion between unified types and Groq types

use super::types::{GroqErrorBody, GroqMessage, GroqRequest, GroqResponse};
use crate::error::{Error, Result};
use crate::types::{GenerateRequest, GenerateResponse, Message, Usage};

pub fn to_groq_request(req: &GenerateRequest) -> GroqRequest {
    GroqRequest {
        model: req.model.clone(),
        messages: req.messages.iter().map(to_groq_message).collect(),
        temperature: req.options.temperature,
        max_tokens: req.options.max_tokens,
        stream: false,
    }
}

fn to_groq_message(msg: &Message) -> GroqMessage {
    GroqMessage {
        role: msg.role.as_str().to_string(),
        content: Some(msg.content.clone()),
    }
}

/// First choice's text. An empty or missing completion is an invalid
/// response, not an empty answer.
pub fn from_groq_response(resp: GroqResponse, requested_model: &str) -> Result<GenerateResponse> {
    let choice = resp
        .choices
        .first()
        .ok_or_else(|| Error::invalid_response("No choices in Groq response"))?;

    let text = choice
        .message
        .content
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if text.is_empty() {
        return Err(Error::invalid_response("No content in Groq response"));
    }

    Ok(GenerateResponse {
        text: text.to_string(),
        model: resp.model.clone().unwrap_or_else(|| requested_model.to_string()),
        usage: resp.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
    })
}

/// Error message from a non-2xx body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<GroqErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
