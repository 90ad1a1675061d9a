//! Groq provider module
//!
//! Groq serves open models behind an OpenAI-compatible chat-completions API.
//! API docs: https://console.groq.com/docs/api-reference#chat

mod convert;
mod provider;
mod types;

pub use provider::GroqProvider;
pub use types::{GroqConfig, GroqRequest, GroqResponse};
