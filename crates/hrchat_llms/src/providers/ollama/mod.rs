//! Ollama provider module
//!
//! Talks to a self-hosted Ollama server (default `http://localhost:11434`)
//! through its non-streaming `/api/chat` endpoint. No API key.

mod provider;
mod types;

pub use provider::OllamaProvider;
pub use types::OllamaConfig;
