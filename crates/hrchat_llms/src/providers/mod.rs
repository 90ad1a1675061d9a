pub mod groq;
pub mod ollama;

pub use groq::GroqProvider;
pub use ollama::OllamaProvider;

use std::time::Duration;

use crate::error::Result;

/// HTTP client shared by both providers: JSON only, one overall timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
