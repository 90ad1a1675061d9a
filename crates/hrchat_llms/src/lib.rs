//! hrchat_llms: chat-completion providers behind one trait.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               ProviderRegistry               │
//! │     HashMap<String, Arc<dyn Provider>>       │
//! │                     │                        │
//! │          ┌──────────┴──────────┐             │
//! │          ▼                     ▼             │
//! │   ┌─────────────┐      ┌──────────────┐      │
//! │   │    Groq     │      │    Ollama    │      │
//! │   │  (remote)   │      │   (local)    │      │
//! │   └─────────────┘      └──────────────┘      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hrchat_llms::providers::groq::GroqConfig;
//! use hrchat_llms::{GroqProvider, ProviderRegistry};
//!
//! let api_key = std::env::var(GroqProvider::API_KEY_ENV).unwrap_or_default();
//! let provider = GroqProvider::new(GroqConfig::new(api_key)).unwrap();
//! let registry = ProviderRegistry::new().register("groq", provider);
//! ```
//!
//! Every call is a single request: no retries, no streaming.

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;


pub use error::{Error, Result};
pub use provider::{Provider, ProviderRegistry};

pub use providers::{GroqProvider, OllamaProvider};

pub use types::{GenerateOptions, GenerateRequest, GenerateResponse, Message, Role, Usage};
