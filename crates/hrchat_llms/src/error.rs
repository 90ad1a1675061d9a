//! Error type for provider calls.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing API key for provider '{0}'")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn provider_error(msg: impl Into<String>) -> Self {
        Error::Provider(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Error::InvalidResponse(msg.into())
    }

    /// True for failures worth surfacing as "the model is unreachable"
    /// rather than "the model answered badly".
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_connect() || e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
