//! Runtime error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("Model call failed: {0}")]
    LlmFailed(String),

    #[error("SQL execution failed: {message}\nSQL: {sql}")]
    SqlFailed { sql: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn sql_failed(sql: impl Into<String>, message: impl std::fmt::Display) -> Self {
        RuntimeError::SqlFailed {
            sql: sql.into(),
            message: message.to_string(),
        }
    }
}

impl From<hrchat_llms::Error> for RuntimeError {
    fn from(err: hrchat_llms::Error) -> Self {
        match err {
            hrchat_llms::Error::ProviderNotFound(id) => RuntimeError::ProviderNotFound(id),
            other => RuntimeError::LlmFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_failed_display() {
        let err = RuntimeError::sql_failed("SELECT x FROM employees", "no such column: x");
        assert_eq!(
            err.to_string(),
            "SQL execution failed: no such column: x\nSQL: SELECT x FROM employees"
        );
    }

    #[test]
    fn test_from_llm_error() {
        let err: RuntimeError = hrchat_llms::Error::provider_error("503").into();
        assert!(matches!(err, RuntimeError::LlmFailed(m) if m.contains("503")));

        let err: RuntimeError = hrchat_llms::Error::ProviderNotFound("x".into()).into();
        assert!(matches!(err, RuntimeError::ProviderNotFound(id) if id == "x"));
    }
}
