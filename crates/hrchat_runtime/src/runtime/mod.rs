//! The question pipeline.
//!
//! One [`Runtime`] owns one session. [`Runtime::ask`] runs the stages in
//! order and appends a turn only when every stage succeeded:
//!
//! - **sql**: template or SQL-mode model call, then clean-up
//! - **execute**: read-only query against the HR store
//! - **answer**: summarizer call (skipped for empty results)
//!
//! Split into focused submodules:
//! - **llm**: the single model-call helper
//! - **sql**: SQL generation, execution and the optional repair pass
//! - **answer**: result summarization

mod answer;
mod llm;
mod sql;

use std::sync::Arc;
use std::time::Instant;

use hrchat_core::{ConversationTurn, QueryResult, Session};
use hrchat_llms::providers::groq::GroqConfig;
use hrchat_llms::providers::ollama::OllamaConfig;
use hrchat_llms::{GroqProvider, OllamaProvider, Provider, ProviderRegistry};
use hrchat_observability::{pipeline_span, record_duration, record_error};
use serde::Serialize;
use tracing::Instrument;

use crate::config::{ModelMode, RuntimeConfig};
use crate::context::prompt;
use crate::error::{Result, RuntimeError};

/// Where the executed SQL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlSource {
    Template,
    Model,
    Repaired,
}

/// Everything one successful question produced.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub question: String,
    pub sql: String,
    pub sql_source: SqlSource,
    pub result: QueryResult,
    pub answer: String,
}

pub struct Runtime {
    pub session: Session,
    pub provider: Arc<dyn Provider>,
    pub config: RuntimeConfig,
}

impl Runtime {
    /// Runtime backed by the provider `config.mode` selects.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let provider = create_provider(config.mode, &config)?;
        Ok(Self::with_provider(config, provider))
    }

    pub fn with_provider(config: RuntimeConfig, provider: Arc<dyn Provider>) -> Self {
        Self {
            session: Session::new(),
            provider,
            config,
        }
    }

    /// Answers one question and records it in session memory.
    ///
    /// Any failure aborts the turn and leaves the session as it was. A
    /// blank question is rejected before the model is contacted.
    pub async fn ask(&mut self, question: &str) -> Result<TurnOutcome> {
        let question = prompt::validate_question(question)?.to_string();
        let span = pipeline_span!(self.session.id, question.len());

        let outcome = async {
            let start = Instant::now();
            let result = self.run_turn(&question).await;
            record_duration("duration_ms", start.elapsed());
            if let Err(e) = &result {
                record_error(e);
            }
            result
        }
        .instrument(span)
        .await?;

        self.session.add_turn(
            ConversationTurn::new(&outcome.question, &outcome.sql, &outcome.answer)
                .with_row_count(outcome.result.row_count()),
        );
        Ok(outcome)
    }

    async fn run_turn(&self, question: &str) -> Result<TurnOutcome> {
        let memory = self.session.last(self.config.memory_turns);

        let (sql, sql_source) = self.generate_sql(question, memory).await?;
        let (sql, result, sql_source) = self.execute_sql(question, sql, sql_source).await?;
        tracing::Span::current().record("turn.rows", result.row_count());

        let answer = self.answer(question, &result, memory).await?;

        Ok(TurnOutcome {
            question: question.to_string(),
            sql,
            sql_source,
            result,
            answer,
        })
    }

    /// Forgets the conversation and starts a new session id.
    pub fn reset(&mut self) {
        self.session.reset();
    }
}

/// Builds the provider for `mode` from `config` and the environment
/// (`GROQ_API_KEY` for Groq).
pub fn create_provider(mode: ModelMode, config: &RuntimeConfig) -> Result<Arc<dyn Provider>> {
    let model = if config.mode == mode {
        config.model.clone()
    } else {
        mode.model_from_env()
    };

    match mode {
        ModelMode::Groq => {
            let api_key = std::env::var(GroqProvider::API_KEY_ENV).unwrap_or_default();
            let groq = GroqProvider::new(
                GroqConfig::new(api_key)
                    .with_base_url(&config.groq_base_url)
                    .with_model(model)
                    .with_timeout(config.timeout),
            )
            .map_err(|e| RuntimeError::ConfigError(format!("groq: {e}")))?;
            Ok(Arc::new(groq))
        }
        ModelMode::Local => {
            let ollama = OllamaProvider::new(
                OllamaConfig::default()
                    .with_base_url(&config.ollama_base_url)
                    .with_model(model)
                    .with_timeout(config.timeout),
            )
            .map_err(|e| RuntimeError::ConfigError(format!("local: {e}")))?;
            Ok(Arc::new(ollama))
        }
    }
}

/// Registry of every back end that can be built from the current
/// configuration, keyed `groq` / `local`. Back ends that fail to build are
/// returned alongside with the reason.
pub fn build_registry(config: &RuntimeConfig) -> (ProviderRegistry, Vec<(ModelMode, RuntimeError)>) {
    let mut registry = ProviderRegistry::new();
    let mut unavailable = Vec::new();
    for mode in ModelMode::ALL {
        match create_provider(mode, config) {
            Ok(provider) => registry = registry.register_arc(mode.as_str(), provider),
            Err(e) => unavailable.push((mode, e)),
        }
    }
    (registry, unavailable)
}
