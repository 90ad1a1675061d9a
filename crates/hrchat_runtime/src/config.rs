//! Runtime configuration for hrchat

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use hrchat_constant::defaults;

use crate::error::RuntimeError;

/// Which model back end answers questions (`MODEL_MODE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelMode {
    #[default]
    Groq,
    Local,
}

impl ModelMode {
    pub const ALL: [ModelMode; 2] = [ModelMode::Groq, ModelMode::Local];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelMode::Groq => "groq",
            ModelMode::Local => "local",
        }
    }

    /// Model id for this mode, honoring `GROQ_MODEL` / `LOCAL_MODEL_ID`.
    pub fn model_from_env(&self) -> String {
        let (var, fallback) = match self {
            ModelMode::Groq => ("GROQ_MODEL", defaults::GROQ_MODEL),
            ModelMode::Local => ("LOCAL_MODEL_ID", defaults::LOCAL_MODEL_ID),
        };
        std::env::var(var)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ModelMode::Groq => defaults::GROQ_MODEL,
            ModelMode::Local => defaults::LOCAL_MODEL_ID,
        }
    }
}

impl FromStr for ModelMode {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(ModelMode::Groq),
            "local" | "ollama" => Ok(ModelMode::Local),
            other => Err(RuntimeError::ConfigError(format!(
                "unknown model mode '{}' (expected groq or local)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ModelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub mode: ModelMode,
    /// Model id sent with every request
    pub model: String,
    pub groq_base_url: String,
    pub ollama_base_url: String,
    /// SQLite file queried by the pipeline
    pub db_path: PathBuf,
    /// Turns of session memory rendered into prompts
    pub memory_turns: usize,
    /// LIMIT appended to non-count queries without one
    pub row_limit: usize,
    /// Rows of the result shown to the summarizer
    pub preview_rows: usize,
    /// One corrective model call when the generated SQL is rejected
    pub sql_repair: bool,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(PathBuf::from(defaults::DB_PATH))
    }
}

impl RuntimeConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            mode: ModelMode::default(),
            model: ModelMode::default().default_model().to_string(),
            groq_base_url: defaults::GROQ_BASE_URL.to_string(),
            ollama_base_url: defaults::OLLAMA_BASE_URL.to_string(),
            db_path,
            memory_turns: defaults::MEMORY_TURNS,
            row_limit: defaults::ROW_LIMIT,
            preview_rows: defaults::PREVIEW_ROWS,
            sql_repair: false,
            max_tokens: defaults::MAX_TOKENS,
            timeout: Duration::from_secs(defaults::TIMEOUT_SECS),
        }
    }

    /// Switches mode. The model follows the mode unless one was set
    /// explicitly with [`with_model`](Self::with_model).
    pub fn with_mode(mut self, mode: ModelMode) -> Self {
        if self.model == self.mode.default_model() || self.model == self.mode.model_from_env() {
            self.model = mode.model_from_env();
        }
        self.mode = mode;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_memory_turns(mut self, turns: usize) -> Self {
        self.memory_turns = turns;
        self
    }

    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = limit;
        self
    }

    pub fn with_sql_repair(mut self, enabled: bool) -> Self {
        self.sql_repair = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_groq_base_url(mut self, url: impl Into<String>) -> Self {
        self.groq_base_url = url.into();
        self
    }

    pub fn with_ollama_base_url(mut self, url: impl Into<String>) -> Self {
        self.ollama_base_url = url.into();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unparseable numeric values are an error rather than silently
    /// falling back, so a typo in `.env` is visible.
    pub fn from_env() -> Result<Self, RuntimeError> {
        let mut config = Self::default();

        if let Some(mode) = env_nonempty("MODEL_MODE") {
            config.mode = mode.parse()?;
        }
        config.model = config.mode.model_from_env();

        if let Some(url) = env_nonempty("GROQ_BASE_URL") {
            config.groq_base_url = url;
        }
        if let Some(url) = env_nonempty("OLLAMA_BASE_URL") {
            config.ollama_base_url = url;
        }
        if let Some(path) = env_nonempty("HRCHAT_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(turns) = env_parse::<usize>("HRCHAT_MEMORY_TURNS")? {
            config.memory_turns = turns;
        }
        if let Some(limit) = env_parse::<usize>("HRCHAT_ROW_LIMIT")? {
            if limit == 0 {
                return Err(RuntimeError::ConfigError(
                    "HRCHAT_ROW_LIMIT must be greater than 0".into(),
                ));
            }
            config.row_limit = limit;
        }
        if let Some(flag) = env_nonempty("HRCHAT_SQL_REPAIR") {
            config.sql_repair = parse_flag(&flag).ok_or_else(|| {
                RuntimeError::ConfigError(format!("HRCHAT_SQL_REPAIR: expected a boolean, got '{flag}'"))
            })?;
        }
        if let Some(secs) = env_parse::<u64>("HRCHAT_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, RuntimeError> {
    match env_nonempty(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| RuntimeError::ConfigError(format!("{key}: invalid value '{raw}'"))),
    }
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
