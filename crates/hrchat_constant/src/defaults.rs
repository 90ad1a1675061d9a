//! Defaults shared by ingestion, runtime and CLI.

/// Table holding one row per employee.
pub const TABLE_NAME: &str = "employees";

/// SQLite file, relative to the working directory.
pub const DB_PATH: &str = "db/hr.db";
/// Source CSV for `hrchat ingest`.
pub const CSV_PATH: &str = "data/raw/WA_Fn-UseC_-HR-Employee-Attrition.csv";

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_MODEL: &str = "llama-3.1-8b-instant";

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const LOCAL_MODEL_ID: &str = "gemma:2b";

/// Turns of session memory rendered into each prompt.
pub const MEMORY_TURNS: usize = 6;
/// LIMIT appended to non-count queries that have none.
pub const ROW_LIMIT: usize = 50;
/// Rows shown to the summarizer.
pub const PREVIEW_ROWS: usize = 20;

pub const SQL_TEMPERATURE: f32 = 0.0;
pub const ANSWER_TEMPERATURE: f32 = 0.2;
pub const MAX_TOKENS: u32 = 512;
pub const TIMEOUT_SECS: u64 = 120;

/// Example questions offered by the chat front end.
pub const SMART_PROMPTS: &[&str] = &[
    "How many employees are there?",
    "How many employees are above 39?",
    "Show employee count by department.",
    "Which department has the highest average JobSatisfaction?",
    "What is the attrition rate by department?",
    "Compare average MonthlyIncome across departments.",
];
