use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("session error: {0}")]
    Session(String),

    #[error("ingest error: {0}")]
    Ingest(String),

    #[error("unsafe SQL rejected: {0}")]
    UnsafeSql(String),

    #[error("SQL execution failed: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("database not found at {0} (run `hrchat ingest` first)")]
    MissingDatabase(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
