//! Command dispatch.

pub mod ask;
pub mod chat;
pub mod ingest;
pub mod providers;
pub mod schema;

use std::path::PathBuf;

use anyhow::Result;
use hrchat_runtime::{ModelMode, RuntimeConfig};

use crate::cli::{Cli, Command};

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Ingest { csv, db } => ingest::handle(csv, db).await,
        Command::Ask {
            question,
            mode,
            show_sql,
            db,
        } => ask::handle(&question.join(" "), mode, show_sql, db).await,
        Command::Chat { mode, show_sql, db } => chat::handle(mode, show_sql, db).await,
        Command::Schema { db } => schema::handle(db).await,
        Command::Providers { action } => providers::handle(action).await,
    }
}

/// Environment configuration with command-line overrides applied.
pub(crate) fn load_config(mode: Option<ModelMode>, db: Option<PathBuf>) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_env()?;
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }
    if let Some(db) = db {
        config = config.with_db_path(db);
    }
    Ok(config)
}

/// `flag`, else the non-empty env var `key`, else `default`.
pub(crate) fn path_or_env(flag: Option<PathBuf>, key: &str, default: &str) -> PathBuf {
    flag.or_else(|| {
        std::env::var(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(default))
}
