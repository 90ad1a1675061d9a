//! On-disk layout for the HR database.

use anyhow::Context;
use std::path::Path;

use crate::error::Result;

/// Creates the directory holding `db_path` if it does not exist yet.
pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("create database dir")?;
        }
    }
    Ok(())
}
