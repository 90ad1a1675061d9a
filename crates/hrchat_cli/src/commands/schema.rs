//! `hrchat schema`: columns of the employees table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use hrchat_constant::defaults;
use hrchat_core::db;

use super::path_or_env;
use crate::output;

pub async fn handle(db_path: Option<PathBuf>) -> Result<()> {
    let db_path = path_or_env(db_path, "HRCHAT_DB_PATH", defaults::DB_PATH);

    let path = db_path.clone();
    let columns = tokio::task::spawn_blocking(move || {
        let conn = db::open_read_only(&path)?;
        db::table_columns(&conn)
    })
    .await
    .context("schema task panicked")??;

    output::header(&format!("{} ({})", defaults::TABLE_NAME, db_path.display()));
    let mut table = output::table();
    output::table_header(&mut table, &["Column", "Type", "Queryable"]);
    for column in &columns {
        let queryable = db::ALLOWED_COLUMNS.contains(&column.name.as_str());
        table.add_row(vec![
            column.name.clone(),
            column.decl_type.clone(),
            if queryable { "yes" } else { "no" }.to_string(),
        ]);
    }
    output::table_print(&table, &columns);
    Ok(())
}
