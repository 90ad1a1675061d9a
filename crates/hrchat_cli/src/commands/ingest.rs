//! `hrchat ingest`: load the HR CSV into SQLite.

use std::path::PathBuf;

use anyhow::{Context, Result};
use hrchat_constant::defaults;
use hrchat_core::db;

use super::path_or_env;
use crate::output;

pub async fn handle(csv: Option<PathBuf>, db_path: Option<PathBuf>) -> Result<()> {
    let csv = path_or_env(csv, "HRCHAT_CSV_PATH", defaults::CSV_PATH);
    let db_path = path_or_env(db_path, "HRCHAT_DB_PATH", defaults::DB_PATH);

    let spinner = output::spinner(&format!("Loading {}...", csv.display()));
    let (csv_for_task, db_for_task) = (csv.clone(), db_path.clone());
    let result = tokio::task::spawn_blocking(move || db::ingest_csv(&csv_for_task, &db_for_task))
        .await
        .context("ingest task panicked")?;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            output::spinner_error(&spinner, "Ingest failed");
            return Err(e.into());
        }
    };

    output::spinner_success(
        &spinner,
        &format!(
            "Loaded {} rows ({} columns) into {} at {}",
            report.rows,
            report.columns,
            report.table,
            db_path.display()
        ),
    );

    if report.departments.is_empty() {
        return Ok(());
    }

    output::header("Headcount by department");
    let mut table = output::table();
    output::table_header(&mut table, &["Department", "Employees"]);
    for (department, count) in &report.departments {
        table.add_row(vec![department.clone(), count.to_string()]);
    }
    output::table_print(&table, &report.departments);

    Ok(())
}
