//! CSV → `employees` table.
//!
//! The table is dropped and rebuilt on every run, so re-ingesting the same
//! file yields the same rows. Column affinity is inferred from the values:
//! INTEGER when every non-empty cell parses as an integer, REAL when every
//! cell parses as a number, TEXT otherwise. Empty cells become NULL.

use rusqlite::types::Value;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use hrchat_constant::defaults::TABLE_NAME;

use super::connection;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
    /// `(Department, headcount)` ordered by headcount, largest first.
    pub departments: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Real,
    Text,
}

impl ColumnKind {
    fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Real => "REAL",
            ColumnKind::Text => "TEXT",
        }
    }

    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Integer;
        for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
            if kind == ColumnKind::Integer && cell.parse::<i64>().is_err() {
                kind = ColumnKind::Real;
            }
            if kind == ColumnKind::Real && cell.parse::<f64>().is_err() {
                return ColumnKind::Text;
            }
        }
        kind
    }

    fn value(self, cell: &str) -> Value {
        let cell = cell.trim();
        if cell.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnKind::Integer => cell.parse().map(Value::Integer).unwrap_or(Value::Null),
            ColumnKind::Real => cell.parse().map(Value::Real).unwrap_or(Value::Null),
            ColumnKind::Text => Value::Text(cell.to_string()),
        }
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Loads the CSV file at `csv_path` into the database at `db_path`.
pub fn ingest_csv(csv_path: &Path, db_path: &Path) -> Result<IngestReport> {
    if !csv_path.exists() {
        return Err(CoreError::Ingest(format!(
            "dataset not found at {}",
            csv_path.display()
        )));
    }
    let file = std::fs::File::open(csv_path)?;
    ingest_reader(file, db_path)
}

/// Loads CSV data from any reader into the database at `db_path`.
pub fn ingest_reader<R: Read>(reader: R, db_path: &Path) -> Result<IngestReport> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().any(|h| h.is_empty()) {
        return Err(CoreError::Ingest("CSV header is missing or has blank columns".into()));
    }

    let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|idx| ColumnKind::infer(records.iter().filter_map(|r| r.get(idx))))
        .collect();

    let mut conn = connection::open_writable(db_path)?;
    let tx = conn.transaction()?;

    let table = quote_ident(TABLE_NAME);
    let column_defs = headers
        .iter()
        .zip(&kinds)
        .map(|(name, kind)| format!("{} {}", quote_ident(name), kind.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({column_defs});"
    ))?;

    {
        let placeholders = (1..=headers.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = tx.prepare(&format!("INSERT INTO {table} VALUES ({placeholders})"))?;
        for record in &records {
            let values = kinds
                .iter()
                .enumerate()
                .map(|(idx, kind)| kind.value(record.get(idx).unwrap_or("")));
            stmt.execute(rusqlite::params_from_iter(values))?;
        }
    }
    tx.commit()?;

    let departments = if headers.iter().any(|h| h == "Department") {
        department_preview(&conn)?
    } else {
        Vec::new()
    };

    tracing::info!(
        table = TABLE_NAME,
        rows = records.len(),
        columns = headers.len(),
        "ingested dataset"
    );

    Ok(IngestReport {
        table: TABLE_NAME.to_string(),
        rows: records.len(),
        columns: headers.len(),
        departments,
    })
}

/// Headcount per department, largest first. Sanity check after ingestion.
pub fn department_preview(conn: &rusqlite::Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT Department, COUNT(*) AS count FROM {} GROUP BY Department ORDER BY count DESC, Department",
        quote_ident(TABLE_NAME)
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, Option<String>>(0)?.unwrap_or_default(),
            row.get::<_, i64>(1)?,
        ))
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}
