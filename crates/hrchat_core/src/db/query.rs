//! Read-only execution of a single SELECT.

use regex::Regex;
use rusqlite::types::ValueRef;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;

use super::connection;
use crate::error::{CoreError, Result};

static FORBIDDEN_SQL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(INSERT|UPDATE|DELETE|DROP|ALTER|PRAGMA|ATTACH|DETACH|CREATE)\b")
        .unwrap_or_else(|e| panic!("invalid forbidden-SQL pattern: {e}"))
});

/// Tabular result of one query. Cells are JSON values so results render
/// the same way in tables, prompts and `--output json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The single cell of a one-row, one-column result.
    pub fn scalar(&self) -> Option<&Value> {
        match (self.columns.len(), self.rows.as_slice()) {
            (1, [row]) => row.first(),
            _ => None,
        }
    }

    /// Markdown table of the first `max_rows` rows.
    pub fn to_markdown(&self, max_rows: usize) -> String {
        let mut out = format!("| {} |\n", self.columns.join(" | "));
        out.push_str(&format!(
            "|{}|\n",
            self.columns.iter().map(|_| "---").collect::<Vec<_>>().join("|")
        ));
        for row in self.rows.iter().take(max_rows) {
            let cells: Vec<String> = row.iter().map(display_cell).collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        out
    }
}

/// Plain rendering of one cell: strings unquoted, NULL as empty.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A statement is safe when it starts with SELECT and names no write or
/// schema keyword anywhere.
pub fn is_safe_sql(sql: &str) -> bool {
    let q = sql.trim().trim_matches(';').trim();
    if !q.to_lowercase().starts_with("select") {
        return false;
    }
    !FORBIDDEN_SQL.is_match(q)
}

/// Guards `sql`, opens `db_path` read-only and runs it.
pub fn run_query(db_path: &Path, sql: &str) -> Result<QueryResult> {
    if !is_safe_sql(sql) {
        return Err(CoreError::UnsafeSql(sql.trim().to_string()));
    }
    let conn = connection::open_read_only(db_path)?;
    execute(&conn, sql)
}

/// Runs one statement on an existing connection. Trailing statements are
/// rejected by SQLite's prepare.
pub fn execute(conn: &rusqlite::Connection, sql: &str) -> Result<QueryResult> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(to_json(row.get_ref(idx)?));
        }
        out.push(cells);
    }

    tracing::debug!(rows = out.len(), columns = width, "query executed");
    Ok(QueryResult { columns, rows: out })
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(format!("<blob {} bytes>", b.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use serde_json::json;

    #[test]
    fn test_is_safe_sql() {
        assert!(is_safe_sql("SELECT COUNT(*) FROM employees;"));
        assert!(is_safe_sql("  select Department from employees"));
        assert!(!is_safe_sql("DELETE FROM employees"));
        assert!(!is_safe_sql("SELECT 1; DROP TABLE employees;"));
        assert!(!is_safe_sql("select * from employees; pragma table_info(employees)"));
        assert!(!is_safe_sql("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(!is_safe_sql(""));
    }

    #[test]
    fn test_is_safe_sql_whole_words_only() {
        // column names containing a keyword as a substring are fine
        assert!(is_safe_sql("SELECT CreatedAt, Updated_By FROM employees"));
    }

    #[test]
    fn test_run_query_rejects_unsafe() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::sample_db(dir.path());

        let err = run_query(&path, "DROP TABLE employees").unwrap_err();
        assert!(matches!(err, CoreError::UnsafeSql(_)));

        let n = run_query(&path, "SELECT COUNT(*) FROM employees").unwrap();
        assert_eq!(n.scalar(), Some(&json!(7)));
    }

    #[test]
    fn test_run_query_missing_db() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_query(&dir.path().join("none.db"), "SELECT 1").unwrap_err();
        assert!(matches!(err, CoreError::MissingDatabase(_)));
    }

    #[test]
    fn test_run_query_sql_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::sample_db(dir.path());
        let err = run_query(&path, "SELECT NoSuchColumn FROM employees").unwrap_err();
        assert!(matches!(err, CoreError::Sql(_)));
    }

    #[test]
    fn test_attrition_count_matches_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::sample_db(dir.path());
        let result = run_query(
            &path,
            "SELECT COUNT(*) AS leavers FROM employees WHERE Attrition = 'Yes';",
        )
        .unwrap();
        assert_eq!(result.columns, vec!["leavers"]);
        assert_eq!(result.scalar(), Some(&json!(2)));
    }

    #[test]
    fn test_grouped_result_and_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::sample_db(dir.path());
        let result = run_query(
            &path,
            "SELECT Department, AVG(MonthlyIncome) AS avg_income FROM employees \
             GROUP BY Department ORDER BY Department",
        )
        .unwrap();

        assert_eq!(result.row_count(), 3);
        assert!(result.scalar().is_none());
        assert_eq!(result.rows[0][0], json!("Human Resources"));
        assert_eq!(result.rows[0][1], json!(2670.0));

        let md = result.to_markdown(2);
        let lines: Vec<_> = md.lines().collect();
        assert_eq!(lines[0], "| Department | avg_income |");
        assert_eq!(lines[1], "|---|---|");
        assert_eq!(lines[2], "| Human Resources | 2670.0 |");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::sample_db(dir.path());
        let result = run_query(&path, "SELECT * FROM employees WHERE Age > 100").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns.len(), 8);
    }

    #[test]
    fn test_display_cell() {
        assert_eq!(display_cell(&json!(null)), "");
        assert_eq!(display_cell(&json!("Sales")), "Sales");
        assert_eq!(display_cell(&json!(12)), "12");
    }
}
