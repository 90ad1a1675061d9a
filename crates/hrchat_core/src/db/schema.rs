//! Table layout of `employees` and the schema hint handed to the model.

use serde::Serialize;

use hrchat_constant::defaults::TABLE_NAME;

use super::ingest::quote_ident;
use crate::error::Result;

/// The IBM HR Attrition columns, in dataset order.
pub const ALLOWED_COLUMNS: [&str; 35] = [
    "Age",
    "Attrition",
    "BusinessTravel",
    "DailyRate",
    "Department",
    "DistanceFromHome",
    "Education",
    "EducationField",
    "EmployeeCount",
    "EmployeeNumber",
    "EnvironmentSatisfaction",
    "Gender",
    "HourlyRate",
    "JobInvolvement",
    "JobLevel",
    "JobRole",
    "JobSatisfaction",
    "MaritalStatus",
    "MonthlyIncome",
    "MonthlyRate",
    "NumCompaniesWorked",
    "Over18",
    "OverTime",
    "PercentSalaryHike",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "StandardHours",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub decl_type: String,
}

/// Table name, column list and query rules, as embedded in the SQL prompt.
pub fn schema_hint() -> String {
    format!(
        "SQLite table: {TABLE_NAME}\n\
         Columns: {}\n\
         \n\
         Rules:\n\
         - Only generate SELECT queries.\n\
         - Never use INSERT, UPDATE, DELETE, DROP, ALTER, PRAGMA, ATTACH, DETACH, CREATE.\n\
         - Prefer aggregations (COUNT, AVG, MIN, MAX) when asked for summaries.\n\
         - Default LIMIT 50 unless the user asks for full output.\n",
        ALLOWED_COLUMNS.join(", ")
    )
}

/// Columns of `employees` as stored, via `PRAGMA table_info`.
/// Empty when the table does not exist.
pub fn table_columns(conn: &rusqlite::Connection) -> Result<Vec<TableColumn>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(TABLE_NAME)))?;
    let rows = stmt.query_map([], |row| {
        Ok(TableColumn {
            name: row.get(1)?,
            decl_type: row.get(2)?,
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fixtures, open_read_only};

    #[test]
    fn test_schema_hint_lists_every_column() {
        let hint = schema_hint();
        assert!(hint.starts_with("SQLite table: employees"));
        for column in ALLOWED_COLUMNS {
            assert!(hint.contains(column), "missing {column}");
        }
    }

    #[test]
    fn test_table_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::sample_db(dir.path());
        let conn = open_read_only(&path).unwrap();

        let columns = table_columns(&conn).unwrap();
        assert_eq!(columns.len(), 8);
        assert_eq!(
            columns[0],
            TableColumn {
                name: "Age".into(),
                decl_type: "INTEGER".into()
            }
        );
        assert!(columns
            .iter()
            .any(|c| c.name == "Attrition" && c.decl_type == "TEXT"));
    }

    #[test]
    fn test_table_columns_missing_table() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        assert!(table_columns(&conn).unwrap().is_empty());
    }
}
