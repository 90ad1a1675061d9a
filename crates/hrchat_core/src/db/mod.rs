//! Embedded HR store: a single SQLite file holding the `employees` table.
//!
//! - `ingest`: CSV → `employees` (replace), the only writer.
//! - `query`: read-only execution of one model-generated SELECT.
//! - `schema`: column list and the schema hint given to the model.

mod connection;
mod ingest;
mod layout;
mod query;
mod schema;

pub use connection::{open_read_only, open_writable};
pub use ingest::{department_preview, ingest_csv, ingest_reader, IngestReport};
pub use layout::ensure_db_dir;
pub use query::{display_cell, execute, is_safe_sql, run_query, QueryResult};
pub use schema::{schema_hint, table_columns, TableColumn, ALLOWED_COLUMNS};

#[cfg(test)]
pub(crate) mod fixtures {
    /// Seven employees, three departments, two leavers.
    pub const SAMPLE_CSV: &str = "\
Age,Attrition,Department,JobRole,MonthlyIncome,JobSatisfaction,OverTime,EmployeeNumber
41,Yes,Sales,Sales Executive,5993,4,Yes,1
49,No,Research & Development,Research Scientist,5130,2,No,2
37,Yes,Research & Development,Laboratory Technician,2090,3,Yes,4
33,No,Research & Development,Research Scientist,2909,3,Yes,5
27,No,Research & Development,Laboratory Technician,3468,2,No,7
32,No,Sales,Sales Representative,3068,4,No,8
59,No,Human Resources,Human Resources,2670,1,Yes,10
";

    pub fn sample_db(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("hr.db");
        super::ingest_reader(SAMPLE_CSV.as_bytes(), &path).unwrap();
        path
    }
}
