//! SQL generation and execution.

use std::time::Instant;

use hrchat_constant::defaults::SQL_TEMPERATURE;
use hrchat_core::{CoreError, ConversationTurn, QueryResult};
use hrchat_observability::{record_duration, sql_span};
use tracing::Instrument;

use crate::context::{prompt, sql as sqlfix, templates};
use crate::error::{Result, RuntimeError};

use super::{Runtime, SqlSource};

impl Runtime {
    /// Template SQL when one matches, otherwise one SQL-mode model call.
    pub(crate) async fn generate_sql(
        &self,
        question: &str,
        memory: &[ConversationTurn],
    ) -> Result<(String, SqlSource)> {
        if let Some(sql) = templates::match_known_sql(question) {
            tracing::debug!(sql, "using SQL template");
            return Ok((sql.to_string(), SqlSource::Template));
        }

        let raw = self
            .complete("sql", prompt::build_sql_messages(question, memory), SQL_TEMPERATURE)
            .await?;
        let sql = sqlfix::prepare_sql(&raw, self.config.row_limit);
        tracing::debug!(raw = %raw, sql = %sql, "generated SQL");
        Ok((sql, SqlSource::Model))
    }

    /// Runs `sql`. With repair enabled, a rejected statement gets exactly
    /// one corrected attempt; otherwise the first failure ends the turn.
    pub(crate) async fn execute_sql(
        &self,
        question: &str,
        sql: String,
        source: SqlSource,
    ) -> Result<(String, QueryResult, SqlSource)> {
        let first = if self.config.sql_repair && !sqlfix::is_valid_hr_sql(&sql) {
            Err("query is not a single SELECT over the employees table".to_string())
        } else {
            self.run_query(&sql).await
        };

        match first {
            Ok(result) => Ok((sql, result, source)),
            Err(message) if self.config.sql_repair => {
                tracing::info!(error = %message, "repairing generated SQL");
                let fixed = self.repair_sql(question, &sql, &message).await?;
                let result = self
                    .run_query(&fixed)
                    .await
                    .map_err(|message| RuntimeError::sql_failed(&fixed, message))?;
                Ok((fixed, result, SqlSource::Repaired))
            }
            Err(message) => Err(RuntimeError::sql_failed(sql, message)),
        }
    }

    async fn repair_sql(&self, question: &str, bad_sql: &str, error: &str) -> Result<String> {
        let raw = self
            .complete(
                "repair",
                prompt::build_repair_messages(question, bad_sql, error),
                SQL_TEMPERATURE,
            )
            .await?;
        Ok(sqlfix::prepare_sql(&raw, self.config.row_limit))
    }

    /// Executes on a blocking thread; errors come back as display text.
    async fn run_query(&self, sql: &str) -> std::result::Result<QueryResult, String> {
        let db_path = self.config.db_path.clone();
        let statement = sql.to_string();

        async move {
            let start = Instant::now();
            let joined = tokio::task::spawn_blocking(move || {
                hrchat_core::db::run_query(&db_path, &statement)
            })
            .await;
            record_duration("duration_ms", start.elapsed());

            match joined {
                Ok(Ok(result)) => {
                    tracing::Span::current().record("sql.rows", result.row_count());
                    Ok(result)
                }
                Ok(Err(e)) => {
                    hrchat_observability::record_error(&e);
                    Err(describe(&e))
                }
                Err(join) => Err(format!("query task failed: {join}")),
            }
        }
        .instrument(sql_span!(sql))
        .await
    }
}

fn describe(err: &CoreError) -> String {
    match err {
        CoreError::Sql(inner) => inner.to_string(),
        other => other.to_string(),
    }
}
