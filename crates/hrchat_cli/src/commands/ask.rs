//! `hrchat ask`: one question, one answer.

use std::path::PathBuf;

use anyhow::Result;
use hrchat_runtime::{ModelMode, Runtime, TurnOutcome};

use super::load_config;
use crate::output;

pub async fn handle(
    question: &str,
    mode: Option<ModelMode>,
    show_sql: bool,
    db: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(mode, db)?;
    let mut runtime = Runtime::new(config)?;

    let outcome = ask_with_spinner(&mut runtime, question).await?;
    print_outcome(&outcome, show_sql, runtime.config.preview_rows);
    Ok(())
}

/// Runs one turn behind a spinner. Shared with `chat`.
pub(crate) async fn ask_with_spinner(runtime: &mut Runtime, question: &str) -> Result<TurnOutcome> {
    let spinner = output::spinner(&format!("Thinking ({})...", runtime.provider.provider_id()));
    match runtime.ask(question).await {
        Ok(outcome) => {
            output::spinner_clear(&spinner);
            Ok(outcome)
        }
        Err(e) => {
            output::spinner_clear(&spinner);
            Err(e.into())
        }
    }
}

pub(crate) fn print_outcome(outcome: &TurnOutcome, show_sql: bool, preview_rows: usize) {
    if output::is_json() {
        output::data("turn", outcome);
        return;
    }

    output::answer(&outcome.answer);
    if show_sql {
        output::sql(&outcome.sql);
        output::dim(&format!(
            "  {} rows, source: {:?}",
            outcome.result.row_count(),
            outcome.sql_source
        ));
        output::query_table(&outcome.result, preview_rows);
    }
}
