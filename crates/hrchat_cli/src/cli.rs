//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hrchat_runtime::ModelMode;

/// Ask questions about the HR dataset in plain English
#[derive(Parser)]
#[command(name = "hrchat", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

fn parse_mode(s: &str) -> Result<ModelMode, String> {
    s.parse::<ModelMode>().map_err(|e| e.to_string())
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the HR CSV into the SQLite database (replaces the table)
    Ingest {
        /// Source CSV (default: HRCHAT_CSV_PATH or data/raw/WA_Fn-UseC_-HR-Employee-Attrition.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Target database (default: HRCHAT_DB_PATH or db/hr.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Ask one question and print the answer
    Ask {
        /// The question, in plain English
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Model back end: groq or local (default: MODEL_MODE)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ModelMode>,
        /// Also print the generated SQL and a result preview
        #[arg(long)]
        show_sql: bool,
        /// Database to query (default: HRCHAT_DB_PATH or db/hr.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Start an interactive session with follow-up memory
    Chat {
        /// Model back end: groq or local (default: MODEL_MODE)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ModelMode>,
        /// Start with SQL debugging on (toggle with /sql)
        #[arg(long)]
        show_sql: bool,
        /// Database to query (default: HRCHAT_DB_PATH or db/hr.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// List the columns of the employees table
    Schema {
        /// Database to inspect (default: HRCHAT_DB_PATH or db/hr.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Inspect and test model back ends
    Providers {
        #[command(subcommand)]
        action: ProvidersAction,
    },
}

#[derive(Subcommand)]
pub enum ProvidersAction {
    /// Show both back ends and whether they are configured
    List,
    /// Test back-end connectivity
    Test {
        /// Provider ID (groq or local)
        provider: String,
    },
    /// List models the back end reports
    Models {
        /// Provider ID (groq or local)
        provider: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "hrchat", "ask", "How", "many", "employees?", "--mode", "local", "--show-sql",
        ])
        .unwrap();
        match cli.command {
            Command::Ask {
                question,
                mode,
                show_sql,
                db,
            } => {
                assert_eq!(question.join(" "), "How many employees?");
                assert_eq!(mode, Some(ModelMode::Local));
                assert!(show_sql);
                assert!(db.is_none());
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["hrchat", "chat", "--mode", "openai"]).is_err());
    }

    #[test]
    fn test_global_output_flag() {
        let cli = Cli::try_parse_from(["hrchat", "schema", "--output", "json"]).unwrap();
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
