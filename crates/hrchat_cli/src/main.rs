//! CLI entry point for hrchat.

mod cli;
mod commands;
mod output;

use clap::Parser;
use hrchat_constant::app;
use hrchat_observability::ObservabilityConfig;

use crate::cli::Cli;

/// Loads the nearest `.env`, searching from the working directory upward.
/// Variables already set in the environment win.
fn load_env_file() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd;
        for _ in 0..32 {
            let env_file = dir.join(".env");
            if env_file.exists() {
                let _ = dotenvy::from_path(&env_file);
                break;
            }
            if let Some(parent) = dir.parent() {
                dir = parent.to_path_buf();
            } else {
                break;
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let mut config = ObservabilityConfig::from_env().with_version(app::VERSION);
    if verbose {
        config = config.with_log_level("info,hrchat_runtime=debug,hrchat_llms=debug,hrchat_core=debug");
    }
    if let Err(e) = hrchat_observability::init(config) {
        output::warning(&format!("logging disabled: {e}"));
    }
}

#[tokio::main]
async fn main() {
    load_env_file();
    let cli = Cli::parse();
    output::init(cli.output);
    init_tracing(cli.verbose);

    let result = commands::handle(cli).await;
    hrchat_observability::shutdown();

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
