//! `hrchat chat`: interactive session with follow-up memory.

use std::path::PathBuf;

use anyhow::Result;
use hrchat_constant::defaults::SMART_PROMPTS;
use hrchat_core::{write_transcript, TranscriptFormat};
use hrchat_runtime::context::prompt::render_memory;
use hrchat_runtime::{ModelMode, Runtime};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::ask::{ask_with_spinner, print_outcome};
use super::load_config;
use crate::output;

const HELP: &str = "\
/help                 show this help
/clear                start a new conversation
/memory [N]           show the last N turns (default: memory window)
/sql                  toggle SQL and result preview
/prompts              list suggested questions
/run N                ask suggested question N
/export FORMAT PATH   write the transcript (txt, pages or json)
/quit                 leave";

/// One line of user input.
#[derive(Debug, PartialEq)]
enum ChatInput {
    Question(String),
    Help,
    Clear,
    Memory(Option<usize>),
    ToggleSql,
    Prompts,
    Run(usize),
    Export(TranscriptFormat, PathBuf),
    Quit,
    Empty,
}

fn parse_input(line: &str) -> std::result::Result<ChatInput, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ChatInput::Empty);
    }
    let Some(command) = line.strip_prefix('/') else {
        return Ok(ChatInput::Question(line.to_string()));
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));
    let name = name.to_lowercase();
    if name == "export" {
        return parse_export(rest);
    }
    let args: Vec<&str> = rest.split_whitespace().collect();

    match (name.as_str(), args.as_slice()) {
        ("help" | "h" | "?", []) => Ok(ChatInput::Help),
        ("clear" | "reset", []) => Ok(ChatInput::Clear),
        ("memory", []) => Ok(ChatInput::Memory(None)),
        ("memory", [n]) => n
            .parse()
            .map(|n| ChatInput::Memory(Some(n)))
            .map_err(|_| format!("/memory expects a number, got '{n}'")),
        ("sql", []) => Ok(ChatInput::ToggleSql),
        ("prompts", []) => Ok(ChatInput::Prompts),
        ("run", [n]) => match n.parse::<usize>() {
            Ok(n) if (1..=SMART_PROMPTS.len()).contains(&n) => Ok(ChatInput::Run(n)),
            _ => Err(format!("/run expects 1 to {}", SMART_PROMPTS.len())),
        },
        ("quit" | "exit" | "q", []) => Ok(ChatInput::Quit),
        _ => Err(format!("unknown command '/{name}' (type /help)")),
    }
}

/// `FORMAT PATH`; the path is the rest of the line and may contain spaces.
fn parse_export(rest: &str) -> std::result::Result<ChatInput, String> {
    let usage = || "usage: /export txt|pages|json PATH".to_string();
    let (format, path) = rest.split_once(char::is_whitespace).ok_or_else(usage)?;
    let path = path.trim();
    if path.is_empty() {
        return Err(usage());
    }
    format
        .parse::<TranscriptFormat>()
        .map(|f| ChatInput::Export(f, PathBuf::from(path)))
        .map_err(|e| e.to_string())
}

pub async fn handle(mode: Option<ModelMode>, show_sql: bool, db: Option<PathBuf>) -> Result<()> {
    let config = load_config(mode, db)?;
    let mut runtime = Runtime::new(config)?;
    let mut show_sql = show_sql;

    tracing::info!(
        session_id = %runtime.session.id,
        provider = runtime.provider.provider_id(),
        model = %runtime.config.model,
        "chat session started"
    );

    output::header(&format!(
        "hrchat ({} / {})",
        runtime.config.mode, runtime.config.model
    ));
    output::dim("Ask a question about the HR dataset. Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        if !output::is_json() {
            stdout.write_all(b"\n> ").await?;
            stdout.flush().await?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(message) => {
                output::warning(&message);
                continue;
            }
        };

        let question = match input {
            ChatInput::Empty => continue,
            ChatInput::Quit => break,
            ChatInput::Help => {
                output::dim(HELP);
                continue;
            }
            ChatInput::Clear => {
                runtime.reset();
                output::success("Started a new conversation");
                continue;
            }
            ChatInput::Memory(n) => {
                let n = n.unwrap_or(runtime.config.memory_turns);
                let turns = runtime.session.last(n);
                if turns.is_empty() {
                    output::dim("No turns yet");
                } else if output::is_json() {
                    output::data("memory", &turns);
                } else {
                    output::dim(&render_memory(turns));
                }
                continue;
            }
            ChatInput::ToggleSql => {
                show_sql = !show_sql;
                output::dim(if show_sql { "SQL preview on" } else { "SQL preview off" });
                continue;
            }
            ChatInput::Prompts => {
                for (idx, prompt) in SMART_PROMPTS.iter().enumerate() {
                    output::kv(&format!("{}.", idx + 1), prompt);
                }
                continue;
            }
            ChatInput::Export(format, path) => {
                match write_transcript(&runtime.session, format, &path) {
                    Ok(()) => output::success(&format!(
                        "Wrote {} transcript to {}",
                        format.as_str(),
                        path.display()
                    )),
                    Err(e) => output::error(&e.to_string()),
                }
                continue;
            }
            ChatInput::Run(n) => {
                let prompt = SMART_PROMPTS[n - 1];
                output::dim(&format!("> {prompt}"));
                prompt.to_string()
            }
            ChatInput::Question(question) => question,
        };

        // a failed turn leaves memory untouched; the session carries on
        match ask_with_spinner(&mut runtime, &question).await {
            Ok(outcome) => print_outcome(&outcome, show_sql, runtime.config.preview_rows),
            Err(e) => output::error(&e.to_string()),
        }
    }

    tracing::info!(
        session_id = %runtime.session.id,
        turns = runtime.session.turn_count(),
        "chat session ended"
    );
    Ok(())
}
