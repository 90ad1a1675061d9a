//! Prompt assembly for the two model calls of a turn.

use hrchat_core::db::{schema_hint, QueryResult};
use hrchat_core::ConversationTurn;
use hrchat_llms::Message;

use crate::error::{Result, RuntimeError};

pub const MEMORY_HEADER: &str = "Conversation context (for follow-up questions):";

pub const ANSWER_SYSTEM: &str = "You are a professional HR consultant.

Rules:
- Provide ONLY the final answer to the user.
- Do NOT explain your reasoning.
- Do NOT describe SQL execution.
- Do NOT mention tables, queries, or internal steps.
- Keep the answer concise and professional.
- Use at most 2 short bullet points or 1 short paragraph.

IMPORTANT:
- If results are present, NEVER say \"no matching records\".
- If results are empty, say no matching records were found and suggest a better filter.";

/// Reply for a query that returned no rows. Fixed so the summarizer cannot
/// invent data.
pub const EMPTY_RESULT_MESSAGE: &str = "No matching records were found. Try refining the question \
(e.g., specify a department, a range, or a specific attribute).";

/// System prompt for SQL mode: schema hint plus the dataset rules.
pub fn sql_system_prompt() -> String {
    format!(
        "You are an expert data analyst who writes SQLite SQL for the HR dataset.

{}
CRITICAL RULES:
- Table name is exactly: employees
- Attrition is TEXT with values 'Yes' or 'No' (NOT 1/0). Never use Attrition = 1 or Attrition = 0.
- Department is TEXT.
- MonthlyIncome, Age, JobSatisfaction are numeric columns.
- For rates/percentages: avoid integer division by using 1.0 * ... or 100.0 * ...
- Output ONLY ONE SQL SELECT query. No explanations. No markdown fences.",
        schema_hint()
    )
}

/// Trimmed question, or `EmptyQuestion` for blank input.
pub fn validate_question(question: &str) -> Result<&str> {
    let q = question.trim();
    if q.is_empty() {
        return Err(RuntimeError::EmptyQuestion);
    }
    Ok(q)
}

/// `USER: …` / `ASSISTANT: …` lines for `turns`, oldest first.
pub fn render_memory(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .flat_map(|turn| turn.messages())
        .map(|(role, content)| format!("{}: {}", role.label(), content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn memory_message(turns: &[ConversationTurn]) -> Option<Message> {
    (!turns.is_empty()).then(|| Message::user(format!("{MEMORY_HEADER}\n{}", render_memory(turns))))
}

/// Messages asking for SQL that answers `question`.
pub fn build_sql_messages(question: &str, memory: &[ConversationTurn]) -> Vec<Message> {
    let mut messages = vec![Message::system(sql_system_prompt())];
    messages.extend(memory_message(memory));
    messages.push(Message::user(format!("Question: {question}")));
    messages
}

/// Messages asking the model to correct SQL that was rejected.
pub fn build_repair_messages(question: &str, bad_sql: &str, error: &str) -> Vec<Message> {
    vec![
        Message::system(sql_system_prompt()),
        Message::user("The SQL you wrote failed in SQLite. Fix it."),
        Message::user(format!("Question: {question}")),
        Message::user(format!("Bad SQL:\n{bad_sql}")),
        Message::user(format!("SQLite error:\n{error}")),
        Message::user("Return ONLY ONE corrected SQL query."),
    ]
}

/// Messages asking for a prose answer from a non-empty result.
pub fn build_answer_messages(
    question: &str,
    result: &QueryResult,
    memory: &[ConversationTurn],
    preview_rows: usize,
) -> Vec<Message> {
    let mut messages = vec![Message::system(ANSWER_SYSTEM)];
    messages.extend(memory_message(memory));
    messages.push(Message::user(format!(
        "The query returned {} row(s). Do NOT say 'no matching records'.",
        result.row_count()
    )));
    messages.push(Message::user(format!("User question: {question}")));
    messages.push(Message::user(format!(
        "Result preview:\n{}",
        result.to_markdown(preview_rows)
    )));
    messages
}
