//! End-to-end pipeline tests against a real SQLite file and a scripted model.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hrchat_core::db;
use hrchat_llms::{Error as LlmError, GenerateRequest, GenerateResponse, Provider};
use hrchat_runtime::context::prompt::{ANSWER_SYSTEM, EMPTY_RESULT_MESSAGE, MEMORY_HEADER};
use hrchat_runtime::{create_provider, ModelMode, Runtime, RuntimeConfig, RuntimeError, SqlSource};

type Script = dyn Fn(&str, &GenerateRequest) -> hrchat_llms::Result<String> + Send + Sync;

/// Replays canned replies and keeps every request it receives.
struct ScriptedProvider {
    script: Box<Script>,
    calls: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    fn new(
        script: impl Fn(&str, &GenerateRequest) -> hrchat_llms::Result<String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<GenerateRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, request: GenerateRequest) -> hrchat_llms::Result<GenerateResponse> {
        self.calls.lock().unwrap().push(request.clone());
        let text = (self.script)(stage(&request), &request)?;
        Ok(GenerateResponse {
            text,
            model: request.model.clone(),
            usage: None,
        })
    }
}

fn stage(request: &GenerateRequest) -> &'static str {
    if request.messages[0].content == ANSWER_SYSTEM {
        "answer"
    } else if request
        .messages
        .iter()
        .any(|m| m.content.starts_with("The SQL you wrote failed"))
    {
        "repair"
    } else {
        "sql"
    }
}

/// Summarizer stand-in: repeats the first cell of the result preview.
fn echo_first_cell(request: &GenerateRequest) -> String {
    let preview = request
        .messages
        .iter()
        .find_map(|m| m.content.strip_prefix("Result preview:\n"))
        .expect("answer prompt carries a result preview");
    let first_row = preview.lines().nth(2).expect("preview has a data row");
    let cell = first_row.trim_matches('|').split('|').next().unwrap().trim();
    format!("{cell} employees match your question.")
}

fn fixture_db(dir: &Path) -> PathBuf {
    let csv = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/hr_sample.csv");
    let db_path = dir.join("db").join("hr.db");
    db::ingest_csv(&csv, &db_path).unwrap();
    db_path
}

fn runtime(db_path: &Path, provider: Arc<ScriptedProvider>) -> Runtime {
    runtime_with(RuntimeConfig::new(db_path.to_path_buf()), provider)
}

fn runtime_with(config: RuntimeConfig, provider: Arc<ScriptedProvider>) -> Runtime {
    Runtime::with_provider(config.with_model("scripted-model"), provider)
}

fn employee_count(db_path: &Path) -> serde_json::Value {
    db::run_query(db_path, "SELECT COUNT(*) FROM employees")
        .unwrap()
        .scalar()
        .cloned()
        .unwrap()
}

#[tokio::test]
async fn attrition_count_matches_ground_truth() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());

    let truth = db::run_query(&db_path, "SELECT COUNT(*) FROM employees WHERE Attrition = 'Yes'")
        .unwrap()
        .scalar()
        .cloned()
        .unwrap();
    assert_eq!(truth, serde_json::json!(3));

    let provider = ScriptedProvider::new(|stage, req| match stage {
        "sql" => Ok("```sql\nSELECT COUNT(*) AS leavers\nFROM employees\nWHERE Attrition = 'Yes'\n```".into()),
        _ => Ok(echo_first_cell(req)),
    });
    let mut rt = runtime(&db_path, provider.clone());

    let outcome = rt.ask("How many employees have attrition = Yes?").await.unwrap();

    assert_eq!(
        outcome.sql,
        "SELECT COUNT(*) AS leavers FROM employees WHERE Attrition = 'Yes';"
    );
    assert_eq!(outcome.sql_source, SqlSource::Model);
    assert!(outcome.answer.contains(&truth.to_string()));
    assert_eq!(rt.session.turn_count(), 1);
    assert_eq!(rt.session.turns[0].row_count, 1);

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].options.temperature, Some(0.0));
    assert_eq!(calls[1].options.temperature, Some(0.2));
}

#[tokio::test]
async fn empty_question_is_rejected_before_any_model_call() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|_, _| Ok("SELECT 1".into()));
    let mut rt = runtime(&db_path, provider.clone());

    for blank in ["", "   ", "\n\t"] {
        let err = rt.ask(blank).await.unwrap_err();
        assert!(matches!(err, RuntimeError::EmptyQuestion));
    }

    assert!(provider.calls().is_empty());
    assert!(rt.session.is_empty());
}

#[tokio::test]
async fn destructive_sql_fails_turn_and_leaves_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let before = employee_count(&db_path);

    let provider = ScriptedProvider::new(|_, _| Ok("DROP TABLE employees".into()));
    let mut rt = runtime(&db_path, provider.clone());

    let err = rt.ask("Remove everyone please").await.unwrap_err();
    assert!(matches!(err, RuntimeError::SqlFailed { .. }));

    assert!(rt.session.is_empty());
    assert_eq!(employee_count(&db_path), before);
    // no summarizer call after a failed query
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn malformed_sql_fails_turn_without_touching_session() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|stage, req| match stage {
        "sql" => Ok("SELECT FROM WHERE".into()),
        _ => Ok(echo_first_cell(req)),
    });
    let mut rt = runtime(&db_path, provider.clone());

    rt.ask("How many employees are there?").await.unwrap();
    let before = rt.session.turns.clone();
    assert_eq!(before.len(), 1);

    match rt.ask("Which roles travel most?").await {
        Err(RuntimeError::SqlFailed { sql, message }) => {
            assert_eq!(sql, "SELECT FROM WHERE LIMIT 50;");
            assert!(!message.is_empty());
        }
        other => panic!("expected SqlFailed, got {other:?}"),
    }
    assert_eq!(rt.session.turns, before);
    assert_eq!(employee_count(&db_path), serde_json::json!(12));
}

#[tokio::test]
async fn same_inputs_give_same_answer() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());

    let script = |stage: &str, req: &GenerateRequest| -> hrchat_llms::Result<String> {
        match stage {
            "sql" => Ok("SELECT Department, COUNT(*) AS n FROM employees \
                         GROUP BY Department ORDER BY n DESC, Department"
                .to_string()),
            _ => Ok(echo_first_cell(req)),
        }
    };

    let mut first = runtime(&db_path, ScriptedProvider::new(script));
    let mut second = runtime(&db_path, ScriptedProvider::new(script));

    let a = first.ask("Which department is largest?").await.unwrap();
    let b = second.ask("Which department is largest?").await.unwrap();

    assert_eq!(a.sql, b.sql);
    assert_eq!(a.result, b.result);
    assert_eq!(a.answer, b.answer);
    assert_eq!(a.answer, "Research & Development employees match your question.");
}

#[tokio::test]
async fn template_question_skips_sql_generation() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|_, req| Ok(echo_first_cell(req)));
    let mut rt = runtime(&db_path, provider.clone());

    let outcome = rt.ask("What is the attrition rate by department?").await.unwrap();

    assert_eq!(outcome.sql_source, SqlSource::Template);
    assert_eq!(outcome.result.row_count(), 3);
    assert_eq!(outcome.result.columns, vec!["Department", "AttritionRatePercent"]);
    assert_eq!(outcome.answer, "Sales employees match your question.");

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(stage(&calls[0]), "answer");
}

#[tokio::test]
async fn follow_up_prompt_carries_session_memory() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|stage, req| match stage {
        "sql" => Ok("SELECT EmployeeNumber FROM employees WHERE Department = 'Sales' ORDER BY EmployeeNumber".into()),
        _ => Ok(echo_first_cell(req)),
    });
    let mut rt = runtime(&db_path, provider.clone());

    let first = rt.ask("How many employees are there?").await.unwrap();
    assert_eq!(first.answer, "12 employees match your question.");

    let second = rt.ask("Which of them work in Sales?").await.unwrap();
    assert!(second.sql.ends_with("LIMIT 50;"));
    assert_eq!(second.result.row_count(), 5);
    assert_eq!(rt.session.turn_count(), 2);

    let calls = provider.calls();
    // answer (turn 1), sql (turn 2), answer (turn 2)
    assert_eq!(calls.len(), 3);
    let memory = &calls[1].messages[1].content;
    assert!(memory.starts_with(MEMORY_HEADER));
    assert!(memory.contains("USER: How many employees are there?"));
    assert!(memory.contains("ASSISTANT: 12 employees match your question."));
}

#[tokio::test]
async fn memory_window_limits_rendered_turns() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|stage, req| match stage {
        "sql" => Ok("SELECT MAX(Age) FROM employees".into()),
        _ => Ok(echo_first_cell(req)),
    });
    let config = RuntimeConfig::new(db_path.clone()).with_memory_turns(1);
    let mut rt = runtime_with(config, provider.clone());

    rt.ask("first question").await.unwrap();
    rt.ask("second question").await.unwrap();
    rt.ask("third question").await.unwrap();

    let calls = provider.calls();
    let last_sql_call = &calls[calls.len() - 2];
    let memory = &last_sql_call.messages[1].content;
    assert!(memory.contains("USER: second question"));
    assert!(!memory.contains("first question"));
    // memory itself is never trimmed
    assert_eq!(rt.session.turn_count(), 3);
}

#[tokio::test]
async fn empty_result_returns_fixed_message_without_model_call() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|_, _| Ok("SELECT * FROM employees WHERE Age > 100".into()));
    let mut rt = runtime(&db_path, provider.clone());

    let outcome = rt.ask("Who is older than a century?").await.unwrap();

    assert_eq!(outcome.answer, EMPTY_RESULT_MESSAGE);
    assert!(outcome.result.is_empty());
    assert_eq!(provider.calls().len(), 1);
    assert_eq!(rt.session.turns[0].row_count, 0);
}

#[tokio::test]
async fn model_failure_aborts_turn() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider =
        ScriptedProvider::new(|_, _| Err(LlmError::provider_error("Groq API error 429: rate limited")));
    let mut rt = runtime(&db_path, provider.clone());

    let err = rt.ask("Average age?").await.unwrap_err();
    assert!(matches!(&err, RuntimeError::LlmFailed(m) if m.contains("rate limited")));
    assert!(rt.session.is_empty());
    // single attempt
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn summarizer_failure_aborts_turn() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|stage, _| match stage {
        "sql" => Ok("SELECT AVG(Age) FROM employees".into()),
        _ => Err(LlmError::invalid_response("No content in Groq response")),
    });
    let mut rt = runtime(&db_path, provider);

    assert!(matches!(
        rt.ask("Average age?").await,
        Err(RuntimeError::LlmFailed(_))
    ));
    assert!(rt.session.is_empty());
}

#[tokio::test]
async fn failing_sql_is_not_repaired_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|_, _| Ok("SELECT Salary FROM employees".into()));
    let mut rt = runtime(&db_path, provider.clone());

    match rt.ask("What are the salaries?").await {
        Err(RuntimeError::SqlFailed { message, .. }) => {
            assert!(message.contains("no such column: Salary"));
        }
        other => panic!("expected SqlFailed, got {other:?}"),
    }
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn repair_pass_makes_one_corrective_call() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|stage, req| match stage {
        "sql" => Ok("SELECT Salary FROM employees".into()),
        "repair" => Ok("SELECT COUNT(*) FROM employees WHERE OverTime = 'Yes'".into()),
        _ => Ok(echo_first_cell(req)),
    });
    let config = RuntimeConfig::new(db_path.clone()).with_sql_repair(true);
    let mut rt = runtime_with(config, provider.clone());

    let outcome = rt.ask("How much overtime is worked?").await.unwrap();

    assert_eq!(outcome.sql_source, SqlSource::Repaired);
    assert_eq!(outcome.sql, "SELECT COUNT(*) FROM employees WHERE OverTime = 'Yes';");
    assert_eq!(outcome.answer, "5 employees match your question.");

    let calls = provider.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(stage(&calls[1]), "repair");
    assert!(calls[1]
        .messages
        .iter()
        .any(|m| m.content.contains("no such column: Salary")));
}

#[tokio::test]
async fn repair_pass_gives_up_after_one_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|_, _| Ok("SELECT Salary FROM employees".into()));
    let config = RuntimeConfig::new(db_path.clone()).with_sql_repair(true);
    let mut rt = runtime_with(config, provider.clone());

    assert!(matches!(
        rt.ask("What are the salaries?").await,
        Err(RuntimeError::SqlFailed { .. })
    ));
    assert_eq!(provider.calls().len(), 2);
    assert!(rt.session.is_empty());
}

#[tokio::test]
async fn missing_database_is_an_sql_failure() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(|_, req| Ok(echo_first_cell(req)));
    let mut rt = runtime(&dir.path().join("absent.db"), provider);

    match rt.ask("How many employees are there?").await {
        Err(RuntimeError::SqlFailed { message, .. }) => assert!(message.contains("hrchat ingest")),
        other => panic!("expected SqlFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn reset_starts_a_fresh_session() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = fixture_db(dir.path());
    let provider = ScriptedProvider::new(|_, req| Ok(echo_first_cell(req)));
    let mut rt = runtime(&db_path, provider);

    rt.ask("How many employees are there?").await.unwrap();
    let old_id = rt.session.id.clone();
    rt.reset();

    assert!(rt.session.is_empty());
    assert_ne!(rt.session.id, old_id);
}

#[test]
fn local_provider_is_built_from_runtime_config() {
    let config = RuntimeConfig::new(PathBuf::from("unused.db"))
        .with_mode(ModelMode::Local)
        .with_model("llama3:8b")
        .with_ollama_base_url("http://127.0.0.1:1");

    let provider = create_provider(ModelMode::Local, &config).unwrap();
    assert_eq!(provider.provider_id(), "local");
    assert_eq!(provider.default_model(), "llama3:8b");
}
