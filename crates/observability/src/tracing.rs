//! Span helpers for the question pipeline.
//!
//! Each span pre-declares `duration_ms`, `error` and `error.message` so
//! [`record_duration`] and [`record_error`] have fields to fill.

/// Span around one question, from prompt assembly to the session append.
///
/// ```rust
/// use hrchat_observability::pipeline_span;
///
/// let span = pipeline_span!("6f1c...", 42usize);
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! pipeline_span {
    ($session_id:expr, $question_len:expr) => {
        tracing::info_span!(
            "pipeline.turn",
            session.id = %$session_id,
            question.len = $question_len,
            turn.rows = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Span around one model call. `$stage` is `sql`, `repair` or `answer`.
#[macro_export]
macro_rules! llm_span {
    ($provider:expr, $model:expr, $stage:expr) => {
        tracing::info_span!(
            "llm.generate",
            llm.provider = $provider,
            llm.model = $model,
            llm.stage = $stage,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Span around one SQL execution.
#[macro_export]
macro_rules! sql_span {
    ($sql:expr) => {
        tracing::info_span!(
            "sql.execute",
            sql.statement = $sql,
            sql.rows = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record an error on the current span
///
/// ```rust
/// use hrchat_observability::record_error;
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
/// record_error(&err);
/// ```
pub fn record_error<E: std::error::Error + ?Sized>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "Operation failed");
}

/// Record elapsed milliseconds under `key` on the current span
///
/// ```rust
/// use hrchat_observability::record_duration;
/// use std::time::Instant;
///
/// let start = Instant::now();
/// record_duration("duration_ms", start.elapsed());
/// ```
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_without_subscriber() {
        let span = crate::pipeline_span!("session-1", 12usize);
        let _guard = span.enter();
        record_duration("duration_ms", std::time::Duration::from_millis(5));

        let llm = crate::llm_span!("groq", "llama-3.1-8b-instant", "sql");
        let _llm = llm.enter();

        let sql = crate::sql_span!("SELECT 1");
        sql.in_scope(|| record_error(&std::io::Error::other("boom")));
    }
}
