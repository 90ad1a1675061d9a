//! Result summarization.

use hrchat_constant::defaults::ANSWER_TEMPERATURE;
use hrchat_core::{ConversationTurn, QueryResult};

use crate::context::prompt;
use crate::error::Result;

use super::Runtime;

impl Runtime {
    /// Prose answer for `result`. Empty results get the fixed message
    /// without a model call.
    pub(crate) async fn answer(
        &self,
        question: &str,
        result: &QueryResult,
        memory: &[ConversationTurn],
    ) -> Result<String> {
        if result.is_empty() {
            return Ok(prompt::EMPTY_RESULT_MESSAGE.to_string());
        }

        let messages =
            prompt::build_answer_messages(question, result, memory, self.config.preview_rows);
        let text = self.complete("answer", messages, ANSWER_TEMPERATURE).await?;
        Ok(text.trim().to_string())
    }
}
