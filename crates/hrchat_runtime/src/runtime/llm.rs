//! Model calls.

use std::time::Instant;

use hrchat_llms::{GenerateRequest, Message};
use hrchat_observability::{llm_span, record_duration, record_error};
use tracing::Instrument;

use crate::error::{Result, RuntimeError};

use super::Runtime;

impl Runtime {
    /// One request to the configured provider. `stage` names the call in
    /// traces (`sql`, `repair`, `answer`).
    pub(crate) async fn complete(
        &self,
        stage: &'static str,
        messages: Vec<Message>,
        temperature: f32,
    ) -> Result<String> {
        let request = GenerateRequest::new(self.config.model.clone(), messages)
            .with_temperature(temperature)
            .with_max_tokens(self.config.max_tokens);

        let span = llm_span!(self.provider.provider_id(), self.config.model.as_str(), stage);

        async {
            let start = Instant::now();
            let response = self.provider.generate(request).await;
            record_duration("duration_ms", start.elapsed());

            match response {
                Ok(resp) => {
                    tracing::debug!(chars = resp.text.len(), usage = ?resp.usage, "model replied");
                    Ok(resp.text)
                }
                Err(e) => {
                    let err = RuntimeError::LlmFailed(e.to_string());
                    record_error(&err);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
