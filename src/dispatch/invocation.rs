use std::sync::Arc;

use tokio::time::{timeout_at, Instant};

use crate::backends::{ChatAnswer, GenerationBackend, Timings};
use crate::chat::ChatMessage;
use crate::error::LLMError;
use crate::registry::{BackendConfig, BackendRegistry};

pub const INVALID_MODEL_NAME: &str = "invalid model name";

/// Uniform outcome of one invocation. `error` is `None` exactly when the
/// backend produced an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    pub backend_name: String,
    /// `numeric_id` of the backend, 0 when the name was not registered.
    pub numeric_id: i64,
    pub message: String,
    pub done: bool,
    pub timings: Timings,
    pub error: Option<String>,
}

impl InvocationResult {
    pub fn success(backend: &BackendConfig, answer: ChatAnswer) -> Self {
        Self {
            backend_name: backend.name.clone(),
            numeric_id: backend.numeric_id,
            message: answer.content,
            done: answer.done,
            timings: answer.timings,
            error: None,
        }
    }

    pub fn failure(
        backend_name: impl Into<String>,
        numeric_id: i64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            backend_name: backend_name.into(),
            numeric_id,
            message: String::new(),
            done: false,
            timings: Timings::default(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// One call to one backend, owned by its own tokio task.
pub(super) struct InvocationTask {
    pub(super) registry: Arc<BackendRegistry>,
    pub(super) backend: Arc<dyn GenerationBackend>,
    pub(super) system_prompt: Arc<str>,
    pub(super) name: String,
    pub(super) prompt: Arc<str>,
}

impl InvocationTask {
    /// Never fails: every error, including running past `until`, is folded
    /// into the returned result.
    pub(super) async fn run(self, until: Option<Instant>) -> InvocationResult {
        let Some(config) = self.registry.lookup(&self.name) else {
            log::warn!("Backend '{}' is not registered", self.name);
            return InvocationResult::failure(self.name, 0, INVALID_MODEL_NAME);
        };

        let messages = ChatMessage::single_turn(&self.system_prompt, &self.prompt);
        let start = Instant::now();
        let call = self.backend.invoke(config, &messages);
        let outcome = match until {
            Some(until) => match timeout_at(until, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(LLMError::Timeout(start.elapsed().as_millis())),
            },
            None => call.await,
        };
        let elapsed = start.elapsed().as_millis();

        match outcome {
            Ok(answer) => {
                log::info!("Backend {} answered in {elapsed} ms", config.name);
                InvocationResult::success(config, answer)
            }
            Err(err) => {
                log::warn!("Backend {} failed after {elapsed} ms: {err}", config.name);
                InvocationResult::failure(&config.name, config.numeric_id, err.to_string())
            }
        }
    }
}
