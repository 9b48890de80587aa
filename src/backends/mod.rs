//! Generation backends reachable from the dispatcher.

pub mod ollama;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::error::LLMError;
use crate::registry::BackendConfig;

/// Counters the backend reports for one answer. Durations are nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    pub total_duration: i64,
    pub load_duration: i64,
    pub prompt_eval_count: i64,
    pub prompt_eval_duration: i64,
    pub eval_count: i64,
    pub eval_duration: i64,
}

/// A completed, non-streamed answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnswer {
    /// Model identifier echoed by the backend.
    pub model: String,
    pub content: String,
    pub done: bool,
    pub timings: Timings,
}

/// Remote capability that turns a conversation into one answer.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn invoke(
        &self,
        backend: &BackendConfig,
        messages: &[ChatMessage],
    ) -> Result<ChatAnswer, LLMError>;
}
