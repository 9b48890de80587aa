//! Prompt in, persisted links out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::dispatch::{Batch, Dispatcher};
use crate::error::PipelineError;
use crate::store::{ChoiceRecord, ModelIdLink, Store};

/// Wires the dispatcher to the store.
#[derive(Clone)]
pub struct GenerationPipeline {
    dispatcher: Arc<Dispatcher>,
    store: Store,
    persist_failures: bool,
}

impl GenerationPipeline {
    pub fn new(dispatcher: Dispatcher, store: Store) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            store,
            persist_failures: true,
        }
    }

    /// Whether failed invocations are written as rows too.
    pub fn persist_failures(mut self, persist: bool) -> Self {
        self.persist_failures = persist;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Dispatches `prompt` to every backend and persists the whole batch.
    ///
    /// On a persistence error the in-memory results are discarded: callers
    /// only ever see ids that were committed.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<ModelIdLink>, PipelineError> {
        self.ensure_backends()?;
        let batch = self.dispatcher.dispatch(prompt).await;
        self.persist(batch).await
    }

    /// Like [`GenerationPipeline::generate`], with backends still pending at
    /// `deadline` recorded as timeouts.
    pub async fn generate_until(
        &self,
        prompt: &str,
        deadline: Instant,
    ) -> Result<Vec<ModelIdLink>, PipelineError> {
        self.ensure_backends()?;
        let batch = self.dispatcher.dispatch_until(prompt, deadline).await;
        self.persist(batch).await
    }

    fn ensure_backends(&self) -> Result<(), PipelineError> {
        if self.dispatcher.registry().is_empty() {
            return Err(PipelineError::NoBackends);
        }
        Ok(())
    }

    async fn persist(&self, batch: Batch) -> Result<Vec<ModelIdLink>, PipelineError> {
        let store = self.store.clone();
        let persist_failures = self.persist_failures;
        let links =
            tokio::task::spawn_blocking(move || store.insert_batch(&batch, persist_failures))
                .await?
                .inspect_err(|err| log::error!("Batch persistence rolled back: {err}"))?;
        Ok(links)
    }

    pub async fn save_choice(&self, record: ChoiceRecord) -> Result<i64, PipelineError> {
        let store = self.store.clone();
        let id = tokio::task::spawn_blocking(move || store.insert_choice(&record)).await??;
        Ok(id)
    }
}

/// Caller-facing entry for one backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResult {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ModelResult {
    pub fn error(model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            response: None,
            error: Some(error.into()),
            id: None,
        }
    }
}

/// Maps persisted links to caller-facing entries. Failed entries carry only
/// their error; successful ones carry the answer and its row id.
pub fn map_links(links: Vec<ModelIdLink>) -> Vec<ModelResult> {
    links
        .into_iter()
        .map(|link| match link.error {
            Some(error) => ModelResult::error(link.model, error),
            None => ModelResult {
                model: link.model,
                response: Some(link.message),
                error: None,
                id: link.id,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_hide_id_and_response() {
        let mapped = map_links(vec![
            ModelIdLink {
                model: "a".into(),
                message: "hi".into(),
                id: Some(4),
                error: None,
            },
            ModelIdLink {
                model: "b".into(),
                message: String::new(),
                id: Some(5),
                error: Some("down".into()),
            },
        ]);
        assert_eq!(mapped[0].response.as_deref(), Some("hi"));
        assert_eq!(mapped[0].id, Some(4));
        assert_eq!(mapped[1], ModelResult::error("b", "down"));
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let json = serde_json::to_value(ModelResult::error("all", "bad")).unwrap();
        assert_eq!(json, serde_json::json!({"model": "all", "error": "bad"}));
    }

    #[test]
    fn empty_input_maps_to_empty_output() {
        assert!(map_links(Vec::new()).is_empty());
    }
}
