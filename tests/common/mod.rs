#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use llm_arena::chat::ChatMessage;
use llm_arena::dispatch::Dispatcher;
use llm_arena::pipeline::GenerationPipeline;
use llm_arena::store::Store;
use llm_arena::{BackendConfig, BackendRegistry, ChatAnswer, GenerationBackend, LLMError, Timings};

/// Answers "<name>: <prompt>" except for the backends listed as failing.
pub struct ScriptedBackend {
    failing: HashSet<String>,
}

impl ScriptedBackend {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn invoke(
        &self,
        backend: &BackendConfig,
        messages: &[ChatMessage],
    ) -> Result<ChatAnswer, LLMError> {
        if self.failing.contains(&backend.name) {
            return Err(LLMError::HttpError("connection refused".to_string()));
        }
        Ok(ChatAnswer {
            model: backend.endpoint_path.clone(),
            content: format!("{}: {}", backend.name, messages[1].content),
            done: true,
            timings: Timings {
                total_duration: 1_000,
                load_duration: 10,
                prompt_eval_count: 5,
                prompt_eval_duration: 20,
                eval_count: 3,
                eval_duration: 30,
            },
        })
    }
}

pub fn registry(names: &[&str]) -> Arc<BackendRegistry> {
    let registry = names
        .iter()
        .enumerate()
        .fold(BackendRegistry::builder(), |builder, (i, name)| {
            builder.register(BackendConfig::new(
                *name,
                format!("models/{name}"),
                0.5,
                i as i64 + 1,
            ))
        })
        .build();
    Arc::new(registry)
}

pub fn memory_store() -> Store {
    let store = Store::memory().expect("in-memory sqlite");
    store.init_schema().expect("schema");
    store
}

pub fn pipeline(names: &[&str], failing: &[&str]) -> GenerationPipeline {
    let dispatcher = Dispatcher::new(
        registry(names),
        Arc::new(ScriptedBackend::new(failing)),
        "system",
    );
    GenerationPipeline::new(dispatcher, memory_store())
}

/// Makes every insert of a response for `model` abort.
pub fn reject_model(store: &Store, model: &str) {
    store
        .conn
        .lock()
        .unwrap()
        .execute_batch(&format!(
            "CREATE TRIGGER reject_{model} BEFORE INSERT ON respuesta
             WHEN NEW.model = '{model}'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;"
        ))
        .unwrap();
}
