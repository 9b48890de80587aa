use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::Instant;

use super::aggregate::Batch;
use super::invocation::{InvocationResult, InvocationTask};
use crate::backends::GenerationBackend;
use crate::registry::BackendRegistry;

/// Runs one invocation per registered backend concurrently and waits for all
/// of them.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<BackendRegistry>,
    backend: Arc<dyn GenerationBackend>,
    system_prompt: Arc<str>,
    invocation_timeout: Option<Duration>,
    batch_deadline: Option<Duration>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<BackendRegistry>,
        backend: Arc<dyn GenerationBackend>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            backend,
            system_prompt: Arc::from(system_prompt.into()),
            invocation_timeout: None,
            batch_deadline: None,
        }
    }

    /// Upper bound for a single backend call.
    pub fn invocation_timeout(mut self, timeout: Duration) -> Self {
        self.invocation_timeout = Some(timeout);
        self
    }

    /// Upper bound for the whole batch, measured from the start of `dispatch`.
    pub fn batch_deadline(mut self, deadline: Duration) -> Self {
        self.batch_deadline = Some(deadline);
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Dispatches `prompt` to every backend using the configured deadline.
    pub async fn dispatch(&self, prompt: &str) -> Batch {
        let deadline = self.batch_deadline.map(|d| Instant::now() + d);
        self.fan_out(prompt, deadline).await
    }

    /// Like [`Dispatcher::dispatch`] but bounded by a caller-supplied
    /// deadline. Calls still pending at `deadline` become timeout failures.
    pub async fn dispatch_until(&self, prompt: &str, deadline: Instant) -> Batch {
        let deadline = match self.batch_deadline {
            Some(d) => deadline.min(Instant::now() + d),
            None => deadline,
        };
        self.fan_out(prompt, Some(deadline)).await
    }

    /// Runs the invocation for a single backend name.
    pub async fn invoke_one(&self, name: &str, prompt: &str) -> InvocationResult {
        let until = self.invocation_timeout.map(|t| Instant::now() + t);
        self.task(name.to_string(), Arc::from(prompt)).run(until).await
    }

    async fn fan_out(&self, prompt: &str, deadline: Option<Instant>) -> Batch {
        let names = self.registry.names();
        log::info!(
            "Dispatching prompt ({} chars) to {} backends",
            prompt.chars().count(),
            names.len()
        );

        let prompt: Arc<str> = Arc::from(prompt);
        let handles = names.iter().map(|name| {
            let until = self.task_deadline(deadline);
            tokio::spawn(self.task(name.clone(), prompt.clone()).run(until))
        });
        let joined = join_all(handles).await;

        let results = names.iter().zip(joined).map(|(name, joined)| match joined {
            Ok(result) => result,
            Err(err) => {
                log::warn!("Invocation task for {name} aborted: {err}");
                let numeric_id = self
                    .registry
                    .lookup(name)
                    .map(|b| b.numeric_id)
                    .unwrap_or_default();
                InvocationResult::failure(name, numeric_id, "invocation task aborted")
            }
        });
        let batch = Batch::collect(&names, results);
        log::info!(
            "Collected {} results ({} failed)",
            batch.len(),
            batch.failures()
        );
        batch
    }

    fn task(&self, name: String, prompt: Arc<str>) -> InvocationTask {
        InvocationTask {
            registry: self.registry.clone(),
            backend: self.backend.clone(),
            system_prompt: self.system_prompt.clone(),
            name,
            prompt,
        }
    }

    fn task_deadline(&self, batch: Option<Instant>) -> Option<Instant> {
        let own = self.invocation_timeout.map(|t| Instant::now() + t);
        match (own, batch) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
