use std::borrow::Borrow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LLMError;

/// Invocation parameters for one named backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name callers see, e.g. "qwen2.5".
    pub name: String,
    /// Model identifier sent upstream.
    pub endpoint_path: String,
    pub temperature: f32,
    /// Stored as `modelo_id` alongside every response row.
    pub numeric_id: i64,
}

impl BackendConfig {
    pub fn new(
        name: impl Into<String>,
        endpoint_path: impl Into<String>,
        temperature: f32,
        numeric_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint_path: endpoint_path.into(),
            temperature,
            numeric_id,
        }
    }
}

/// Immutable map of backend name to its configuration.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// mutate it afterwards, so concurrent readers need no locking.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: HashMap<BackendName, BackendConfig>,
}

impl BackendRegistry {
    pub fn builder() -> BackendRegistryBuilder {
        BackendRegistryBuilder::default()
    }

    /// Retrieves a backend by its name.
    pub fn lookup(&self, name: &str) -> Option<&BackendConfig> {
        self.backends.get(name)
    }

    /// Registered names. Iteration order is unspecified.
    pub fn names(&self) -> Vec<String> {
        self.backends.keys().map(|k| k.0.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackendConfig> {
        self.backends.values()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// Builder pattern for BackendRegistry.
#[derive(Default)]
pub struct BackendRegistryBuilder {
    registry: BackendRegistry,
}

impl BackendRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend, logging and skipping invalid or duplicate entries.
    pub fn register(mut self, config: BackendConfig) -> Self {
        if let Err(err) = self.insert(config) {
            log::warn!("Skipping backend: {err}");
        }
        self
    }

    /// Adds a backend with validation.
    pub fn try_register(mut self, config: BackendConfig) -> Result<Self, LLMError> {
        self.insert(config)?;
        Ok(self)
    }

    /// Builds the final BackendRegistry.
    pub fn build(self) -> BackendRegistry {
        self.registry
    }

    fn insert(&mut self, config: BackendConfig) -> Result<(), LLMError> {
        let name = BackendName::new(config.name.clone())?;
        if self.registry.backends.contains_key(&name) {
            return Err(LLMError::InvalidRequest(format!(
                "Backend '{}' registered twice",
                config.name
            )));
        }
        self.registry.backends.insert(name, config);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BackendName(String);

impl BackendName {
    fn new(name: impl Into<String>) -> Result<Self, LLMError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LLMError::InvalidRequest(
                "Backend name cannot be empty".to_string(),
            ));
        }
        Ok(Self(name))
    }
}

impl Borrow<str> for BackendName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
