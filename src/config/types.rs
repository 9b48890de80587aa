use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::backends::ollama::DEFAULT_OLLAMA_URL;
use crate::chat::DEFAULT_SYSTEM_PROMPT;
use crate::registry::{BackendConfig, BackendRegistry};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_INVOCATION_TIMEOUT_SECS: u64 = 120;
const DEFAULT_BATCH_DEADLINE_SECS: u64 = 180;
const DEFAULT_DATABASE_PATH: &str = "llm-arena.db";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ollama: OllamaConfigSection,
    pub dispatch: DispatchConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub backends: Vec<BackendConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ollama: OllamaConfigSection::default(),
            dispatch: DispatchConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            backends: default_backends(),
        }
    }
}

impl AppConfig {
    /// Builds the immutable registry from `[[backends]]`.
    pub fn registry(&self) -> Result<BackendRegistry, ConfigError> {
        self.backends
            .iter()
            .cloned()
            .try_fold(BackendRegistry::builder(), |builder, backend| {
                builder.try_register(backend)
            })
            .map(|builder| builder.build())
            .map_err(|err| ConfigError::InvalidBackend(err.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub cors_allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            cors_allow_any_origin: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OllamaConfigSection {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub system_prompt: String,
}

impl Default for OllamaConfigSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub invocation_timeout_secs: u64,
    pub batch_deadline_secs: u64,
}

impl DispatchConfig {
    pub fn invocation_timeout(&self) -> Duration {
        Duration::from_secs(self.invocation_timeout_secs)
    }

    pub fn batch_deadline(&self) -> Duration {
        Duration::from_secs(self.batch_deadline_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            invocation_timeout_secs: DEFAULT_INVOCATION_TIMEOUT_SECS,
            batch_deadline_secs: DEFAULT_BATCH_DEADLINE_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: String,
    pub persist_failures: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            persist_failures: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::new("qwen2.5", "hf.co/Ainxz/qwen2.5-pucv-gguf:latest", 0.6, 1),
        BackendConfig::new("llama3.2", "hf.co/Ainxz/llama3.2-pucv-gguf:latest", 0.5, 2),
        BackendConfig::new("phi3.5", "hf.co/Ainxz/phi3.5-pucv-gguf:latest", 0.9, 3),
    ]
}
