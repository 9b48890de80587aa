mod error;
mod load;
mod types;

pub use error::ConfigError;
pub use load::{load_config, parse_config};
pub use types::{
    AppConfig, DispatchConfig, LoggingConfig, OllamaConfigSection, ServerConfig, StorageConfig,
};
