//! Sends one prompt to every configured generation backend at once, collects
//! every outcome (failures included) into a batch, and stores that batch in a
//! single SQLite transaction.
//!
//! ```no_run
//! use std::sync::Arc;
//! use llm_arena::{
//!     backends::ollama::Ollama, config::AppConfig, dispatch::Dispatcher,
//!     pipeline::GenerationPipeline, store::Store,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let dispatcher = Dispatcher::new(
//!     Arc::new(config.registry()?),
//!     Arc::new(Ollama::new(&config.ollama.base_url, None)?),
//!     config.ollama.system_prompt.clone(),
//! );
//! let store = Store::memory()?;
//! store.init_schema()?;
//! let links = GenerationPipeline::new(dispatcher, store).generate("hola").await?;
//! println!("{links:?}");
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod store;

#[cfg(feature = "api")]
pub mod api;

pub use backends::{ChatAnswer, GenerationBackend, Timings};
pub use dispatch::{Batch, Dispatcher, InvocationResult};
pub use error::{LLMError, PipelineError, StoreError};
pub use pipeline::{map_links, GenerationPipeline, ModelResult};
pub use registry::{BackendConfig, BackendRegistry};
