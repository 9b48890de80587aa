#[path = "llm-arena/args.rs"]
mod args;
#[path = "llm-arena/logging.rs"]
mod logging;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use llm_arena::api::Server;
use llm_arena::backends::ollama::Ollama;
use llm_arena::config::{load_config, AppConfig};
use llm_arena::dispatch::Dispatcher;
use llm_arena::pipeline::GenerationPipeline;
use llm_arena::store::Store;

use args::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let mut config = load_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    args.apply(&mut config);
    logging::init_logging(&config.logging)?;

    let server = build_server(&config)?;
    server
        .run(&config.server.listen_addr)
        .await
        .context("HTTP server failed")
}

fn build_server(config: &AppConfig) -> anyhow::Result<Server> {
    let registry = Arc::new(config.registry()?);
    for backend in registry.iter() {
        log::info!(
            "Registered backend {} (id {}) -> {} at temperature {}",
            backend.name,
            backend.numeric_id,
            backend.endpoint_path,
            backend.temperature
        );
    }

    let ollama = Ollama::new(
        &config.ollama.base_url,
        Some(config.ollama.request_timeout_secs),
    )?;
    let dispatcher = Dispatcher::new(registry, Arc::new(ollama), &config.ollama.system_prompt)
        .invocation_timeout(config.dispatch.invocation_timeout())
        .batch_deadline(config.dispatch.batch_deadline());

    let store = Store::open(Path::new(&config.storage.database_path))
        .with_context(|| format!("opening {}", config.storage.database_path))?;
    store.init_schema()?;
    log::info!("Connected to database {}", config.storage.database_path);

    let pipeline = GenerationPipeline::new(dispatcher, store)
        .persist_failures(config.storage.persist_failures);
    Ok(Server::new(pipeline).cors_allow_any_origin(config.server.cors_allow_any_origin))
}
