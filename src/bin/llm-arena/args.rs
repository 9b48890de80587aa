use clap::Parser;
use std::path::PathBuf;

use llm_arena::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "llm-arena",
    about = "Serve one prompt to every configured model and record the answers"
)]
pub struct CliArgs {
    #[arg(long, short = 'c', env = "LLM_ARENA_CONFIG", default_value = "llm-arena.toml")]
    pub config: PathBuf,
    #[arg(long, env = "LLM_ARENA_LISTEN")]
    pub listen: Option<String>,
    #[arg(long, env = "LLM_ARENA_DATABASE")]
    pub database: Option<String>,
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,
}

impl CliArgs {
    /// Flags win over file values.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(listen) = &self.listen {
            config.server.listen_addr = listen.clone();
        }
        if let Some(database) = &self.database {
            config.storage.database_path = database.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.ollama.base_url = url.clone();
        }
    }
}
