//! HTTP surface: `POST /generate`, `POST /save-result`, `GET /ping`.

mod handlers;
mod types;

use std::future::Future;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::pipeline::GenerationPipeline;

pub use types::{GenerateRequest, MultiResponse, SaveResultRequest, StatusResponse};

/// State shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    pub pipeline: GenerationPipeline,
}

/// REST server wrapping a [`GenerationPipeline`].
pub struct Server {
    state: ServerState,
    cors_allow_any_origin: bool,
}

impl Server {
    pub fn new(pipeline: GenerationPipeline) -> Self {
        Self {
            state: ServerState { pipeline },
            cors_allow_any_origin: true,
        }
    }

    pub fn cors_allow_any_origin(mut self, allow: bool) -> Self {
        self.cors_allow_any_origin = allow;
        self
    }

    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/generate", post(handlers::handle_generate))
            .route("/save-result", post(handlers::handle_save_result))
            .route("/ping", get(handlers::handle_ping))
            .with_state(self.state.clone());

        if self.cors_allow_any_origin {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers(Any),
            )
        } else {
            router
        }
    }

    /// Serves until the process receives Ctrl-C.
    pub async fn run(self, addr: &str) -> std::io::Result<()> {
        self.run_until(addr, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {err}");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    pub async fn run_until<F>(self, addr: &str, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        log::info!("Server stopped");
        Ok(())
    }
}
