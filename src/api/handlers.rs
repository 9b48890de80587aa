#[path = "handlers/generate.rs"]
mod generate;

#[path = "handlers/save_result.rs"]
mod save_result;

#[path = "handlers/helpers.rs"]
mod helpers;

pub use generate::handle_generate;
pub use save_result::handle_save_result;

use axum::http::StatusCode;
use axum::Json;

use super::types::StatusResponse;

pub async fn handle_ping() -> (StatusCode, Json<StatusResponse>) {
    helpers::status_response(StatusCode::OK, "pong")
}
