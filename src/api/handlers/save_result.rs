use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::helpers::{status_response, StatusReply, INVALID_BODY};
use crate::api::types::SaveResultRequest;
use crate::api::ServerState;
use crate::error::{PipelineError, StoreError};

pub async fn handle_save_result(
    State(state): State<ServerState>,
    body: Result<Json<SaveResultRequest>, JsonRejection>,
) -> StatusReply {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            log::debug!("Rejected /save-result body: {rejection}");
            return status_response(StatusCode::BAD_REQUEST, INVALID_BODY);
        }
    };

    match state.pipeline.save_choice(req.into()).await {
        Ok(_) => status_response(StatusCode::OK, "result stored"),
        Err(PipelineError::Persistence(err @ StoreError::InvalidChoice { .. })) => {
            status_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => {
            log::warn!("Save result failed: {err}");
            status_response(StatusCode::CONFLICT, "could not store the result")
        }
    }
}
