use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::helpers::{multi_response, request_error, MultiReply, INVALID_BODY};
use crate::api::types::GenerateRequest;
use crate::api::ServerState;
use crate::error::PipelineError;
use crate::pipeline::map_links;

pub async fn handle_generate(
    State(state): State<ServerState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> MultiReply {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            log::debug!("Rejected /generate body: {rejection}");
            return request_error(StatusCode::BAD_REQUEST, INVALID_BODY);
        }
    };

    match state.pipeline.generate(&req.prompt).await {
        Ok(links) => multi_response(StatusCode::OK, map_links(links)),
        Err(PipelineError::NoBackends) => request_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "no generation backends configured",
        ),
        Err(err) => {
            log::warn!("Generate request failed: {err}");
            multi_response(StatusCode::CONFLICT, Vec::new())
        }
    }
}
