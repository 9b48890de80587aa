use axum::http::StatusCode;
use axum::Json;

use crate::api::types::{MultiResponse, StatusResponse};
use crate::pipeline::ModelResult;

/// Model name used for errors that concern the whole request.
pub const ALL_MODELS: &str = "all";
pub const INVALID_BODY: &str = "invalid request body";

pub type MultiReply = (StatusCode, Json<MultiResponse>);
pub type StatusReply = (StatusCode, Json<StatusResponse>);

pub fn multi_response(status: StatusCode, responses: Vec<ModelResult>) -> MultiReply {
    (
        status,
        Json(MultiResponse {
            status: status.as_u16(),
            responses,
        }),
    )
}

pub fn request_error(status: StatusCode, msg: impl Into<String>) -> MultiReply {
    multi_response(status, vec![ModelResult::error(ALL_MODELS, msg)])
}

pub fn status_response(status: StatusCode, content: impl Into<String>) -> StatusReply {
    (
        status,
        Json(StatusResponse {
            status: status.as_u16(),
            content: content.into(),
        }),
    )
}
