use serde::{Deserialize, Serialize};

use crate::pipeline::ModelResult;
use crate::store::ChoiceRecord;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Envelope of `/generate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MultiResponse {
    pub status: u16,
    pub responses: Vec<ModelResult>,
}

/// Envelope of `/save-result` and `/ping`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: u16,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveResultRequest {
    pub prompt: String,
    pub respuesta_id_1: i64,
    pub respuesta_id_2: i64,
    pub respuesta_id_3: i64,
    pub respuesta_elegida_id: i64,
}

impl From<SaveResultRequest> for ChoiceRecord {
    fn from(req: SaveResultRequest) -> Self {
        ChoiceRecord::new(
            req.prompt,
            [req.respuesta_id_1, req.respuesta_id_2, req.respuesta_id_3],
            req.respuesta_elegida_id,
        )
    }
}
