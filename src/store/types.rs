use serde::{Deserialize, Serialize};

use crate::backends::Timings;
use crate::dispatch::InvocationResult;
use crate::error::StoreError;

/// A committed row of the `respuesta` table. Rows are append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedResponseRow {
    pub id: i64,
    pub numeric_id: i64,
    pub model: String,
    pub message: String,
    pub done: bool,
    pub timings: Timings,
}

/// Join between an in-memory result and the id of the row it was stored as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelIdLink {
    pub model: String,
    pub message: String,
    /// `None` only when the result was a failure and failures are not persisted.
    pub id: Option<i64>,
    pub error: Option<String>,
}

impl ModelIdLink {
    pub(crate) fn new(result: &InvocationResult, id: Option<i64>) -> Self {
        Self {
            model: result.backend_name.clone(),
            message: result.message.clone(),
            id,
            error: result.error.clone(),
        }
    }
}

/// A person's pick among three generated answers for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChoiceRecord {
    pub prompt: String,
    pub candidate_ids: [i64; 3],
    pub chosen_id: i64,
}

impl ChoiceRecord {
    pub fn new(prompt: impl Into<String>, candidate_ids: [i64; 3], chosen_id: i64) -> Self {
        Self {
            prompt: prompt.into(),
            candidate_ids,
            chosen_id,
        }
    }

    /// The chosen id must be one of the candidates.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.candidate_ids.contains(&self.chosen_id) {
            Ok(())
        } else {
            Err(StoreError::InvalidChoice {
                chosen: self.chosen_id,
                candidates: self.candidate_ids,
            })
        }
    }
}

/// A committed row of the `resultado` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredChoice {
    pub id: i64,
    pub record: ChoiceRecord,
}
