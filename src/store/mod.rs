//! Durable storage for generated responses and human choices.

mod schema;
mod sqlite;
mod types;

pub use schema::DDL;
pub use sqlite::Store;
pub use types::{ChoiceRecord, ModelIdLink, PersistedResponseRow, StoredChoice};
