use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::schema::{DDL, INSERT_CHOICE, INSERT_RESPONSE, SELECT_CHOICE, SELECT_RESPONSE};
use super::types::{ChoiceRecord, ModelIdLink, PersistedResponseRow, StoredChoice};
use crate::backends::Timings;
use crate::dispatch::Batch;
use crate::error::StoreError;

/// SQLite-backed store. Cloning shares the same connection.
///
/// All methods block; call them from `spawn_blocking` in async code.
#[derive(Clone)]
pub struct Store {
    pub conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.lock()?.execute_batch(DDL)?;
        Ok(())
    }

    /// Inserts every result of `batch` inside one transaction.
    ///
    /// Either every row is committed and one link per result is returned, or
    /// nothing is written. With `persist_failures` off, failed results are
    /// returned with `id: None` and never touch the database.
    pub fn insert_batch(
        &self,
        batch: &Batch,
        persist_failures: bool,
    ) -> Result<Vec<ModelIdLink>, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut links = Vec::with_capacity(batch.len());
        {
            let mut stmt = tx.prepare(INSERT_RESPONSE)?;
            for result in batch.iter() {
                if !result.is_success() && !persist_failures {
                    links.push(ModelIdLink::new(result, None));
                    continue;
                }
                let t = &result.timings;
                let id = stmt.insert(params![
                    result.numeric_id,
                    result.backend_name,
                    result.message,
                    result.done,
                    t.total_duration,
                    t.load_duration,
                    t.prompt_eval_count,
                    t.prompt_eval_duration,
                    t.eval_count,
                    t.eval_duration,
                ])?;
                links.push(ModelIdLink::new(result, Some(id)));
            }
        }
        tx.commit()?;
        log::info!(
            "Persisted {} response rows",
            links.iter().filter(|l| l.id.is_some()).count()
        );
        Ok(links)
    }

    /// Validates and inserts one choice row, returning its id.
    pub fn insert_choice(&self, record: &ChoiceRecord) -> Result<i64, StoreError> {
        record.validate()?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let id = {
            let mut stmt = tx.prepare(INSERT_CHOICE)?;
            let [first, second, third] = record.candidate_ids;
            stmt.insert(params![
                record.prompt,
                first,
                second,
                third,
                record.chosen_id
            ])?
        };
        tx.commit()?;
        log::info!("Stored choice {id} (chosen response {})", record.chosen_id);
        Ok(id)
    }

    pub fn response(&self, id: i64) -> Result<Option<PersistedResponseRow>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(SELECT_RESPONSE, params![id], response_from_row)
            .optional()?;
        Ok(row)
    }

    pub fn count_responses(&self) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM respuesta", [], |row| row.get(0))?)
    }

    pub fn choice(&self, id: i64) -> Result<Option<StoredChoice>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(SELECT_CHOICE, params![id], |row| {
                Ok(StoredChoice {
                    id: row.get(0)?,
                    record: ChoiceRecord {
                        prompt: row.get(1)?,
                        candidate_ids: [row.get(2)?, row.get(3)?, row.get(4)?],
                        chosen_id: row.get(5)?,
                    },
                })
            })
            .optional()?;
        Ok(row)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn response_from_row(row: &Row<'_>) -> rusqlite::Result<PersistedResponseRow> {
    Ok(PersistedResponseRow {
        id: row.get(0)?,
        numeric_id: row.get(1)?,
        model: row.get(2)?,
        message: row.get(3)?,
        done: row.get(4)?,
        timings: Timings {
            total_duration: row.get(5)?,
            load_duration: row.get(6)?,
            prompt_eval_count: row.get(7)?,
            prompt_eval_duration: row.get(8)?,
            eval_count: row.get(9)?,
            eval_duration: row.get(10)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::InvocationResult;

    fn store() -> Store {
        let store = Store::memory().unwrap();
        store.init_schema().unwrap();
        store
    }

    fn ok(name: &str, numeric_id: i64) -> InvocationResult {
        InvocationResult {
            backend_name: name.to_string(),
            numeric_id,
            message: format!("answer from {name}"),
            done: true,
            timings: Timings {
                total_duration: 100,
                eval_count: 7,
                ..Timings::default()
            },
            error: None,
        }
    }

    fn batch(results: Vec<InvocationResult>) -> Batch {
        let names: Vec<String> = results.iter().map(|r| r.backend_name.clone()).collect();
        Batch::collect(&names, results)
    }

    #[test]
    fn batch_round_trips_field_for_field() {
        let store = store();
        let links = store
            .insert_batch(&batch(vec![ok("a", 1), ok("b", 2)]), true)
            .unwrap();
        assert_eq!(links.len(), 2);
        for link in &links {
            let row = store.response(link.id.unwrap()).unwrap().unwrap();
            assert_eq!(row.model, link.model);
            assert_eq!(row.message, link.message);
            assert!(row.done);
            assert_eq!(row.timings.eval_count, 7);
        }
    }

    #[test]
    fn rollback_leaves_no_rows() {
        let store = store();
        store
            .conn
            .lock()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_c BEFORE INSERT ON respuesta
                 WHEN NEW.model = 'c'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let result = store.insert_batch(&batch(vec![ok("a", 1), ok("b", 2), ok("c", 3)]), true);
        assert!(matches!(result, Err(StoreError::Sqlite(_))));
        assert_eq!(store.count_responses().unwrap(), 0);
    }

    #[test]
    fn failures_persisted_as_zeroed_rows() {
        let store = store();
        let links = store
            .insert_batch(
                &batch(vec![ok("a", 1), InvocationResult::failure("b", 2, "down")]),
                true,
            )
            .unwrap();
        let failed = links.iter().find(|l| l.model == "b").unwrap();
        let row = store.response(failed.id.unwrap()).unwrap().unwrap();
        assert_eq!(row.message, "");
        assert!(!row.done);
        assert_eq!(row.timings, Timings::default());
        assert_eq!(failed.error.as_deref(), Some("down"));
    }

    #[test]
    fn failures_skipped_when_disabled() {
        let store = store();
        let links = store
            .insert_batch(
                &batch(vec![ok("a", 1), InvocationResult::failure("b", 2, "down")]),
                false,
            )
            .unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().find(|l| l.model == "b").unwrap().id.is_none());
        assert_eq!(store.count_responses().unwrap(), 1);
    }

    #[test]
    fn on_disk_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.db");

        let store = Store::open(&path).unwrap();
        store.init_schema().unwrap();
        store.init_schema().unwrap();
        let links = store
            .insert_batch(&batch(vec![ok("a", 1), ok("b", 2)]), true)
            .unwrap();
        drop(store);

        let reopened = Store::open(&path).unwrap();
        reopened.init_schema().unwrap();
        assert_eq!(reopened.count_responses().unwrap(), 2);
        let row = reopened.response(links[1].id.unwrap()).unwrap().unwrap();
        assert_eq!(row.model, "b");
        assert_eq!(row.numeric_id, 2);
        assert_eq!(row.message, "answer from b");
    }

    #[test]
    fn choice_requires_existing_responses() {
        let store = store();
        let err = store
            .insert_choice(&ChoiceRecord::new("p", [1, 2, 3], 1))
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn choice_round_trips() {
        let store = store();
        let links = store
            .insert_batch(&batch(vec![ok("a", 1), ok("b", 2), ok("c", 3)]), true)
            .unwrap();
        let ids: Vec<i64> = links.iter().map(|l| l.id.unwrap()).collect();
        let record = ChoiceRecord::new("hello", [ids[0], ids[1], ids[2]], ids[1]);
        let id = store.insert_choice(&record).unwrap();
        let stored = store.choice(id).unwrap().unwrap();
        assert_eq!(stored.record, record);
    }

    #[test]
    fn choice_outside_candidates_is_not_inserted() {
        let store = store();
        let err = store
            .insert_choice(&ChoiceRecord::new("p", [1, 2, 3], 9))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidChoice { .. }));
        assert!(store.choice(1).unwrap().is_none());
    }
}
