/// Idempotent schema for the response and choice tables.
pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS respuesta (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    modelo_id            INTEGER NOT NULL,
    model                TEXT    NOT NULL,
    message              TEXT    NOT NULL,
    done                 INTEGER NOT NULL,
    total_duration       INTEGER NOT NULL DEFAULT 0,
    load_duration        INTEGER NOT NULL DEFAULT 0,
    prompt_eval_count    INTEGER NOT NULL DEFAULT 0,
    prompt_eval_duration INTEGER NOT NULL DEFAULT 0,
    eval_count           INTEGER NOT NULL DEFAULT 0,
    eval_duration        INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS resultado (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    prompt               TEXT    NOT NULL,
    respuesta_id_1       INTEGER NOT NULL REFERENCES respuesta(id),
    respuesta_id_2       INTEGER NOT NULL REFERENCES respuesta(id),
    respuesta_id_3       INTEGER NOT NULL REFERENCES respuesta(id),
    respuesta_elegida_id INTEGER NOT NULL REFERENCES respuesta(id)
);
"#;

pub(super) const INSERT_RESPONSE: &str = "INSERT INTO respuesta (
        modelo_id, model, message, done,
        total_duration, load_duration, prompt_eval_count,
        prompt_eval_duration, eval_count, eval_duration
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

pub(super) const INSERT_CHOICE: &str = "INSERT INTO resultado (
        prompt, respuesta_id_1, respuesta_id_2,
        respuesta_id_3, respuesta_elegida_id
    ) VALUES (?1, ?2, ?3, ?4, ?5)";

pub(super) const SELECT_RESPONSE: &str = "SELECT
        id, modelo_id, model, message, done,
        total_duration, load_duration, prompt_eval_count,
        prompt_eval_duration, eval_count, eval_duration
    FROM respuesta WHERE id = ?1";

pub(super) const SELECT_CHOICE: &str = "SELECT
        id, prompt, respuesta_id_1, respuesta_id_2,
        respuesta_id_3, respuesta_elegida_id
    FROM resultado WHERE id = ?1";
