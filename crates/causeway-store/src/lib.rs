//! Causeway Storage Layer
//!
//! Implements the `CauseStore` trait using SQLite.
//!
//! # Architecture
//!
//! - One table for questions, one for causes
//! - Identifiers stored as 16-byte big-endian blobs
//! - `(question, row, column)` is unique, and causes are deleted with their question
//!
//! # Examples
//!
//! ```no_run
//! use causeway_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for question and cause operations
//! ```

#![warn(missing_docs)]

use causeway_domain::traits::CauseStore;
use causeway_domain::{Cause, CauseId, CauseStatus, Mode, Question, QuestionId, UserId};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A record with the same identity already exists
    #[error("Duplicate record: {0}")]
    Duplicate(String),
}

const QUESTION_COLUMNS: &str = "id, owner_id, text, mode, created_at";

const CAUSE_COLUMNS: &str =
    "id, question_id, row_index, col_index, text, mode, status, root_status, feedback";

/// SQLite-based implementation of CauseStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use causeway_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("causeway.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Questions owned by a user, newest first
    pub fn questions_owned_by(&self, owner: UserId) -> Result<Vec<Question>, StoreError> {
        let sql = format!(
            "SELECT {} FROM questions WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC",
            QUESTION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let questions = stmt
            .query_map(params![id_to_bytes(owner.value())], map_question)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    fn question_exists(&self, id: QuestionId) -> Result<bool, StoreError> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM questions WHERE id = ?1",
                params![id_to_bytes(id.value())],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn query_causes(
        &self,
        filter: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Cause>, StoreError> {
        let sql = format!(
            "SELECT {} FROM causes WHERE {} ORDER BY row_index, col_index",
            CAUSE_COLUMNS, filter
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let causes = stmt
            .query_map(params, map_cause)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(causes)
    }
}

/// Convert an identifier value to bytes for storage
fn id_to_bytes(value: u128) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Convert stored bytes back to an identifier value
fn bytes_to_id(bytes: &[u8]) -> Result<u128, StoreError> {
    if bytes.len() != 16 {
        return Err(StoreError::InvalidData(format!(
            "Expected 16 bytes for an id, got {}",
            bytes.len()
        )));
    }
    let mut arr = [0u8; 16];
    arr.copy_from_slice(bytes);
    Ok(u128::from_be_bytes(arr))
}

fn conversion_error(idx: usize, ty: Type, e: StoreError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(e))
}

fn read_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u128> {
    let bytes: Vec<u8> = row.get(idx)?;
    bytes_to_id(&bytes).map_err(|e| conversion_error(idx, Type::Blob, e))
}

fn read_mode(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Mode> {
    let value: String = row.get(idx)?;
    Mode::parse(&value).ok_or_else(|| {
        conversion_error(idx, Type::Text, StoreError::InvalidData(format!("Unknown mode: {}", value)))
    })
}

fn read_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value).map_err(|_| {
        conversion_error(
            idx,
            Type::Integer,
            StoreError::InvalidData(format!("Negative timestamp: {}", value)),
        )
    })
}

fn map_question(row: &rusqlite::Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: QuestionId::from_value(read_id(row, 0)?),
        owner: UserId::from_value(read_id(row, 1)?),
        text: row.get(2)?,
        mode: read_mode(row, 3)?,
        created_at: read_timestamp(row, 4)?,
    })
}

fn map_cause(row: &rusqlite::Row<'_>) -> rusqlite::Result<Cause> {
    let status: String = row.get(6)?;
    let status = CauseStatus::parse(&status).ok_or_else(|| {
        conversion_error(6, Type::Text, StoreError::InvalidData(format!("Unknown status: {}", status)))
    })?;

    Ok(Cause {
        id: CauseId::from_value(read_id(row, 0)?),
        question_id: QuestionId::from_value(read_id(row, 1)?),
        row: row.get(2)?,
        column: row.get(3)?,
        text: row.get(4)?,
        mode: read_mode(row, 5)?,
        status,
        root_status: row.get(7)?,
        feedback: row.get(8)?,
    })
}

impl CauseStore for SqliteStore {
    type Error = StoreError;

    fn insert_question(&mut self, question: Question) -> Result<QuestionId, Self::Error> {
        if self.question_exists(question.id)? {
            return Err(StoreError::Duplicate(format!("question {}", question.id)));
        }
        let created_at = i64::try_from(question.created_at).map_err(|_| {
            StoreError::InvalidData(format!("Timestamp out of range: {}", question.created_at))
        })?;

        self.conn.execute(
            "INSERT INTO questions (id, owner_id, text, mode, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id_to_bytes(question.id.value()),
                id_to_bytes(question.owner.value()),
                &question.text,
                question.mode.as_str(),
                created_at,
            ],
        )?;

        Ok(question.id)
    }

    fn get_question(&self, id: QuestionId) -> Result<Option<Question>, Self::Error> {
        let sql = format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS);
        let question = self
            .conn
            .query_row(&sql, params![id_to_bytes(id.value())], map_question)
            .optional()?;
        Ok(question)
    }

    fn update_question(&mut self, question: &Question) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE questions SET text = ?2, mode = ?3 WHERE id = ?1",
            params![
                id_to_bytes(question.id.value()),
                &question.text,
                question.mode.as_str(),
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("question {}", question.id)));
        }
        Ok(())
    }

    fn delete_question(&mut self, id: QuestionId) -> Result<(), Self::Error> {
        let deleted = self.conn.execute(
            "DELETE FROM questions WHERE id = ?1",
            params![id_to_bytes(id.value())],
        )?;

        if deleted == 0 {
            return Err(StoreError::NotFound(format!("question {}", id)));
        }
        Ok(())
    }

    fn insert_cause(&mut self, cause: Cause) -> Result<CauseId, Self::Error> {
        if !self.question_exists(cause.question_id)? {
            return Err(StoreError::NotFound(format!("question {}", cause.question_id)));
        }

        if self.cause_at(cause.question_id, cause.row, cause.column)?.is_some() {
            return Err(StoreError::Duplicate(format!(
                "cause at row {} column {} of question {}",
                cause.row, cause.column, cause.question_id
            )));
        }

        self.conn.execute(
            "INSERT INTO causes (id, question_id, row_index, col_index, text, mode, status, root_status, feedback)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id_to_bytes(cause.id.value()),
                id_to_bytes(cause.question_id.value()),
                cause.row,
                cause.column,
                &cause.text,
                cause.mode.as_str(),
                cause.status.as_str(),
                cause.root_status,
                &cause.feedback,
            ],
        )?;

        Ok(cause.id)
    }

    fn get_cause(&self, id: CauseId) -> Result<Option<Cause>, Self::Error> {
        let sql = format!("SELECT {} FROM causes WHERE id = ?1", CAUSE_COLUMNS);
        let cause = self
            .conn
            .query_row(&sql, params![id_to_bytes(id.value())], map_cause)
            .optional()?;
        Ok(cause)
    }

    fn update_cause(&mut self, cause: &Cause) -> Result<(), Self::Error> {
        // Position and ownership are fixed at creation
        let updated = self.conn.execute(
            "UPDATE causes SET text = ?2, mode = ?3, status = ?4, root_status = ?5, feedback = ?6
             WHERE id = ?1",
            params![
                id_to_bytes(cause.id.value()),
                &cause.text,
                cause.mode.as_str(),
                cause.status.as_str(),
                cause.root_status,
                &cause.feedback,
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("cause {}", cause.id)));
        }
        Ok(())
    }

    fn causes_for_question(&self, question_id: QuestionId) -> Result<Vec<Cause>, Self::Error> {
        let id = id_to_bytes(question_id.value());
        self.query_causes("question_id = ?1", &[&id])
    }

    fn causes_at_row(&self, question_id: QuestionId, row: u32) -> Result<Vec<Cause>, Self::Error> {
        let id = id_to_bytes(question_id.value());
        self.query_causes("question_id = ?1 AND row_index = ?2", &[&id, &row])
    }

    fn cause_at(
        &self,
        question_id: QuestionId,
        row: u32,
        column: u32,
    ) -> Result<Option<Cause>, Self::Error> {
        let id = id_to_bytes(question_id.value());
        let mut causes = self.query_causes(
            "question_id = ?1 AND row_index = ?2 AND col_index = ?3",
            &[&id, &row, &column],
        )?;
        Ok(causes.pop())
    }
}
