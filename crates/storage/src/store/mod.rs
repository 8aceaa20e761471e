#![forbid(unsafe_code)]

mod error;
mod records;
mod schema;
mod users;

pub use error::StoreError;
pub use records::StoredRecord;

use de_core::RecordId;
use rusqlite::{Connection, ErrorCode};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Durable storage for modes, steps and users.
///
/// The store keeps only the database path. Every call opens its own connection
/// and every mutation commits its own transaction, so no transaction ever spans
/// more than one record.
pub trait RecordStore {
    fn load_all<R: StoredRecord>(&self) -> Result<Vec<R>, StoreError>;
    fn max_identifier<R: StoredRecord>(&self) -> Result<Option<RecordId>, StoreError>;
    fn insert<R: StoredRecord>(&self, record: &R) -> Result<(), StoreError>;
    fn update<R: StoredRecord>(&self, record: &R) -> Result<(), StoreError>;
    fn delete<R: StoredRecord>(&self, id: RecordId) -> Result<(), StoreError>;
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { db_path };
        store.create_schema_if_absent()?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Creates the Modes, Steps and Users tables on first run. Returns `true`
    /// when the schema was created by this call.
    pub fn create_schema_if_absent(&self) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let created = schema::create_if_absent(&conn)?;
        if created {
            tracing::info!(path = %self.db_path.display(), "created database schema");
        }
        Ok(created)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}

fn map_write_error(err: rusqlite::Error) -> StoreError {
    if is_constraint_violation(&err) {
        return StoreError::Constraint(err.to_string());
    }
    StoreError::Sql(err)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("FOREIGN KEY constraint failed")
                })
        }
        _ => false,
    }
}
