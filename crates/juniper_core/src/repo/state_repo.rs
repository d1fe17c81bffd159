//! Ledger document repositories.
//!
//! # Responsibility
//! - Load and save the serialized ledger under a single key.
//! - Provide a SQLite-backed store for real use and an in-memory one for
//!   tests.
//!
//! # Invariants
//! - `save_document` replaces the whole value atomically; there are no
//!   partial writes.
//! - A missing key loads as `None`, not as an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key under which the ledger document is stored.
pub const STATE_DOCUMENT_KEY: &str = "juniper_academy_data_v2";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document load/save.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted ledger data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Load/persist contract for the serialized ledger.
pub trait StateRepository {
    /// Returns the stored document, or `None` when nothing was saved yet.
    fn load_document(&self) -> RepoResult<Option<String>>;

    /// Replaces the stored document.
    fn save_document(&self, document: &str) -> RepoResult<()>;
}

impl<R: StateRepository + ?Sized> StateRepository for &R {
    fn load_document(&self) -> RepoResult<Option<String>> {
        (**self).load_document()
    }

    fn save_document(&self, document: &str) -> RepoResult<()> {
        (**self).save_document(document)
    }
}

/// SQLite-backed repository over the `kv_store` table.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Uses the default [`STATE_DOCUMENT_KEY`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, STATE_DOCUMENT_KEY)
    }

    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load_document(&self) -> RepoResult<Option<String>> {
        let document = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(document)
    }

    fn save_document(&self, document: &str) -> RepoResult<()> {
        if document.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "refusing to store an empty ledger document".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), document],
        )?;
        Ok(())
    }
}

/// In-memory repository used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStateRepository {
    document: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a pre-existing document, as if saved by an earlier run.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: RefCell::new(Some(document.into())),
            saves: Cell::new(0),
        }
    }

    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }

    /// Number of successful `save_document` calls.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl StateRepository for MemoryStateRepository {
    fn load_document(&self) -> RepoResult<Option<String>> {
        Ok(self.document.borrow().clone())
    }

    fn save_document(&self, document: &str) -> RepoResult<()> {
        *self.document.borrow_mut() = Some(document.to_string());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
