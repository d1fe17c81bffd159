//! Ledger store: the mutation entry point for every front end.
//!
//! # Responsibility
//! - Own the in-memory [`crate::LedgerState`] and the injected repository.
//! - Apply mutations and persist the whole document after each one.
//!
//! # Invariants
//! - Loading never fails; unreadable documents recover to an empty ledger.
//! - A mutation that matches no entry is a silent no-op and is not persisted.

use crate::model::entry::EntryValidationError;
use crate::repo::state_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod ledger_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for mutation and persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Payload rejected before it touched the ledger.
    Validation(EntryValidationError),
    /// Ledger could not be serialized.
    Serialize(serde_json::Error),
    /// Repository failed to save the document.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize ledger: {err}"),
            Self::Repo(err) => write!(f, "failed to persist ledger: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for StoreError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
