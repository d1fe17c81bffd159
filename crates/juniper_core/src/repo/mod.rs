//! Persistence boundary for the ledger document.
//!
//! # Responsibility
//! - Define the load/persist contract injected into the store.
//! - Keep SQLite details out of store and projection code.
//!
//! # Invariants
//! - Repositories store the document verbatim; they never parse it.

pub mod state_repo;
