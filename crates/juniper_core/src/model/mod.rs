//! Ledger domain model.
//!
//! # Responsibility
//! - Define the entities recorded at the front desk (consultations,
//!   reservations, payments, ...).
//! - Define the temporal wrapper that gives long-lived entries a validity
//!   interval, and the per-day payload for entries owned by one date.
//!
//! # Invariants
//! - Temporal entries are never physically removed; deletion is a
//!   `deleted_at` stamp so history stays searchable.
//! - Per-day entries (payments, expenses) belong to exactly one date key.

pub mod day;
pub mod entry;
pub mod record;
pub mod state;
