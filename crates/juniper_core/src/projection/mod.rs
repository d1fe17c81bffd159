//! Day projection over the ledger.
//!
//! # Responsibility
//! - Filter temporal collections down to what is visible on a viewed date.
//! - Assemble the per-date report consumed by front ends and the summary
//!   service.
//!
//! # Invariants
//! - Projection is read-only; it never mutates [`crate::LedgerState`].
//! - Storage order is preserved in every projected list.

pub mod day;
