//! Temporal record wrapper.
//!
//! # Responsibility
//! - Attach a creation date and an optional deletion date to a payload.
//! - Answer "is this record visible on date X".
//!
//! # Invariants
//! - Validity is the half-open interval `[created_at, deleted_at)`.
//! - `deleted_at` should not be earlier than `created_at`; this is the
//!   caller's contract and is not enforced here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque entry identifier shared by every ledger entity.
///
/// Stored as a plain string so documents written by older front ends
/// (timestamp-derived ids) keep loading.
pub type EntryId = String;

/// Generates a fresh random entry identifier.
///
/// Collisions are not detected anywhere in the ledger.
pub fn new_entry_id() -> EntryId {
    Uuid::new_v4().to_string()
}

/// Entities addressable by an [`EntryId`].
pub trait Identified {
    fn id(&self) -> &str;

    /// Overwrites the identifier. Used when an edit replaces a payload.
    fn assign_id(&mut self, id: EntryId);
}

/// Payload wrapped with its validity interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalRecord<T> {
    pub data: T,
    /// First date on which the record is visible.
    pub created_at: NaiveDate,
    /// First date on which the record is no longer visible.
    #[serde(default)]
    pub deleted_at: Option<NaiveDate>,
}

impl<T> TemporalRecord<T> {
    /// Wraps a payload created on `created_at` with no deletion stamp.
    pub fn new(data: T, created_at: NaiveDate) -> Self {
        Self {
            data,
            created_at,
            deleted_at: None,
        }
    }

    /// Returns whether the record is visible when viewing `view_date`.
    pub fn is_visible_on(&self, view_date: NaiveDate) -> bool {
        self.created_at <= view_date && self.deleted_at.map_or(true, |deleted| view_date < deleted)
    }

    /// Stamps the record as deleted from `as_of` onward.
    ///
    /// Repeating the call with the same date leaves the record unchanged.
    pub fn soft_delete(&mut self, as_of: NaiveDate) {
        self.deleted_at = Some(as_of);
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// An entry annotated with the date it was recorded on.
///
/// For temporal entries this is `created_at`; for per-day entries it is the
/// day key the entry lives under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dated<T> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub item: T,
}

impl<T: Clone> Dated<T> {
    pub(crate) fn from_record(record: &TemporalRecord<T>) -> Self {
        Self {
            date: record.created_at,
            item: record.data.clone(),
        }
    }
}
