//! Whole-ledger document.
//!
//! # Responsibility
//! - Hold every temporal collection and the per-day map in one value.
//! - Define the persisted JSON layout.
//!
//! # Invariants
//! - Missing top-level keys load as empty collections.
//! - Collections keep insertion order; nothing here re-sorts them.
//! - Per-day notices and shopping items from older documents become
//!   temporal records visible only on their own day.

use crate::model::day::DayPayload;
use crate::model::entry::{
    Consultation, EntryValidationError, FirstLesson, NoticeText, Reservation, ShoppingItem,
};
use crate::model::record::{Identified, TemporalRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete ledger state as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerState {
    /// Per-day payloads keyed by `YYYY-MM-DD`.
    pub days: BTreeMap<NaiveDate, DayPayload>,
    #[serde(rename = "masterConsultations")]
    pub consultations: Vec<TemporalRecord<Consultation>>,
    #[serde(rename = "masterReservations")]
    pub reservations: Vec<TemporalRecord<Reservation>>,
    #[serde(rename = "masterFirstLessons")]
    pub first_lessons: Vec<TemporalRecord<FirstLesson>>,
    #[serde(rename = "masterFixedNotices")]
    pub fixed_notices: Vec<TemporalRecord<NoticeText>>,
    #[serde(rename = "masterNewNotices")]
    pub new_notices: Vec<TemporalRecord<NoticeText>>,
    #[serde(rename = "masterShoppingList")]
    pub shopping_list: Vec<TemporalRecord<ShoppingItem>>,
}

impl LedgerState {
    pub fn from_json(document: &str) -> serde_json::Result<Self> {
        let mut state: Self = serde_json::from_str(document)?;
        state.migrate_legacy_day_fields();
        Ok(state)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Exact-key lookup of a day payload.
    pub fn day(&self, date: NaiveDate) -> Option<&DayPayload> {
        self.days.get(&date)
    }

    pub(crate) fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayPayload> {
        self.days.get_mut(&date)
    }

    pub(crate) fn day_entry(&mut self, date: NaiveDate) -> &mut DayPayload {
        self.days.entry(date).or_default()
    }

    /// Moves per-day notices and shopping items into the temporal collections.
    ///
    /// Each migrated record covers `[day, day + 1)`, which is exactly when the
    /// older layout showed it. Migrated records are placed ahead of existing
    /// ones so that records written under the current layout win ties. Blank
    /// notices are dropped, as are days left with nothing else in them.
    fn migrate_legacy_day_fields(&mut self) {
        let mut fixed_notices = Vec::new();
        let mut new_notices = Vec::new();
        let mut shopping_list = Vec::new();
        let mut emptied = Vec::new();

        for (&date, day) in self.days.iter_mut().filter(|(_, day)| day.has_legacy_fields()) {
            let notices = [
                (day.fixed_notice.take(), &mut fixed_notices),
                (day.new_notice.take(), &mut new_notices),
            ];
            for (text, records) in notices {
                if let Some(text) = text.filter(|text| !text.trim().is_empty()) {
                    records.push(single_day_record(text, date));
                }
            }
            shopping_list.extend(
                day.shopping_list
                    .drain(..)
                    .map(|item| single_day_record(item, date)),
            );
            if *day == DayPayload::default() {
                emptied.push(date);
            }
        }

        prepend(&mut self.fixed_notices, fixed_notices);
        prepend(&mut self.new_notices, new_notices);
        prepend(&mut self.shopping_list, shopping_list);
        for date in emptied {
            self.days.remove(&date);
        }
    }

    /// Total number of temporal records across all collections, deleted ones
    /// included.
    pub fn temporal_record_count(&self) -> usize {
        self.consultations.len()
            + self.reservations.len()
            + self.first_lessons.len()
            + self.fixed_notices.len()
            + self.new_notices.len()
            + self.shopping_list.len()
    }
}

fn single_day_record<T>(data: T, date: NaiveDate) -> TemporalRecord<T> {
    let mut record = TemporalRecord::new(data, date);
    if let Some(next) = date.succ_opt() {
        record.soft_delete(next);
    }
    record
}

fn prepend<T>(records: &mut Vec<TemporalRecord<T>>, mut earlier: Vec<TemporalRecord<T>>) {
    if earlier.is_empty() {
        return;
    }
    earlier.append(records);
    *records = earlier;
}

/// Payload types that live in a temporal collection of [`LedgerState`].
///
/// The implementing type doubles as the collection selector for store
/// operations, so `append::<Consultation>` always targets
/// [`LedgerState::consultations`].
pub trait TemporalEntry: Identified + Clone {
    /// Stable collection name used in log events.
    const COLLECTION: &'static str;

    fn records(state: &LedgerState) -> &[TemporalRecord<Self>];

    fn records_mut(state: &mut LedgerState) -> &mut Vec<TemporalRecord<Self>>;

    fn validate(&self) -> Result<(), EntryValidationError>;
}

impl TemporalEntry for Consultation {
    const COLLECTION: &'static str = "consultations";

    fn records(state: &LedgerState) -> &[TemporalRecord<Self>] {
        &state.consultations
    }

    fn records_mut(state: &mut LedgerState) -> &mut Vec<TemporalRecord<Self>> {
        &mut state.consultations
    }

    fn validate(&self) -> Result<(), EntryValidationError> {
        Consultation::validate(self)
    }
}

impl TemporalEntry for Reservation {
    const COLLECTION: &'static str = "reservations";

    fn records(state: &LedgerState) -> &[TemporalRecord<Self>] {
        &state.reservations
    }

    fn records_mut(state: &mut LedgerState) -> &mut Vec<TemporalRecord<Self>> {
        &mut state.reservations
    }

    fn validate(&self) -> Result<(), EntryValidationError> {
        Reservation::validate(self)
    }
}

impl TemporalEntry for FirstLesson {
    const COLLECTION: &'static str = "first_lessons";

    fn records(state: &LedgerState) -> &[TemporalRecord<Self>] {
        &state.first_lessons
    }

    fn records_mut(state: &mut LedgerState) -> &mut Vec<TemporalRecord<Self>> {
        &mut state.first_lessons
    }

    fn validate(&self) -> Result<(), EntryValidationError> {
        FirstLesson::validate(self)
    }
}

impl TemporalEntry for ShoppingItem {
    const COLLECTION: &'static str = "shopping_list";

    fn records(state: &LedgerState) -> &[TemporalRecord<Self>] {
        &state.shopping_list
    }

    fn records_mut(state: &mut LedgerState) -> &mut Vec<TemporalRecord<Self>> {
        &mut state.shopping_list
    }

    fn validate(&self) -> Result<(), EntryValidationError> {
        ShoppingItem::validate(self)
    }
}
