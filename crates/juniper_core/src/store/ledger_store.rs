//! Ledger store implementation.
//!
//! # Responsibility
//! - Provide append / soft-delete / replace operations over temporal
//!   collections, plus the named checkbox setters.
//! - Provide the per-day operations for manager, payments and expenses.
//! - Serialize and save the full document after every effective mutation.
//!
//! # Invariants
//! - Temporal records are never removed; deletion stamps `deleted_at`.
//! - Replacing a payload keeps the stored id and validity dates.
//! - Entries sharing a colliding id are all affected by id-addressed
//!   operations.
//! - A mutation whose save fails leaves the in-memory ledger unchanged.

use crate::model::day::DayPayload;
use crate::model::entry::{
    Expense, FirstLesson, FirstLessonFlag, NoticeText, Payment, PaymentFlag, Reservation,
    ShoppingItem,
};
use crate::model::record::{EntryId, Identified, TemporalRecord};
use crate::model::state::{LedgerState, TemporalEntry};
use crate::projection::day::{build_day_report, DayReport};
use crate::repo::state_repo::StateRepository;
use crate::store::StoreResult;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Which notice board a text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSlot {
    /// Standing instructions carried from day to day.
    Fixed,
    /// Today's hand-over notes.
    New,
}

impl NoticeSlot {
    fn collection(self) -> &'static str {
        match self {
            Self::Fixed => "fixed_notices",
            Self::New => "new_notices",
        }
    }
}

/// In-memory ledger bound to a persistence repository.
pub struct LedgerStore<R: StateRepository> {
    state: LedgerState,
    repo: R,
}

impl<R: StateRepository> LedgerStore<R> {
    /// Loads the ledger from `repo`.
    ///
    /// Repository failures and malformed documents are logged and replaced by
    /// an empty ledger; no partial recovery is attempted.
    pub fn open(repo: R) -> Self {
        let state = load_state(&repo);
        Self { state, repo }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Projected view for `date`.
    pub fn day_report(&self, date: NaiveDate) -> DayReport {
        build_day_report(&self.state, date)
    }

    /// Looks up a temporal record by id, deleted ones included.
    pub fn find<T: TemporalEntry>(&self, id: &str) -> Option<&TemporalRecord<T>> {
        T::records(&self.state)
            .iter()
            .find(|record| record.data.id() == id)
    }

    pub fn find_payment(&self, date: NaiveDate, id: &str) -> Option<&Payment> {
        self.state
            .day(date)
            .and_then(|day| day.payments.iter().find(|payment| payment.id == id))
    }

    pub fn find_expense(&self, date: NaiveDate, id: &str) -> Option<&Expense> {
        self.state
            .day(date)
            .and_then(|day| day.expenses.iter().find(|expense| expense.id == id))
    }

    /// Appends `payload` as a record created on `as_of`.
    ///
    /// Returns the payload id. Id collisions are not checked.
    pub fn append<T: TemporalEntry>(
        &mut self,
        payload: T,
        as_of: NaiveDate,
    ) -> StoreResult<EntryId> {
        payload.validate()?;
        let id = payload.id().to_string();
        self.transact("append", T::COLLECTION, |state| {
            T::records_mut(state).push(TemporalRecord::new(payload, as_of));
            true
        })?;
        Ok(id)
    }

    /// Stamps the matching record as deleted from `as_of`.
    ///
    /// Returns `Ok(false)` when no record matches.
    pub fn soft_delete<T: TemporalEntry>(
        &mut self,
        id: &str,
        as_of: NaiveDate,
    ) -> StoreResult<bool> {
        self.transact("soft_delete", T::COLLECTION, |state| {
            update_records::<T, _>(state, id, |record| record.soft_delete(as_of))
        })
    }

    /// Replaces the payload of the matching record, keeping its id and dates.
    pub fn replace_payload<T: TemporalEntry>(
        &mut self,
        id: &str,
        payload: T,
    ) -> StoreResult<bool> {
        payload.validate()?;
        self.transact("replace", T::COLLECTION, |state| {
            update_records::<T, _>(state, id, |record| {
                let mut replacement = payload.clone();
                replacement.assign_id(id.to_string());
                record.data = replacement;
            })
        })
    }

    /// Books a first lesson with both checkboxes cleared.
    pub fn add_first_lesson(
        &mut self,
        booking: Reservation,
        as_of: NaiveDate,
    ) -> StoreResult<EntryId> {
        self.append(FirstLesson::from_booking(booking), as_of)
    }

    pub fn set_first_lesson_flag(
        &mut self,
        id: &str,
        flag: FirstLessonFlag,
        value: bool,
    ) -> StoreResult<bool> {
        self.transact("set_flag", FirstLesson::COLLECTION, |state| {
            update_records::<FirstLesson, _>(state, id, |record| record.data.set_flag(flag, value))
        })
    }

    pub fn toggle_first_lesson_flag(
        &mut self,
        id: &str,
        flag: FirstLessonFlag,
    ) -> StoreResult<bool> {
        self.transact("toggle_flag", FirstLesson::COLLECTION, |state| {
            update_records::<FirstLesson, _>(state, id, |record| {
                let current = record.data.flag(flag);
                record.data.set_flag(flag, !current);
            })
        })
    }

    pub fn set_shopping_completed(&mut self, id: &str, completed: bool) -> StoreResult<bool> {
        self.transact("set_flag", ShoppingItem::COLLECTION, |state| {
            update_records::<ShoppingItem, _>(state, id, |record| record.data.completed = completed)
        })
    }

    pub fn toggle_shopping_completed(&mut self, id: &str) -> StoreResult<bool> {
        self.transact("toggle_flag", ShoppingItem::COLLECTION, |state| {
            update_records::<ShoppingItem, _>(state, id, |record| {
                record.data.completed = !record.data.completed;
            })
        })
    }

    /// Writes the notice for `slot` as of `date`.
    ///
    /// A live record created on exactly `date` is rewritten in place; otherwise
    /// a new record is appended so earlier dates keep their own text.
    pub fn set_notice(
        &mut self,
        slot: NoticeSlot,
        date: NaiveDate,
        text: impl Into<NoticeText>,
    ) -> StoreResult<()> {
        let text = text.into();
        self.transact("set_notice", slot.collection(), |state| {
            let records = match slot {
                NoticeSlot::Fixed => &mut state.fixed_notices,
                NoticeSlot::New => &mut state.new_notices,
            };
            match records
                .iter_mut()
                .rev()
                .find(|record| record.created_at == date && record.is_visible_on(date))
            {
                Some(record) => record.data = text,
                None => records.push(TemporalRecord::new(text, date)),
            }
            true
        })?;
        Ok(())
    }

    pub fn set_fixed_notice(
        &mut self,
        date: NaiveDate,
        text: impl Into<NoticeText>,
    ) -> StoreResult<()> {
        self.set_notice(NoticeSlot::Fixed, date, text)
    }

    pub fn set_new_notice(
        &mut self,
        date: NaiveDate,
        text: impl Into<NoticeText>,
    ) -> StoreResult<()> {
        self.set_notice(NoticeSlot::New, date, text)
    }

    /// Overrides the rota manager for `date`.
    pub fn set_manager(&mut self, date: NaiveDate, manager: impl Into<String>) -> StoreResult<()> {
        let manager = manager.into();
        self.transact("set_manager", "days", |state| {
            state.day_entry(date).manager = Some(manager);
            true
        })?;
        Ok(())
    }

    pub fn add_payment(&mut self, date: NaiveDate, payment: Payment) -> StoreResult<EntryId> {
        payment.validate()?;
        let id = payment.id.clone();
        self.transact("append", "payments", |state| {
            state.day_entry(date).payments.push(payment);
            true
        })?;
        Ok(id)
    }

    pub fn edit_payment(
        &mut self,
        date: NaiveDate,
        id: &str,
        payment: Payment,
    ) -> StoreResult<bool> {
        payment.validate()?;
        self.transact("replace", "payments", |state| {
            with_day(state, date, |day| replace_matching(&mut day.payments, id, &payment))
        })
    }

    /// Removes a payment outright; day lists keep no history.
    pub fn remove_payment(&mut self, date: NaiveDate, id: &str) -> StoreResult<bool> {
        self.transact("remove", "payments", |state| {
            with_day(state, date, |day| remove_matching(&mut day.payments, id))
        })
    }

    pub fn set_payment_flag(
        &mut self,
        date: NaiveDate,
        id: &str,
        flag: PaymentFlag,
        value: bool,
    ) -> StoreResult<bool> {
        self.transact("set_flag", "payments", |state| {
            with_day(state, date, |day| {
                update_matching(&mut day.payments, id, |payment| payment.set_flag(flag, value))
            })
        })
    }

    pub fn toggle_payment_flag(
        &mut self,
        date: NaiveDate,
        id: &str,
        flag: PaymentFlag,
    ) -> StoreResult<bool> {
        self.transact("toggle_flag", "payments", |state| {
            with_day(state, date, |day| {
                update_matching(&mut day.payments, id, |payment| {
                    let current = payment.flag(flag);
                    payment.set_flag(flag, !current);
                })
            })
        })
    }

    pub fn add_expense(&mut self, date: NaiveDate, expense: Expense) -> StoreResult<EntryId> {
        let id = expense.id.clone();
        self.transact("append", "expenses", |state| {
            state.day_entry(date).expenses.push(expense);
            true
        })?;
        Ok(id)
    }

    pub fn edit_expense(
        &mut self,
        date: NaiveDate,
        id: &str,
        expense: Expense,
    ) -> StoreResult<bool> {
        self.transact("replace", "expenses", |state| {
            with_day(state, date, |day| replace_matching(&mut day.expenses, id, &expense))
        })
    }

    pub fn remove_expense(&mut self, date: NaiveDate, id: &str) -> StoreResult<bool> {
        self.transact("remove", "expenses", |state| {
            with_day(state, date, |day| remove_matching(&mut day.expenses, id))
        })
    }

    /// Applies `apply` and persists the result.
    ///
    /// `apply` returning `false` means nothing matched: no save happens and
    /// the call reports `Ok(false)`. A failed save restores the state held
    /// before `apply`, so only that mutation is lost.
    fn transact<F>(&mut self, operation: &str, collection: &str, apply: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut LedgerState) -> bool,
    {
        let snapshot = self.state.clone();
        if !apply(&mut self.state) {
            debug!(
                "event=store_mutation module=store status=noop op={operation} collection={collection}"
            );
            return Ok(false);
        }
        if let Err(err) = self.commit(operation, collection) {
            self.state = snapshot;
            warn!(
                "event=store_mutation module=store status=rolled_back op={operation} collection={collection}"
            );
            return Err(err);
        }
        Ok(true)
    }

    fn commit(&self, operation: &str, collection: &str) -> StoreResult<()> {
        let started_at = Instant::now();

        let document = self.state.to_json().map_err(|err| {
            error!(
                "event=store_persist module=store status=error op={operation} collection={collection} error_code=serialize_failed error={err}"
            );
            err
        })?;

        if let Err(err) = self.repo.save_document(&document) {
            error!(
                "event=store_persist module=store status=error op={operation} collection={collection} error_code=save_failed error={err}"
            );
            return Err(err.into());
        }

        debug!(
            "event=store_persist module=store status=ok op={operation} collection={collection} bytes={} duration_ms={}",
            document.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn update_records<T, F>(state: &mut LedgerState, id: &str, mut apply: F) -> bool
where
    T: TemporalEntry,
    F: FnMut(&mut TemporalRecord<T>),
{
    let mut matched = false;
    for record in T::records_mut(state)
        .iter_mut()
        .filter(|record| record.data.id() == id)
    {
        apply(record);
        matched = true;
    }
    matched
}

fn with_day<F>(state: &mut LedgerState, date: NaiveDate, apply: F) -> bool
where
    F: FnOnce(&mut DayPayload) -> bool,
{
    state.day_mut(date).map_or(false, apply)
}

fn load_state<R: StateRepository>(repo: &R) -> LedgerState {
    let document = match repo.load_document() {
        Ok(Some(document)) => document,
        Ok(None) => {
            info!("event=store_load module=store status=ok source=empty");
            return LedgerState::default();
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=recovered error_code=load_failed error={err}"
            );
            return LedgerState::default();
        }
    };

    match LedgerState::from_json(&document) {
        Ok(state) => {
            info!(
                "event=store_load module=store status=ok source=repository days={} records={}",
                state.days.len(),
                state.temporal_record_count()
            );
            state
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=recovered error_code=parse_failed error={err}"
            );
            LedgerState::default()
        }
    }
}

fn update_matching<T, F>(items: &mut [T], id: &str, mut apply: F) -> bool
where
    T: Identified,
    F: FnMut(&mut T),
{
    let mut matched = false;
    for item in items.iter_mut().filter(|item| item.id() == id) {
        apply(item);
        matched = true;
    }
    matched
}

fn replace_matching<T: Identified + Clone>(items: &mut [T], id: &str, replacement: &T) -> bool {
    update_matching(items, id, |item| {
        let mut next = replacement.clone();
        next.assign_id(id.to_string());
        *item = next;
    })
}

fn remove_matching<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
