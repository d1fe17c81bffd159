//! Visible-state computation for one calendar date.

use crate::model::day::{default_manager_for, weekday_label, DayPayload, DEFAULT_FIXED_NOTICE};
use crate::model::entry::{
    Consultation, Expense, FirstLesson, Payment, Reservation, ShoppingItem,
};
use crate::model::record::{Dated, TemporalRecord};
use crate::model::state::LedgerState;
use chrono::NaiveDate;
use serde::Serialize;

/// Records of `records` visible on `view_date`, in storage order.
pub fn project_records<T>(
    records: &[TemporalRecord<T>],
    view_date: NaiveDate,
) -> impl Iterator<Item = &TemporalRecord<T>> + '_ {
    records
        .iter()
        .filter(move |record| record.is_visible_on(view_date))
}

/// Payloads of `records` visible on `view_date`, in storage order.
pub fn project<T>(
    records: &[TemporalRecord<T>],
    view_date: NaiveDate,
) -> impl Iterator<Item = &T> + '_ {
    project_records(records, view_date).map(|record| &record.data)
}

/// The single current value among `records` on `view_date`.
///
/// Picks the visible record with the greatest `created_at`. When several
/// share that date, the one stored last wins.
pub fn project_latest<T>(records: &[TemporalRecord<T>], view_date: NaiveDate) -> Option<&T> {
    project_records(records, view_date)
        .max_by_key(|record| record.created_at)
        .map(|record| &record.data)
}

/// Revenue, spending and their difference for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotals {
    pub revenue: u64,
    pub expenses: u64,
    /// `revenue - expenses`; negative on a loss day.
    pub net: i64,
}

impl DayTotals {
    fn from_payload(payload: Option<&DayPayload>) -> Self {
        let (revenue, expenses) =
            payload.map_or((0, 0), |day| (day.revenue(), day.expense_total()));
        Self {
            revenue,
            expenses,
            net: to_signed(revenue).saturating_sub(to_signed(expenses)),
        }
    }
}

fn to_signed(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

/// Everything shown for one viewed date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub manager: String,
    pub consultations: Vec<Dated<Consultation>>,
    pub reservations: Vec<Dated<Reservation>>,
    pub first_lessons: Vec<Dated<FirstLesson>>,
    pub payments: Vec<Payment>,
    pub expenses: Vec<Expense>,
    pub fixed_notice: String,
    pub new_notice: String,
    pub shopping_list: Vec<ShoppingItem>,
    pub totals: DayTotals,
}

/// Builds the report for `date`.
///
/// Absent day payloads fall back to the weekday rota and empty lists; absent
/// notices fall back to the standing checklist and an empty string. A blank
/// manager or blank fixed notice counts as absent.
pub fn build_day_report(state: &LedgerState, date: NaiveDate) -> DayReport {
    let payload = state.day(date);

    let manager = payload
        .and_then(|day| day.manager.as_deref())
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_manager_for(date).to_string());

    DayReport {
        date,
        weekday: weekday_label(date),
        manager,
        consultations: dated(&state.consultations, date),
        reservations: dated(&state.reservations, date),
        first_lessons: dated(&state.first_lessons, date),
        payments: payload.map(|day| day.payments.clone()).unwrap_or_default(),
        expenses: payload.map(|day| day.expenses.clone()).unwrap_or_default(),
        fixed_notice: project_latest(&state.fixed_notices, date)
            .filter(|text| !text.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_FIXED_NOTICE.to_string()),
        new_notice: project_latest(&state.new_notices, date)
            .cloned()
            .unwrap_or_default(),
        shopping_list: project(&state.shopping_list, date).cloned().collect(),
        totals: DayTotals::from_payload(payload),
    }
}

fn dated<T: Clone>(records: &[TemporalRecord<T>], date: NaiveDate) -> Vec<Dated<T>> {
    project_records(records, date).map(Dated::from_record).collect()
}
