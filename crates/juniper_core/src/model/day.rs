//! Per-day payload and weekday defaults.
//!
//! Payments and expenses are owned by a single date key and are looked up by
//! exact match; they do not carry validity intervals.
//!
//! Older documents also kept notices and the shopping list per day. Those
//! fields are read but never written back; [`LedgerState::from_json`] moves
//! them into the temporal collections.
//!
//! [`LedgerState::from_json`]: crate::model::state::LedgerState::from_json

use crate::model::entry::{Expense, NoticeText, Payment, ShoppingItem};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Manager on duty Monday, Wednesday and Friday.
pub const MANAGER_MON_WED_FRI: &str = "오세혁";
/// Manager on duty Tuesday, Thursday and Saturday.
pub const MANAGER_TUE_THU_SAT: &str = "한인성";
/// Placeholder used on Sundays.
pub const NO_MANAGER: &str = "담당자 없음";

/// Standing checklist shown when no fixed notice has been written yet.
pub const DEFAULT_FIXED_NOTICE: &str =
    "• 원생 출결 체크 필수\n• 연습실 사용 후 소등 확인\n• 마감 전 냉난방기 확인";

/// Entries that belong wholly to one calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayPayload {
    /// Explicit manager override; `None` falls back to the weekday rota.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub payments: Vec<Payment>,
    pub expenses: Vec<Expense>,
    #[serde(skip_serializing)]
    pub(crate) fixed_notice: Option<NoticeText>,
    #[serde(skip_serializing)]
    pub(crate) new_notice: Option<NoticeText>,
    #[serde(skip_serializing)]
    pub(crate) shopping_list: Vec<ShoppingItem>,
}

impl DayPayload {
    pub fn revenue(&self) -> u64 {
        self.payments.iter().map(|payment| payment.amount).sum()
    }

    pub fn expense_total(&self) -> u64 {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }

    pub(crate) fn has_legacy_fields(&self) -> bool {
        self.fixed_notice.is_some() || self.new_notice.is_some() || !self.shopping_list.is_empty()
    }
}

/// Returns the rota manager for `date`.
pub fn default_manager_for(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon | Weekday::Wed | Weekday::Fri => MANAGER_MON_WED_FRI,
        Weekday::Tue | Weekday::Thu | Weekday::Sat => MANAGER_TUE_THU_SAT,
        Weekday::Sun => NO_MANAGER,
    }
}

/// One-character Korean weekday label (`일`, `월`, ...).
pub fn weekday_label(date: NaiveDate) -> &'static str {
    const LABELS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];
    LABELS[date.weekday().num_days_from_sunday() as usize]
}
