//! Substring search over ledger history.
//!
//! # Responsibility
//! - Normalize query and field text the same way before comparison.
//! - Return hits per section with their recording date.
//!
//! # Invariants
//! - Matching is case-insensitive and ignores hyphens on both sides, so
//!   `010` finds `010-1234-5678`.
//! - A hit is any field containing the query; there is no ranking.
//! - Soft-deleted temporal records are searchable.
//! - Payment and expense hits are ordered most recent date first; entries
//!   from the same date keep their stored order.
//! - Blank queries return no hits.

use crate::model::entry::{Consultation, Expense, FirstLesson, Payment, Reservation};
use crate::model::record::{Dated, TemporalRecord};
use crate::model::state::LedgerState;
use serde::Serialize;

/// Minimum number of characters before payment suggestions are offered.
pub const SUGGESTION_MIN_CHARS: usize = 2;

/// Query text normalized for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    /// Returns `None` for blank input.
    pub fn parse(text: &str) -> Option<Self> {
        let needle = normalize(text.trim());
        if needle.is_empty() {
            return None;
        }
        Some(Self { needle })
    }

    /// Whether any of `fields` contains the query.
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        fields
            .iter()
            .any(|field| normalize(field).contains(&self.needle))
    }
}

fn normalize(value: &str) -> String {
    value.replace('-', "").to_lowercase()
}

/// Entries that expose text fields to history search.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Consultation {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.phone.as_str(),
            self.part.as_str(),
            self.content.as_str(),
        ]
    }
}

impl Searchable for Reservation {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.phone.as_str(), self.part.as_str()]
    }
}

impl Searchable for FirstLesson {
    fn search_fields(&self) -> Vec<&str> {
        self.booking.search_fields()
    }
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.part.as_str(), self.lesson_type.as_str()]
    }
}

impl Searchable for Expense {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str()]
    }
}

/// Matches `query` against every record, in storage order.
pub fn search_records<T: Searchable + Clone>(
    records: &[TemporalRecord<T>],
    query: &str,
) -> Vec<Dated<T>> {
    let Some(query) = SearchQuery::parse(query) else {
        return Vec::new();
    };

    records
        .iter()
        .filter(|record| query.matches_any(&record.data.search_fields()))
        .map(Dated::from_record)
        .collect()
}

pub fn search_consultations(state: &LedgerState, query: &str) -> Vec<Dated<Consultation>> {
    search_records(&state.consultations, query)
}

pub fn search_reservations(state: &LedgerState, query: &str) -> Vec<Dated<Reservation>> {
    search_records(&state.reservations, query)
}

pub fn search_first_lessons(state: &LedgerState, query: &str) -> Vec<Dated<FirstLesson>> {
    search_records(&state.first_lessons, query)
}

/// Payment hits across all days, most recent day first.
pub fn search_payments(state: &LedgerState, query: &str) -> Vec<Dated<Payment>> {
    let Some(query) = SearchQuery::parse(query) else {
        return Vec::new();
    };
    payment_history(state)
        .filter(|hit| query.matches_any(&hit.item.search_fields()))
        .collect()
}

/// Expense hits across all days, most recent day first.
pub fn search_expenses(state: &LedgerState, query: &str) -> Vec<Dated<Expense>> {
    let Some(query) = SearchQuery::parse(query) else {
        return Vec::new();
    };
    state
        .days
        .iter()
        .rev()
        .flat_map(|(date, day)| {
            day.expenses.iter().map(|expense| Dated {
                date: *date,
                item: expense.clone(),
            })
        })
        .filter(|hit| query.matches_any(&hit.item.search_fields()))
        .collect()
}

// `days` is a BTreeMap, so reverse key order is newest first.
fn payment_history(state: &LedgerState) -> impl Iterator<Item = Dated<Payment>> + '_ {
    state.days.iter().rev().flat_map(|(date, day)| {
        day.payments.iter().map(|payment| Dated {
            date: *date,
            item: payment.clone(),
        })
    })
}

/// Prefill values for the payment form taken from a past payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuggestion {
    pub part: String,
    pub lesson_type: String,
    pub amount: u64,
}

/// Suggests part, lesson type and amount from the most recent payment whose
/// name contains `name`.
///
/// Returns `None` for names shorter than [`SUGGESTION_MIN_CHARS`].
pub fn suggest_payment_history(state: &LedgerState, name: &str) -> Option<PaymentSuggestion> {
    if name.trim().chars().count() < SUGGESTION_MIN_CHARS {
        return None;
    }
    let query = SearchQuery::parse(name)?;

    payment_history(state)
        .find(|hit| query.matches_any(&[hit.item.name.as_str()]))
        .map(|hit| PaymentSuggestion {
            part: hit.item.part,
            lesson_type: hit.item.lesson_type,
            amount: hit.item.amount,
        })
}

#[cfg(test)]
mod tests {
    use super::SearchQuery;

    #[test]
    fn blank_query_is_rejected() {
        assert!(SearchQuery::parse("").is_none());
        assert!(SearchQuery::parse("   ").is_none());
        assert!(SearchQuery::parse("-").is_none());
    }

    #[test]
    fn hyphens_and_case_are_ignored() {
        let query = SearchQuery::parse("010-1234").unwrap();
        assert!(query.matches_any(&["01012345678"]));

        let query = SearchQuery::parse("kim").unwrap();
        assert!(query.matches_any(&["", "KIM Minji"]));
        assert!(!query.matches_any(&["Lee"]));
    }
}
