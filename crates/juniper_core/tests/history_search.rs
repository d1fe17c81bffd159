use chrono::NaiveDate;
use juniper_core::search::history::{
    search_consultations, search_expenses, search_first_lessons, search_payments,
    search_reservations,
};
use juniper_core::{
    suggest_payment_history, Consultation, Expense, LedgerStore, MemoryStateRepository, Payment,
    PaymentMethod, Reservation,
};

fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

fn seeded_store() -> LedgerStore<MemoryStateRepository> {
    let mut store = LedgerStore::open(MemoryStateRepository::new());
    store
        .append(
            Consultation::new("KIM Minji", "010-1234-5678", "piano", "weekday evenings"),
            date("2024-01-10"),
        )
        .unwrap();
    store
        .append(
            Consultation::new("Park", "010-5555-0000", "drums", "asked about kim's class"),
            date("2024-01-11"),
        )
        .unwrap();
    store
        .append(
            Reservation::new("2024-01-20", "18:00", "Kim Minji", "01012345678", "piano"),
            date("2024-01-10"),
        )
        .unwrap();
    store
        .add_first_lesson(
            Reservation::new("2024-01-15", "11:00", "Lee", "010-7777-1234", "vocal"),
            date("2024-01-09"),
        )
        .unwrap();
    store
        .add_payment(
            date("2024-01-05"),
            Payment::new("Kim Minji", "piano", "trial", 50_000, PaymentMethod::Cash),
        )
        .unwrap();
    store
        .add_payment(
            date("2024-02-01"),
            Payment::new("Kim Minji", "piano", "monthly", 200_000, PaymentMethod::Card),
        )
        .unwrap();
    store
        .add_expense(date("2024-01-05"), Expense::new(12_000, "piano tuning kit"))
        .unwrap();
    store
}

#[test]
fn phone_query_ignores_hyphens_on_both_sides() {
    let store = seeded_store();
    let hits = search_consultations(store.state(), "0101234");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item.name, "KIM Minji");
    assert_eq!(hits[0].date, date("2024-01-10"));

    let hits = search_reservations(store.state(), "010-1234");
    assert_eq!(hits.len(), 1);
}

#[test]
fn name_query_is_case_insensitive_across_fields() {
    let store = seeded_store();
    let hits = search_consultations(store.state(), "kim");
    assert_eq!(hits.len(), 2, "name and content both match");
}

#[test]
fn deleted_records_remain_searchable() {
    let mut store = seeded_store();
    let id = store.state().consultations[0].data.id.clone();
    store
        .soft_delete::<Consultation>(&id, date("2024-01-12"))
        .unwrap();

    let hits = search_consultations(store.state(), "Minji");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item.id, id);
}

#[test]
fn payment_hits_are_newest_day_first() {
    let store = seeded_store();
    let hits = search_payments(store.state(), "kim");
    let dates: Vec<_> = hits.iter().map(|hit| hit.date).collect();
    assert_eq!(dates, vec![date("2024-02-01"), date("2024-01-05")]);
}

#[test]
fn expense_and_first_lesson_sections_are_searched() {
    let store = seeded_store();
    assert_eq!(search_expenses(store.state(), "TUNING").len(), 1);
    assert_eq!(search_first_lessons(store.state(), "vocal").len(), 1);
    assert!(search_first_lessons(store.state(), "drums").is_empty());
}

#[test]
fn blank_query_returns_nothing() {
    let store = seeded_store();
    assert!(search_consultations(store.state(), "   ").is_empty());
    assert!(search_payments(store.state(), "").is_empty());
}

#[test]
fn suggestion_uses_most_recent_matching_payment() {
    let store = seeded_store();
    let suggestion = suggest_payment_history(store.state(), "kim m").unwrap();
    assert_eq!(suggestion.lesson_type, "monthly");
    assert_eq!(suggestion.amount, 200_000);
    assert_eq!(suggestion.part, "piano");

    assert!(suggest_payment_history(store.state(), "k").is_none());
    assert!(suggest_payment_history(store.state(), "nobody").is_none());
}
