use chrono::NaiveDate;
use juniper_core::{
    Consultation, EntryValidationError, Expense, FirstLesson, FirstLessonFlag, LedgerStore,
    MemoryStateRepository, Payment, PaymentFlag, PaymentMethod, RepoError, RepoResult,
    Reservation, ShoppingItem, StateRepository, StoreError,
};
use std::cell::Cell;

fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

fn store() -> LedgerStore<MemoryStateRepository> {
    LedgerStore::open(MemoryStateRepository::new())
}

/// Repository whose saves can be switched to fail.
#[derive(Default)]
struct SwitchableRepository {
    inner: MemoryStateRepository,
    failing: Cell<bool>,
}

impl StateRepository for SwitchableRepository {
    fn load_document(&self) -> RepoResult<Option<String>> {
        self.inner.load_document()
    }

    fn save_document(&self, document: &str) -> RepoResult<()> {
        if self.failing.get() {
            return Err(RepoError::InvalidData("disk unavailable".to_string()));
        }
        self.inner.save_document(document)
    }
}

#[test]
fn every_effective_mutation_persists_the_document() {
    let mut store = store();
    store
        .append(Consultation::new("Kim", "", "piano", ""), date("2024-01-10"))
        .unwrap();
    store.set_manager(date("2024-01-10"), "substitute").unwrap();

    let repo = store.repository();
    assert_eq!(repo.save_count(), 2);
    let document = repo.document().unwrap();
    assert!(document.contains("masterConsultations"));
    assert!(document.contains("substitute"));
}

#[test]
fn unmatched_ids_are_silent_noops() {
    let mut store = store();
    let day = date("2024-01-10");

    assert!(!store.soft_delete::<Consultation>("missing", day).unwrap());
    assert!(!store
        .replace_payload("missing", Consultation::new("Kim", "", "", ""))
        .unwrap());
    assert!(!store.toggle_shopping_completed("missing").unwrap());
    assert!(!store
        .set_first_lesson_flag("missing", FirstLessonFlag::Paid, true)
        .unwrap());
    assert!(!store.remove_payment(day, "missing").unwrap());
    assert!(!store
        .set_payment_flag(day, "missing", PaymentFlag::Journal, true)
        .unwrap());
    assert!(!store.remove_expense(day, "missing").unwrap());

    assert_eq!(store.repository().save_count(), 0);
    assert!(store.state().days.is_empty());
}

#[test]
fn repeated_soft_delete_moves_the_deletion_date() {
    let mut store = store();
    let id = store
        .append(ShoppingItem::new("tuner"), date("2024-01-01"))
        .unwrap();

    store
        .soft_delete::<ShoppingItem>(&id, date("2024-01-10"))
        .unwrap();
    store
        .soft_delete::<ShoppingItem>(&id, date("2024-01-05"))
        .unwrap();

    let record = store.find::<ShoppingItem>(&id).unwrap();
    assert_eq!(record.deleted_at, Some(date("2024-01-05")));
}

#[test]
fn soft_delete_twice_on_the_same_date_equals_once() {
    let mut store = store();
    let id = store
        .append(Consultation::new("Kim", "010", "piano", ""), date("2024-01-01"))
        .unwrap();

    assert!(store
        .soft_delete::<Consultation>(&id, date("2024-01-10"))
        .unwrap());
    let state_after_once = store.state().clone();
    let document_after_once = store.repository().document().unwrap();

    assert!(store
        .soft_delete::<Consultation>(&id, date("2024-01-10"))
        .unwrap());

    assert_eq!(store.state(), &state_after_once);
    assert_eq!(store.repository().document().unwrap(), document_after_once);
}

#[test]
fn failed_save_leaves_the_ledger_unchanged() {
    let mut store = LedgerStore::open(SwitchableRepository::default());
    let day = date("2024-01-10");
    let kept = store
        .append(Consultation::new("Kim", "", "piano", ""), day)
        .unwrap();
    let before = store.state().clone();

    store.repository().failing.set(true);
    assert!(matches!(
        store.append(Consultation::new("Lee", "", "drums", ""), day),
        Err(StoreError::Repo(_))
    ));
    assert!(store.soft_delete::<Consultation>(&kept, day).is_err());
    assert!(store
        .add_payment(day, Payment::new("Kim", "piano", "monthly", 100_000, PaymentMethod::Card))
        .is_err());
    assert!(store.set_manager(day, "substitute").is_err());
    assert!(store.set_new_notice(day, "call the tuner").is_err());
    assert_eq!(store.state(), &before);

    store.repository().failing.set(false);
    store
        .append(Consultation::new("Lee", "", "drums", ""), day)
        .unwrap();
    assert_eq!(store.state().consultations.len(), 2);
    assert!(store.state().days.is_empty());
    let document = store.repository().inner.document().unwrap();
    assert_eq!(document.matches("\"Lee\"").count(), 1);
    assert!(!document.contains("substitute"));
}

#[test]
fn replace_keeps_id_and_validity() {
    let mut store = store();
    let id = store
        .append(Reservation::new("2024-01-20", "14:30", "Kim", "010", "piano"), date("2024-01-10"))
        .unwrap();

    let edited = Reservation::new("2024-01-21", "15:00", "Kim", "010-9999-0000", "piano");
    assert!(store.replace_payload(&id, edited).unwrap());

    let record = store.find::<Reservation>(&id).unwrap();
    assert_eq!(record.data.id, id);
    assert_eq!(record.data.time, "15:00");
    assert_eq!(record.created_at, date("2024-01-10"));
    assert_eq!(record.deleted_at, None);
}

#[test]
fn validation_rejects_blank_required_fields() {
    let mut store = store();
    let err = store
        .append(Consultation::new("  ", "010", "", ""), date("2024-01-10"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(EntryValidationError::MissingField { field: "name", .. })
    ));

    let err = store
        .add_first_lesson(Reservation::new("", "", "Kim", "", ""), date("2024-01-10"))
        .unwrap_err();
    assert!(err.to_string().contains("time"));

    assert_eq!(store.state().temporal_record_count(), 0);
    assert_eq!(store.repository().save_count(), 0);
}

#[test]
fn first_lesson_flags_are_set_and_toggled_independently() {
    let mut store = store();
    let id = store
        .add_first_lesson(
            Reservation::new("2024-01-12", "10:00", "Choi", "", "guitar"),
            date("2024-01-10"),
        )
        .unwrap();

    assert!(store
        .set_first_lesson_flag(&id, FirstLessonFlag::Paid, true)
        .unwrap());
    assert!(store
        .toggle_first_lesson_flag(&id, FirstLessonFlag::FormSubmitted)
        .unwrap());
    assert!(store
        .toggle_first_lesson_flag(&id, FirstLessonFlag::Paid)
        .unwrap());

    let lesson: &FirstLesson = &store.find::<FirstLesson>(&id).unwrap().data;
    assert!(!lesson.is_paid);
    assert!(lesson.is_form_submitted);
}

#[test]
fn payments_and_expenses_are_scoped_to_their_day() {
    let mut store = store();
    let day = date("2024-01-10");
    let other = date("2024-01-11");

    let payment_id = store
        .add_payment(day, Payment::new("Lee", "drums", "monthly", 150_000, PaymentMethod::Transfer))
        .unwrap();
    let expense_id = store.add_expense(day, Expense::new(20_000, "coffee beans")).unwrap();

    assert!(!store.remove_payment(other, &payment_id).unwrap());
    assert!(store
        .toggle_payment_flag(day, &payment_id, PaymentFlag::Clbiz)
        .unwrap());

    let edited = Payment::new("Lee", "drums", "monthly", 160_000, PaymentMethod::Card);
    assert!(store.edit_payment(day, &payment_id, edited).unwrap());
    assert!(store
        .edit_expense(day, &expense_id, Expense::new(25_000, "coffee beans"))
        .unwrap());

    let report = store.day_report(day);
    assert_eq!(report.payments[0].id, payment_id);
    assert_eq!(report.payments[0].amount, 160_000);
    assert_eq!(report.totals.revenue, 160_000);
    assert_eq!(report.totals.expenses, 25_000);
    assert_eq!(report.totals.net, 135_000);

    assert!(store.remove_expense(day, &expense_id).unwrap());
    assert!(store.day_report(day).expenses.is_empty());
}

#[test]
fn colliding_ids_affect_every_match() {
    let mut store = store();
    let mut first = ShoppingItem::new("picks");
    first.id = "dup".to_string();
    let mut second = ShoppingItem::new("capo");
    second.id = "dup".to_string();
    store.append(first, date("2024-01-01")).unwrap();
    store.append(second, date("2024-01-02")).unwrap();

    assert!(store.set_shopping_completed("dup", true).unwrap());
    assert!(store
        .state()
        .shopping_list
        .iter()
        .all(|record| record.data.completed));
}

#[test]
fn reopening_from_saved_document_restores_state() {
    let mut store = store();
    let id = store
        .append(Consultation::new("Kim", "010-1234-5678", "piano", "evening"), date("2024-01-10"))
        .unwrap();
    store
        .add_payment(
            date("2024-01-10"),
            Payment::new("Kim", "piano", "monthly", 200_000, PaymentMethod::Card),
        )
        .unwrap();
    store.set_fixed_notice(date("2024-01-10"), "lock the back door").unwrap();

    let document = store.into_repository().document().unwrap();
    let reopened = LedgerStore::open(MemoryStateRepository::with_document(document));

    assert_eq!(reopened.find::<Consultation>(&id).unwrap().data.phone, "010-1234-5678");
    let report = reopened.day_report(date("2024-01-12"));
    assert_eq!(report.fixed_notice, "lock the back door");
    assert_eq!(report.consultations.len(), 1);
    assert_eq!(reopened.day_report(date("2024-01-10")).totals.revenue, 200_000);
}

#[test]
fn malformed_document_recovers_to_empty_ledger() {
    let repo = MemoryStateRepository::with_document("{not json");
    let store = LedgerStore::open(&repo);

    assert!(store.state().days.is_empty());
    assert_eq!(store.state().temporal_record_count(), 0);
    assert_eq!(repo.load_document().unwrap().as_deref(), Some("{not json"));
}

#[test]
fn per_day_notices_from_older_documents_survive_the_next_save() {
    let repo = MemoryStateRepository::with_document(
        r#"{"days":{"2024-01-09":{"newNotice":"call the tuner","fixedNotice":"old checklist",
            "shoppingList":[{"id":"1700000000000","text":"picks","completed":false}]}}}"#,
    );
    let mut store = LedgerStore::open(&repo);

    let legacy_day = store.day_report(date("2024-01-09"));
    assert_eq!(legacy_day.new_notice, "call the tuner");
    assert_eq!(legacy_day.fixed_notice, "old checklist");
    assert_eq!(legacy_day.shopping_list.len(), 1);
    let next_day = store.day_report(date("2024-01-10"));
    assert_eq!(next_day.new_notice, "");
    assert!(next_day.shopping_list.is_empty());

    store.set_new_notice(date("2024-01-10"), "bring keys").unwrap();
    let document = repo.document().unwrap();
    assert!(!document.contains("\"newNotice\""));

    let reopened = LedgerStore::open(MemoryStateRepository::with_document(document));
    assert_eq!(reopened.day_report(date("2024-01-09")).new_notice, "call the tuner");
    assert_eq!(reopened.day_report(date("2024-01-10")).new_notice, "bring keys");
    assert_eq!(reopened.state(), store.state());
}
