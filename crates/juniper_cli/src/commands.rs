//! CLI command implementations.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the ledger database.
//! - Translate parsed commands into ledger store calls and render results.
//!
//! # Invariants
//! - Commands that address an id fail with `NotFound` when nothing matched;
//!   the ledger is left untouched in that case.

use chrono::{Local, NaiveDate};
use juniper_core::format::format_phone_number;
use juniper_core::search::history::{
    search_consultations, search_expenses, search_first_lessons, search_payments,
    search_reservations,
};
use juniper_core::summary::SUMMARY_FAILURE_MESSAGE;
use juniper_core::{
    init_logging, open_db, suggest_payment_history, Consultation, CoreConfig, Expense,
    FirstLesson, GeminiClient, GeminiConfig, LedgerStore, NoticeSlot, Payment, Reservation,
    ShoppingItem, SqliteStateRepository, StateRepository, SummaryGate, SummaryOutcome,
};
use log::{info, warn};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use crate::args::{
    BookingAction, BookingArgs, BookingEditArgs, Cli, Command, ConsultationAction, ExpenseAction,
    FirstLessonAction, NoticeAction, PaymentAction, SearchSection, ShoppingAction,
};
use crate::errors::{CliError, CliResult};
use crate::output::{write_hits, write_json, write_report, write_suggestion};

const SUMMARY_BUSY_MESSAGE: &str = "이미 요약을 생성하는 중입니다.";

/// Runs one parsed invocation against the configured ledger database.
pub fn run(cli: Cli) -> CliResult<()> {
    let config = resolve_config(cli.data_dir.as_deref(), cli.log_level.as_deref())?;
    std::fs::create_dir_all(&config.data_dir)?;
    init_logging(config.log_level, &config.log_dir())?;

    let conn = open_db(config.db_path())?;
    let mut store = LedgerStore::open(SqliteStateRepository::new(&conn));

    let started_at = Instant::now();
    let name = command_name(&cli.command);
    let today = Local::now().date_naive();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    execute(cli.command, &mut store, today, &config.gemini, &mut out)?;
    out.flush()?;

    info!(
        "event=cli_command module=cli status=ok command={name} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(())
}

/// Environment configuration with command-line overrides applied.
pub fn resolve_config(data_dir: Option<&Path>, log_level: Option<&str>) -> CliResult<CoreConfig> {
    let mut config = CoreConfig::from_env()?;
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir)?;
    }
    if let Some(level) = log_level {
        config = config.with_log_level(level)?;
    }
    Ok(config)
}

/// Executes `command` against `store`, writing human output to `out`.
///
/// Dates omitted on the command line resolve to `today`.
pub fn execute<R, W>(
    command: Command,
    store: &mut LedgerStore<R>,
    today: NaiveDate,
    gemini: &GeminiConfig,
    out: &mut W,
) -> CliResult<()>
where
    R: StateRepository,
    W: Write,
{
    match command {
        Command::Report { date, json } => {
            let report = store.day_report(date.unwrap_or(today));
            if json {
                write_json(out, &report)
            } else {
                write_report(out, &report)
            }
        }
        Command::Manager { date, name } => {
            store.set_manager(date.unwrap_or(today), name)?;
            Ok(())
        }
        Command::Consultation { action } => consultation(action, store, today, out),
        Command::Reservation { action } => reservation(action, store, today, out),
        Command::FirstLesson { action } => first_lesson(action, store, today, out),
        Command::Payment { action } => payment(action, store, today, out),
        Command::Expense { action } => expense(action, store, today, out),
        Command::Shopping { action } => shopping(action, store, today, out),
        Command::Notice { slot } => {
            let (slot, date, text) = match slot {
                NoticeAction::Fixed { date, text } => (NoticeSlot::Fixed, date, text),
                NoticeAction::New { date, text } => (NoticeSlot::New, date, text),
            };
            store.set_notice(slot, date.unwrap_or(today), text)?;
            Ok(())
        }
        Command::Search {
            section,
            query,
            json,
        } => search(section, &query, json, store, out),
        Command::Suggest { name } => {
            let suggestion = suggest_payment_history(store.state(), &name);
            write_suggestion(out, suggestion.as_ref())
        }
        Command::Summary { date } => {
            let report = store.day_report(date.unwrap_or(today));
            let outcome = match GeminiClient::from_config(gemini) {
                Ok(client) => SummaryGate::new().run(&client, &report),
                Err(err) => {
                    warn!(
                        "event=summary_generate module=cli status=error date={} error={err}",
                        report.date
                    );
                    SummaryOutcome::Completed(SUMMARY_FAILURE_MESSAGE.to_string())
                }
            };
            match outcome {
                SummaryOutcome::Completed(text) => writeln!(out, "{text}")?,
                SummaryOutcome::Busy => writeln!(out, "{SUMMARY_BUSY_MESSAGE}")?,
            }
            Ok(())
        }
    }
}

fn consultation<R: StateRepository, W: Write>(
    action: ConsultationAction,
    store: &mut LedgerStore<R>,
    today: NaiveDate,
    out: &mut W,
) -> CliResult<()> {
    match action {
        ConsultationAction::Add {
            date,
            name,
            phone,
            part,
            content,
        } => {
            let entry = Consultation::new(name, format_phone_number(&phone), part, content);
            let id = store.append(entry, date.unwrap_or(today))?;
            writeln!(out, "{id}")?;
        }
        ConsultationAction::Edit {
            id,
            name,
            phone,
            part,
            content,
        } => {
            let mut entry = store
                .find::<Consultation>(&id)
                .map(|record| record.data.clone())
                .ok_or_else(|| CliError::not_found("consultation", &id))?;
            if let Some(name) = name {
                entry.name = name;
            }
            if let Some(phone) = phone {
                entry.phone = format_phone_number(&phone);
            }
            if let Some(part) = part {
                entry.part = part;
            }
            if let Some(content) = content {
                entry.content = content;
            }
            require_found(store.replace_payload(&id, entry)?, "consultation", &id)?;
        }
        ConsultationAction::Delete { id, date } => {
            let deleted = store.soft_delete::<Consultation>(&id, date.unwrap_or(today))?;
            require_found(deleted, "consultation", &id)?;
        }
    }
    Ok(())
}

fn reservation<R: StateRepository, W: Write>(
    action: BookingAction,
    store: &mut LedgerStore<R>,
    today: NaiveDate,
    out: &mut W,
) -> CliResult<()> {
    match action {
        BookingAction::Add { date, booking } => {
            let id = store.append(booking_from(booking), date.unwrap_or(today))?;
            writeln!(out, "{id}")?;
        }
        BookingAction::Edit { id, changes } => {
            let mut entry = store
                .find::<Reservation>(&id)
                .map(|record| record.data.clone())
                .ok_or_else(|| CliError::not_found("reservation", &id))?;
            apply_booking_changes(&mut entry, changes);
            require_found(store.replace_payload(&id, entry)?, "reservation", &id)?;
        }
        BookingAction::Delete { id, date } => {
            let deleted = store.soft_delete::<Reservation>(&id, date.unwrap_or(today))?;
            require_found(deleted, "reservation", &id)?;
        }
    }
    Ok(())
}

fn first_lesson<R: StateRepository, W: Write>(
    action: FirstLessonAction,
    store: &mut LedgerStore<R>,
    today: NaiveDate,
    out: &mut W,
) -> CliResult<()> {
    match action {
        FirstLessonAction::Add { date, booking } => {
            let id = store.add_first_lesson(booking_from(booking), date.unwrap_or(today))?;
            writeln!(out, "{id}")?;
        }
        FirstLessonAction::Edit { id, changes } => {
            let mut entry = store
                .find::<FirstLesson>(&id)
                .map(|record| record.data.clone())
                .ok_or_else(|| CliError::not_found("first lesson", &id))?;
            apply_booking_changes(&mut entry.booking, changes);
            require_found(store.replace_payload(&id, entry)?, "first lesson", &id)?;
        }
        FirstLessonAction::Delete { id, date } => {
            let deleted = store.soft_delete::<FirstLesson>(&id, date.unwrap_or(today))?;
            require_found(deleted, "first lesson", &id)?;
        }
        FirstLessonAction::Flag { id, flag, set } => {
            let changed = match set {
                Some(value) => store.set_first_lesson_flag(&id, flag.into(), value)?,
                None => store.toggle_first_lesson_flag(&id, flag.into())?,
            };
            require_found(changed, "first lesson", &id)?;
        }
    }
    Ok(())
}

fn payment<R: StateRepository, W: Write>(
    action: PaymentAction,
    store: &mut LedgerStore<R>,
    today: NaiveDate,
    out: &mut W,
) -> CliResult<()> {
    match action {
        PaymentAction::Add {
            date,
            name,
            part,
            lesson_type,
            amount,
            method,
        } => {
            let entry = Payment::new(name, part, lesson_type, amount, method);
            let id = store.add_payment(date.unwrap_or(today), entry)?;
            writeln!(out, "{id}")?;
        }
        PaymentAction::Edit {
            id,
            date,
            name,
            part,
            lesson_type,
            amount,
            method,
        } => {
            let date = date.unwrap_or(today);
            let mut entry = store
                .find_payment(date, &id)
                .cloned()
                .ok_or_else(|| CliError::not_found("payment", &id))?;
            if let Some(name) = name {
                entry.name = name;
            }
            if let Some(part) = part {
                entry.part = part;
            }
            if let Some(lesson_type) = lesson_type {
                entry.lesson_type = lesson_type;
            }
            if let Some(amount) = amount {
                entry.amount = amount;
            }
            if let Some(method) = method {
                entry.method = method;
            }
            require_found(store.edit_payment(date, &id, entry)?, "payment", &id)?;
        }
        PaymentAction::Delete { id, date } => {
            let removed = store.remove_payment(date.unwrap_or(today), &id)?;
            require_found(removed, "payment", &id)?;
        }
        PaymentAction::Flag {
            id,
            flag,
            date,
            set,
        } => {
            let date = date.unwrap_or(today);
            let changed = match set {
                Some(value) => store.set_payment_flag(date, &id, flag.into(), value)?,
                None => store.toggle_payment_flag(date, &id, flag.into())?,
            };
            require_found(changed, "payment", &id)?;
        }
    }
    Ok(())
}

fn expense<R: StateRepository, W: Write>(
    action: ExpenseAction,
    store: &mut LedgerStore<R>,
    today: NaiveDate,
    out: &mut W,
) -> CliResult<()> {
    match action {
        ExpenseAction::Add {
            date,
            amount,
            description,
        } => {
            let id = store.add_expense(date.unwrap_or(today), Expense::new(amount, description))?;
            writeln!(out, "{id}")?;
        }
        ExpenseAction::Edit {
            id,
            date,
            amount,
            description,
        } => {
            let date = date.unwrap_or(today);
            let mut entry = store
                .find_expense(date, &id)
                .cloned()
                .ok_or_else(|| CliError::not_found("expense", &id))?;
            if let Some(amount) = amount {
                entry.amount = amount;
            }
            if let Some(description) = description {
                entry.description = description;
            }
            require_found(store.edit_expense(date, &id, entry)?, "expense", &id)?;
        }
        ExpenseAction::Delete { id, date } => {
            let removed = store.remove_expense(date.unwrap_or(today), &id)?;
            require_found(removed, "expense", &id)?;
        }
    }
    Ok(())
}

fn shopping<R: StateRepository, W: Write>(
    action: ShoppingAction,
    store: &mut LedgerStore<R>,
    today: NaiveDate,
    out: &mut W,
) -> CliResult<()> {
    match action {
        ShoppingAction::Add { date, text } => {
            let id = store.append(ShoppingItem::new(text), date.unwrap_or(today))?;
            writeln!(out, "{id}")?;
        }
        ShoppingAction::Edit { id, text } => {
            let mut entry = store
                .find::<ShoppingItem>(&id)
                .map(|record| record.data.clone())
                .ok_or_else(|| CliError::not_found("shopping item", &id))?;
            entry.text = text;
            require_found(store.replace_payload(&id, entry)?, "shopping item", &id)?;
        }
        ShoppingAction::Toggle { id } => {
            require_found(store.toggle_shopping_completed(&id)?, "shopping item", &id)?;
        }
        ShoppingAction::Delete { id, date } => {
            let deleted = store.soft_delete::<ShoppingItem>(&id, date.unwrap_or(today))?;
            require_found(deleted, "shopping item", &id)?;
        }
    }
    Ok(())
}

fn search<R: StateRepository, W: Write>(
    section: SearchSection,
    query: &str,
    json: bool,
    store: &LedgerStore<R>,
    out: &mut W,
) -> CliResult<()> {
    let state = store.state();
    match section {
        SearchSection::Consultations => {
            let hits = search_consultations(state, query);
            if json {
                return write_json(out, &hits);
            }
            write_hits(out, &hits, |entry| {
                format!("{} {} {} - {}", entry.name, entry.phone, entry.part, entry.content)
            })
        }
        SearchSection::Reservations => {
            let hits = search_reservations(state, query);
            if json {
                return write_json(out, &hits);
            }
            write_hits(out, &hits, |entry| {
                format!("{} {} {} {}", entry.name, entry.phone, entry.part, entry.time)
            })
        }
        SearchSection::FirstLessons => {
            let hits = search_first_lessons(state, query);
            if json {
                return write_json(out, &hits);
            }
            write_hits(out, &hits, |entry| {
                let booking = &entry.booking;
                format!("{} {} {} {}", booking.name, booking.phone, booking.part, booking.time)
            })
        }
        SearchSection::Payments => {
            let hits = search_payments(state, query);
            if json {
                return write_json(out, &hits);
            }
            write_hits(out, &hits, |entry| {
                format!(
                    "{} {} {} {}원 {}",
                    entry.name, entry.part, entry.lesson_type, entry.amount, entry.method
                )
            })
        }
        SearchSection::Expenses => {
            let hits = search_expenses(state, query);
            if json {
                return write_json(out, &hits);
            }
            write_hits(out, &hits, |entry| {
                format!("{} {}원", entry.description, entry.amount)
            })
        }
    }
}

fn booking_from(args: BookingArgs) -> Reservation {
    Reservation::new(
        args.lesson_date,
        args.time,
        args.name,
        format_phone_number(&args.phone),
        args.part,
    )
}

fn apply_booking_changes(entry: &mut Reservation, changes: BookingEditArgs) {
    if let Some(lesson_date) = changes.lesson_date {
        entry.date = lesson_date;
    }
    if let Some(time) = changes.time {
        entry.time = time;
    }
    if let Some(name) = changes.name {
        entry.name = name;
    }
    if let Some(phone) = changes.phone {
        entry.phone = format_phone_number(&phone);
    }
    if let Some(part) = changes.part {
        entry.part = part;
    }
}

fn require_found(found: bool, kind: &str, id: &str) -> CliResult<()> {
    if found {
        Ok(())
    } else {
        Err(CliError::not_found(kind, id))
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Report { .. } => "report",
        Command::Manager { .. } => "manager",
        Command::Consultation { .. } => "consultation",
        Command::Reservation { .. } => "reservation",
        Command::FirstLesson { .. } => "first_lesson",
        Command::Payment { .. } => "payment",
        Command::Expense { .. } => "expense",
        Command::Shopping { .. } => "shopping",
        Command::Notice { .. } => "notice",
        Command::Search { .. } => "search",
        Command::Suggest { .. } => "suggest",
        Command::Summary { .. } => "summary",
    }
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::args::Cli;
    use crate::errors::{CliErrorCode, CliResult};
    use chrono::NaiveDate;
    use clap::Parser;
    use juniper_core::summary::SUMMARY_FAILURE_MESSAGE;
    use juniper_core::{GeminiConfig, LedgerStore, MemoryStateRepository, PaymentMethod};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn run_args(
        store: &mut LedgerStore<MemoryStateRepository>,
        args: &[&str],
    ) -> CliResult<String> {
        let cli = Cli::try_parse_from(std::iter::once("juniper").chain(args.iter().copied()))
            .unwrap();
        let mut out = Vec::new();
        execute(cli.command, store, today(), &GeminiConfig::default(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn store() -> LedgerStore<MemoryStateRepository> {
        LedgerStore::open(MemoryStateRepository::new())
    }

    #[test]
    fn added_consultation_appears_in_report_with_formatted_phone() {
        let mut store = store();
        let id = run_args(
            &mut store,
            &["consultation", "add", "--name", "Kim", "--phone", "01012345678"],
        )
        .unwrap();
        assert!(!id.trim().is_empty());

        let report = run_args(&mut store, &["report"]).unwrap();
        assert!(report.contains("Kim 010-1234-5678"));
        assert!(report.contains("2024-01-10 (수)"));
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let mut store = store();
        let id = run_args(
            &mut store,
            &["consultation", "add", "--name", "Kim", "--part", "piano"],
        )
        .unwrap();
        let id = id.trim();

        run_args(&mut store, &["consultation", "edit", id, "--content", "call back"]).unwrap();

        let entry = &store.state().consultations[0].data;
        assert_eq!(entry.part, "piano");
        assert_eq!(entry.content, "call back");
    }

    #[test]
    fn booking_edits_keep_omitted_fields_and_flags() {
        let mut store = store();
        let reservation = run_args(
            &mut store,
            &["reservation", "add", "--time", "14:00", "--name", "Park", "--part", "vocal"],
        )
        .unwrap();
        run_args(
            &mut store,
            &["reservation", "edit", reservation.trim(), "--time", "15:30", "--phone", "01099998888"],
        )
        .unwrap();
        let booking = &store.state().reservations[0].data;
        assert_eq!(booking.time, "15:30");
        assert_eq!(booking.phone, "010-9999-8888");
        assert_eq!(booking.part, "vocal");

        let lesson = run_args(
            &mut store,
            &["first-lesson", "add", "--time", "10:00", "--name", "Choi"],
        )
        .unwrap();
        let lesson = lesson.trim();
        run_args(&mut store, &["first-lesson", "flag", lesson, "paid"]).unwrap();
        run_args(&mut store, &["first-lesson", "edit", lesson, "--name", "Choi Yuna"]).unwrap();
        let edited = &store.state().first_lessons[0].data;
        assert_eq!(edited.booking.name, "Choi Yuna");
        assert_eq!(edited.booking.time, "10:00");
        assert!(edited.is_paid);
        assert_eq!(edited.booking.id, lesson);
    }

    #[test]
    fn payment_and_expense_edits_keep_omitted_fields() {
        let mut store = store();
        let payment = run_args(
            &mut store,
            &[
                "payment", "add", "--name", "Lee", "--part", "drums", "--lesson-type",
                "monthly", "--amount", "150,000",
            ],
        )
        .unwrap();
        let payment = payment.trim();
        run_args(&mut store, &["payment", "flag", payment, "journal"]).unwrap();
        run_args(
            &mut store,
            &["payment", "edit", payment, "--amount", "160,000", "--method", "cash"],
        )
        .unwrap();

        let expense = run_args(
            &mut store,
            &["expense", "add", "--amount", "20000", "--description", "coffee"],
        )
        .unwrap();
        run_args(&mut store, &["expense", "edit", expense.trim(), "--amount", "25,000"]).unwrap();

        let report = store.day_report(today());
        let edited = &report.payments[0];
        assert_eq!(edited.id, payment);
        assert_eq!(edited.part, "drums");
        assert_eq!(edited.amount, 160_000);
        assert_eq!(edited.method, PaymentMethod::Cash);
        assert!(edited.is_journal);
        assert_eq!(report.expenses[0].description, "coffee");
        assert_eq!(report.totals.net, 135_000);

        let err = run_args(
            &mut store,
            &["payment", "edit", payment, "--date", "2024-01-11", "--amount", "1"],
        )
        .unwrap_err();
        assert_eq!(err.code(), CliErrorCode::NotFound);
    }

    #[test]
    fn shopping_edit_keeps_completion() {
        let mut store = store();
        let id = run_args(&mut store, &["shopping", "add", "strings"]).unwrap();
        let id = id.trim();
        run_args(&mut store, &["shopping", "toggle", id]).unwrap();
        run_args(&mut store, &["shopping", "edit", id, "guitar strings"]).unwrap();

        let item = &store.state().shopping_list[0].data;
        assert_eq!(item.text, "guitar strings");
        assert!(item.completed);
    }

    #[test]
    fn deleting_unknown_id_is_not_found() {
        let mut store = store();
        let err = run_args(&mut store, &["payment", "delete", "missing"]).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::NotFound);
        assert_eq!(store.repository().save_count(), 0);
    }

    #[test]
    fn blank_name_is_invalid_input() {
        let mut store = store();
        let err = run_args(&mut store, &["consultation", "add", "--name", " "]).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::InvalidInput);
    }

    #[test]
    fn payment_flag_toggles_and_sets() {
        let mut store = store();
        let id = run_args(
            &mut store,
            &["payment", "add", "--name", "Lee", "--amount", "90,000"],
        )
        .unwrap();
        let id = id.trim();

        run_args(&mut store, &["payment", "flag", id, "journal"]).unwrap();
        run_args(&mut store, &["payment", "flag", id, "clbiz", "--set", "true"]).unwrap();

        let report = store.day_report(today());
        assert!(report.payments[0].is_journal);
        assert!(report.payments[0].is_clbiz);
        assert_eq!(report.totals.revenue, 90_000);
    }

    #[test]
    fn search_and_suggest_read_history() {
        let mut store = store();
        run_args(
            &mut store,
            &[
                "payment", "add", "--date", "2024-01-02", "--name", "Kim Minji", "--part",
                "piano", "--lesson-type", "monthly", "--amount", "200000",
            ],
        )
        .unwrap();

        let hits = run_args(&mut store, &["search", "payments", "minji"]).unwrap();
        assert!(hits.starts_with("2024-01-02"));

        let suggestion = run_args(&mut store, &["suggest", "Kim"]).unwrap();
        assert_eq!(suggestion.trim(), "piano monthly 200,000");

        let none = run_args(&mut store, &["search", "expenses", "minji"]).unwrap();
        assert!(none.contains("검색 결과가 없습니다."));
    }

    #[test]
    fn report_json_is_valid() {
        let mut store = store();
        run_args(&mut store, &["notice", "new", "bring keys"]).unwrap();
        let json = run_args(&mut store, &["report", "--json"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["newNotice"], "bring keys");
        assert_eq!(value["date"], "2024-01-10");
    }

    #[test]
    fn summary_without_api_key_prints_failure_message() {
        let mut store = store();
        let output = run_args(&mut store, &["summary"]).unwrap();
        assert_eq!(output.trim(), SUMMARY_FAILURE_MESSAGE);
        assert_eq!(store.repository().save_count(), 0);
    }
}
