//! Plain-text and JSON rendering for stdout.

use juniper_core::format::{format_number_with_commas, format_won};
use juniper_core::{Dated, DayReport, Payment, PaymentSuggestion};
use serde::Serialize;
use std::io::Write;

use crate::errors::CliResult;

/// Writes `value` as one line of JSON.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_report<W: Write>(out: &mut W, report: &DayReport) -> CliResult<()> {
    writeln!(out, "{} ({})  담당자: {}", report.date, report.weekday, report.manager)?;

    writeln!(out, "\n[상담] {}", report.consultations.len())?;
    for hit in &report.consultations {
        let entry = &hit.item;
        writeln!(
            out,
            "  {}  {} {} {} - {}",
            entry.id, entry.name, entry.phone, entry.part, entry.content
        )?;
    }

    writeln!(out, "\n[체험레슨 예약] {}", report.reservations.len())?;
    for hit in &report.reservations {
        let entry = &hit.item;
        writeln!(
            out,
            "  {}  {} {} {} {} {}",
            entry.id, entry.date, entry.time, entry.name, entry.phone, entry.part
        )?;
    }

    writeln!(out, "\n[첫 레슨] {}", report.first_lessons.len())?;
    for hit in &report.first_lessons {
        let entry = &hit.item;
        writeln!(
            out,
            "  {}  {} {} {} {} 결제[{}] 서류[{}]",
            entry.booking.id,
            entry.booking.date,
            entry.booking.time,
            entry.booking.name,
            entry.booking.part,
            check(entry.is_paid),
            check(entry.is_form_submitted)
        )?;
    }

    writeln!(out, "\n[결제] {}", report.payments.len())?;
    for payment in &report.payments {
        write_payment_line(out, payment)?;
    }

    writeln!(out, "\n[지출] {}", report.expenses.len())?;
    for expense in &report.expenses {
        writeln!(
            out,
            "  {}  {} {}",
            expense.id,
            format_won(to_signed(expense.amount)),
            expense.description
        )?;
    }

    writeln!(out, "\n[장보기]")?;
    for item in &report.shopping_list {
        writeln!(out, "  {}  [{}] {}", item.id, check(item.completed), item.text)?;
    }

    writeln!(out, "\n[고정 공지]\n{}", report.fixed_notice)?;
    writeln!(out, "\n[전달사항]\n{}", report.new_notice)?;

    writeln!(
        out,
        "\n매출 {}  지출 {}  순이익 {}",
        format_won(to_signed(report.totals.revenue)),
        format_won(to_signed(report.totals.expenses)),
        format_won(report.totals.net)
    )?;
    Ok(())
}

fn write_payment_line<W: Write>(out: &mut W, payment: &Payment) -> CliResult<()> {
    writeln!(
        out,
        "  {}  {} {} {} {} {} 클비즈[{}] 일지[{}]",
        payment.id,
        payment.name,
        payment.part,
        payment.lesson_type,
        format_won(to_signed(payment.amount)),
        payment.method,
        check(payment.is_clbiz),
        check(payment.is_journal)
    )?;
    Ok(())
}

/// Writes search hits as `date  fields...` lines, using `describe` for the
/// entry text.
pub fn write_hits<W, T, F>(out: &mut W, hits: &[Dated<T>], describe: F) -> CliResult<()>
where
    W: Write,
    F: Fn(&T) -> String,
{
    if hits.is_empty() {
        writeln!(out, "검색 결과가 없습니다.")?;
        return Ok(());
    }
    for hit in hits {
        writeln!(out, "{}  {}", hit.date, describe(&hit.item))?;
    }
    Ok(())
}

pub fn write_suggestion<W: Write>(
    out: &mut W,
    suggestion: Option<&PaymentSuggestion>,
) -> CliResult<()> {
    match suggestion {
        Some(suggestion) => writeln!(
            out,
            "{} {} {}",
            suggestion.part,
            suggestion.lesson_type,
            format_number_with_commas(&suggestion.amount.to_string())
        )?,
        None => writeln!(out, "이전 결제 내역이 없습니다.")?,
    }
    Ok(())
}

fn check(value: bool) -> &'static str {
    if value {
        "x"
    } else {
        " "
    }
}

fn to_signed(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}
