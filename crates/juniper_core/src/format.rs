//! Display and input formatting helpers.
//!
//! Phone numbers follow the Korean mobile grouping `010-XXXX-XXXX`; money is
//! whole won with thousands separators.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

// ASCII only: fullwidth IME digits are not phone or amount digits.
static NON_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]").expect("valid non-digit regex"));

/// First and last bookable lesson hours.
const FIRST_SLOT_HOUR: u32 = 9;
const LAST_SLOT_HOUR: u32 = 22;

/// Amount text that is not a whole number of won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAmount(pub String);

impl Display for InvalidAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid amount `{}`; expected digits with optional commas", self.0)
    }
}

impl Error for InvalidAmount {}

fn digits_only(value: &str) -> String {
    NON_DIGIT_RE.replace_all(value, "").into_owned()
}

/// Groups the digits of `value` as `XXX-XXXX-XXXX`.
///
/// Up to three digits are returned as-is, four to seven digits become
/// `XXX-XXXX`, and anything beyond eleven digits is dropped.
pub fn format_phone_number(value: &str) -> String {
    let digits = digits_only(value);
    match digits.len() {
        0..=3 => digits,
        4..=7 => format!("{}-{}", &digits[..3], &digits[3..]),
        len => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..len.min(11)]),
    }
}

/// Keeps only digits and inserts thousands separators: `"1500000"` →
/// `"1,500,000"`.
pub fn format_number_with_commas(value: &str) -> String {
    let digits = digits_only(value);
    let count = digits.chars().count();
    let mut grouped = String::with_capacity(count + count / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (count - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Parses amount input such as `"150,000"`.
pub fn parse_formatted_number(value: &str) -> Result<u64, InvalidAmount> {
    let cleaned = value.trim().replace(',', "");
    if cleaned.is_empty() || !cleaned.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(InvalidAmount(value.to_string()));
    }
    cleaned
        .parse::<u64>()
        .map_err(|_| InvalidAmount(value.to_string()))
}

/// Renders won with a currency sign: `₩1,234`, `-₩1,234`.
pub fn format_won(amount: i64) -> String {
    let grouped = format_number_with_commas(&amount.unsigned_abs().to_string());
    if amount < 0 {
        format!("-₩{grouped}")
    } else {
        format!("₩{grouped}")
    }
}

/// Bookable lesson start times, every 30 minutes from 09:00 to 22:30.
pub fn time_slots() -> Vec<String> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .flat_map(|hour| [format!("{hour:02}:00"), format!("{hour:02}:30")])
        .collect()
}
