//! Decimal parsing, rounding, and formatting helpers shared by the engine and adapters.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for currency amounts.
pub const CENT_PLACES: u32 = 2;

/// Largest magnitude stored for any budget, unit cost, or quantity (1e15).
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

pub fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT)
}

/// `Some(value)` while `|value| <= MAX_AMOUNT`.
pub fn bounded(value: Decimal) -> Option<Decimal> {
    (value.abs() <= max_amount()).then_some(value)
}

/// Parses free-form numeric input such as `1,250`, `$3.5`, or `2e6`.
///
/// Currency symbols, grouping commas, underscores, and whitespace are ignored.
/// Returns `None` when nothing numeric remains.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | '_') && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Like [`parse_decimal`], but amounts beyond [`MAX_AMOUNT`] count as unparseable.
pub fn parse_bounded(raw: &str) -> Option<Decimal> {
    parse_decimal(raw).and_then(bounded)
}

/// Parses numeric input, substituting zero for anything unparseable.
pub fn parse_or_zero(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Truncates a quantity to a whole, non-negative unit count.
pub fn floor_quantity(value: Decimal) -> Decimal {
    value.floor().max(Decimal::ZERO)
}

/// Rounds half away from zero to whole cents.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a value with a fixed number of decimals and `,` digit grouping.
pub fn format_number(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let body = format!("{:.*}", places as usize, rounded.abs());
    let grouped = match body.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_digits(int_part, ','), frac),
        None => group_digits(&body, ','),
    };
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a dollar amount such as `$1,234.56`.
pub fn format_currency(value: Decimal) -> String {
    let body = format_number(value.abs(), CENT_PLACES);
    if value.is_sign_negative() && !round_cents(value).is_zero() {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Formats a unit count as a grouped integer such as `12,000`.
pub fn format_quantity(value: Decimal) -> String {
    format_number(value.trunc(), 0)
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
