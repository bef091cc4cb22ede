use std::sync::LazyLock;

use netpay_core::calculations::common::round_won;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

static NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d]").expect("non-digit pattern is valid"));

/// Error returned when an amount field cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Keeps only the ASCII digits of `s`.
fn strip_non_digits(s: &str) -> String {
    NON_DIGIT.replace_all(s, "").into_owned()
}

/// Parses a won amount typed by a user.
///
/// Every non-digit character is dropped first, so separators, currency
/// suffixes and signs are ignored (`"3,000,000원"` is 3,000,000). Input with
/// no digits at all is treated as 0. Fails only when the digits overflow a
/// [`Decimal`].
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let digits = strip_non_digits(s);
    if digits.is_empty() {
        return Ok(Decimal::ZERO);
    }
    digits.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats an amount as whole won with `,` thousands separators.
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_won(value);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a percentage with one decimal place, e.g. `14.4%`.
pub fn format_rate(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    format!("{rounded}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_amount_strips_separators() {
        assert_eq!(parse_amount("50,000,000").unwrap(), dec!(50000000));
        assert_eq!(parse_amount("1,234,567").unwrap(), dec!(1234567));
    }

    #[test]
    fn parse_amount_strips_every_non_digit() {
        assert_eq!(parse_amount(" 200,000원 ").unwrap(), dec!(200000));
        assert_eq!(parse_amount("-3000").unwrap(), dec!(3000));
        assert_eq!(parse_amount("12.5").unwrap(), dec!(125));
    }

    #[test]
    fn parse_amount_empty_treated_as_zero() {
        assert_eq!(parse_amount("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("   ").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("abc").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_overflow_returns_error() {
        assert!(parse_amount("999999999999999999999999999999999").is_err());
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(0)), "0");
        assert_eq!(format_amount(dec!(999)), "999");
        assert_eq!(format_amount(dec!(1000)), "1,000");
        assert_eq!(format_amount(dec!(50000000)), "50,000,000");
        assert_eq!(format_amount(dec!(123456789)), "123,456,789");
    }

    #[test]
    fn format_amount_rounds_to_whole_won() {
        assert_eq!(format_amount(dec!(3565639.67)), "3,565,640");
        assert_eq!(format_amount(dec!(118854.4)), "118,854");
        assert_eq!(format_amount(dec!(0.4)), "0");
    }

    #[test]
    fn format_amount_keeps_sign() {
        assert_eq!(format_amount(dec!(-1234567)), "-1,234,567");
        assert_eq!(format_amount(dec!(-0.2)), "0");
    }

    #[test]
    fn format_rate_uses_one_decimal_place() {
        assert_eq!(format_rate(dec!(14.424648)), "14.4%");
        assert_eq!(format_rate(dec!(14.45)), "14.5%");
        assert_eq!(format_rate(dec!(0)), "0.0%");
        assert_eq!(format_rate(dec!(20)), "20.0%");
    }
}
