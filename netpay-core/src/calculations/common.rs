//! Common utility functions for net-pay calculations.
//!
//! This module provides shared functionality used across the worksheets,
//! including whole-won rounding, zero floors and lookup-table scans.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Banded;

/// Rounds a decimal value to a whole won using half-up rounding.
///
/// Values at exactly 0.5 are rounded away from zero, so positive amounts
/// round the same way a payroll office rounds premiums.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use netpay_core::calculations::common::round_won;
///
/// assert_eq!(round_won(dec!(188416.4)), dec!(188416));
/// assert_eq!(round_won(dec!(188416.5)), dec!(188417));
/// assert_eq!(round_won(dec!(18737.9028)), dec!(18738));
/// ```
pub fn round_won(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value`, or zero if it is negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use netpay_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-100)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(100)), dec!(100));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Finds the first row of an ascending table whose limit covers `value`.
///
/// Returns `None` only for a table without an unbounded last row, which
/// [`RateSchedule::validate`](crate::RateSchedule::validate) rejects.
pub fn find_band<T: Banded>(
    rows: &[T],
    value: Decimal,
) -> Option<&T> {
    rows.iter().find(|row| row.contains(value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::CardCapBand;

    // =========================================================================
    // round_won tests
    // =========================================================================

    #[test]
    fn round_won_rounds_down_below_midpoint() {
        let result = round_won(dec!(142601.49));

        assert_eq!(result, dec!(142601));
    }

    #[test]
    fn round_won_rounds_up_at_midpoint() {
        let result = round_won(dec!(142601.5));

        assert_eq!(result, dec!(142602));
    }

    #[test]
    fn round_won_rounds_up_above_midpoint() {
        let result = round_won(dec!(142601.6667));

        assert_eq!(result, dec!(142602));
    }

    #[test]
    fn round_won_preserves_whole_values() {
        let result = round_won(dec!(35700));

        assert_eq!(result, dec!(35700));
    }

    #[test]
    fn round_won_handles_zero() {
        let result = round_won(dec!(0));

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn round_won_absorbs_division_noise() {
        // 47,600,000 / 12 × 0.009 carries a trailing digit from the division
        let result = round_won(dec!(47600000) / dec!(12) * dec!(0.009));

        assert_eq!(result, dec!(35700));
    }

    // =========================================================================
    // floor_at_zero tests
    // =========================================================================

    #[test]
    fn floor_at_zero_clamps_negative_values() {
        let result = floor_at_zero(dec!(-0.01));

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn floor_at_zero_passes_positive_values() {
        let result = floor_at_zero(dec!(1260000));

        assert_eq!(result, dec!(1260000));
    }

    // =========================================================================
    // find_band tests
    // =========================================================================

    fn caps() -> Vec<CardCapBand> {
        vec![
            CardCapBand {
                limit: Some(dec!(70000000)),
                cap: dec!(3000000),
            },
            CardCapBand {
                limit: Some(dec!(120000000)),
                cap: dec!(2500000),
            },
            CardCapBand {
                limit: None,
                cap: dec!(2000000),
            },
        ]
    }

    #[test]
    fn find_band_picks_first_covering_row() {
        let rows = caps();

        assert_eq!(find_band(&rows, dec!(0)).map(|b| b.cap), Some(dec!(3000000)));
        assert_eq!(
            find_band(&rows, dec!(70000000)).map(|b| b.cap),
            Some(dec!(3000000))
        );
        assert_eq!(
            find_band(&rows, dec!(70000001)).map(|b| b.cap),
            Some(dec!(2500000))
        );
    }

    #[test]
    fn find_band_falls_through_to_unbounded_row() {
        let rows = caps();

        assert_eq!(
            find_band(&rows, dec!(5000000000)).map(|b| b.cap),
            Some(dec!(2000000))
        );
    }

    #[test]
    fn find_band_returns_none_without_unbounded_row() {
        let rows = &caps()[..2];

        assert!(find_band(rows, dec!(130000000)).is_none());
    }
}
