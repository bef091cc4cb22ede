//! Progressive income tax from the bracket table.
//!
//! Brackets are scanned in ascending order and the first one whose limit
//! covers the taxable income applies in full:
//!
//! ```text
//! tax = taxable_income × rate − deduction
//! ```
//!
//! The deduction constant of each bracket already accounts for every lower
//! bracket, so lower-bracket contributions are never summed.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use netpay_core::RateSchedule;
//! use netpay_core::calculations::IncomeTaxWorksheet;
//!
//! let schedule = RateSchedule::default();
//! let worksheet = IncomeTaxWorksheet::new(&schedule.tax_brackets);
//!
//! // 29,344,516 × 15% − 1,260,000
//! assert_eq!(worksheet.calculate(dec!(29344516)), dec!(3141677.40));
//! ```

use rust_decimal::Decimal;

use crate::TaxBracket;
use crate::calculations::common::{find_band, floor_at_zero};

/// Calculator for the bracket tax.
#[derive(Debug, Clone)]
pub struct IncomeTaxWorksheet<'a> {
    tax_brackets: &'a [TaxBracket],
}

impl<'a> IncomeTaxWorksheet<'a> {
    /// Creates a calculator over brackets sorted by ascending limit, ending
    /// with an unbounded bracket.
    pub fn new(tax_brackets: &'a [TaxBracket]) -> Self {
        Self { tax_brackets }
    }

    /// Calculates the tax on `taxable_income`, zero when there is none.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        find_band(self.tax_brackets, taxable_income).map_or(Decimal::ZERO, |bracket| {
            floor_at_zero(taxable_income * bracket.rate - bracket.deduction)
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::RateSchedule;

    fn brackets() -> Vec<TaxBracket> {
        RateSchedule::default().tax_brackets
    }

    #[test]
    fn calculate_returns_zero_for_zero_income() {
        let brackets = brackets();
        let worksheet = IncomeTaxWorksheet::new(&brackets);

        assert_eq!(worksheet.calculate(dec!(0)), dec!(0));
    }

    #[test]
    fn calculate_returns_zero_for_negative_income() {
        let brackets = brackets();
        let worksheet = IncomeTaxWorksheet::new(&brackets);

        assert_eq!(worksheet.calculate(dec!(-5000000)), dec!(0));
    }

    #[test]
    fn calculate_first_bracket() {
        let brackets = brackets();
        let worksheet = IncomeTaxWorksheet::new(&brackets);

        assert_eq!(worksheet.calculate(dec!(10000000)), dec!(600000));
    }

    #[test]
    fn calculate_third_bracket() {
        let brackets = brackets();
        let worksheet = IncomeTaxWorksheet::new(&brackets);

        // 60,000,000 × 24% − 5,760,000
        assert_eq!(worksheet.calculate(dec!(60000000)), dec!(8640000));
    }

    #[test]
    fn calculate_top_bracket() {
        let brackets = brackets();
        let worksheet = IncomeTaxWorksheet::new(&brackets);

        // 2,000,000,000 × 45% − 65,940,000
        assert_eq!(worksheet.calculate(dec!(2000000000)), dec!(834060000));
    }

    #[test]
    fn calculate_uses_lower_bracket_at_its_limit() {
        let brackets = brackets();
        let worksheet = IncomeTaxWorksheet::new(&brackets);

        assert_eq!(worksheet.calculate(dec!(14000000)), dec!(840000));
    }

    #[test]
    fn calculate_is_continuous_across_every_boundary() {
        let brackets = brackets();
        let worksheet = IncomeTaxWorksheet::new(&brackets);

        for pair in brackets.windows(2) {
            let limit = pair[0].limit.unwrap();

            let below = worksheet.calculate(limit) - worksheet.calculate(limit - dec!(1));
            let above = worksheet.calculate(limit + dec!(1)) - worksheet.calculate(limit);

            assert_eq!(below, pair[0].rate, "step into {limit}");
            assert_eq!(above, pair[1].rate, "step past {limit}");
        }
    }

    #[test]
    fn calculate_without_brackets_is_zero() {
        let worksheet = IncomeTaxWorksheet::new(&[]);

        assert_eq!(worksheet.calculate(dec!(10000000)), dec!(0));
    }
}
