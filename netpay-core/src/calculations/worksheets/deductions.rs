//! Income deduction worksheet.
//!
//! Reduces annual taxable pay to taxable income before the bracket tax.
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Total pay (annual taxable pay) |
//! | 2    | Earned-income deduction from the cumulative band table |
//! | 3    | Earned income: Line 1 − Line 2 |
//! | 4    | Personal deduction: per-dependent amount × dependents |
//! | 5    | Pension deduction: monthly pension × 12 |
//! | 6    | Insurance deduction: (health + long-term care + employment) × 12 |
//! | 7    | Card usage deduction (above 25% of Line 1, capped by income band) |
//! | 8    | Housing savings deduction (only at or below the income limit) |
//! | 9    | Mortgage interest deduction (capped) |
//! | 10   | Total deductions: Lines 4 through 9 |
//! | 11   | Taxable income: Line 3 − Line 10, minimum 0 |
//!
//! Line 11 is computed by the engine's settlement step so that the same
//! earned income can be settled against different deduction sets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{find_band, floor_at_zero};
use crate::calculations::worksheets::SocialInsurancePremiums;
use crate::{DeductionRules, EarnedIncomeBand, TaxInput};

/// Annual income deductions applied after the earned-income deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeDeductions {
    /// Line 4.
    pub personal: Decimal,
    /// Line 5.
    pub pension: Decimal,
    /// Line 6.
    pub insurance: Decimal,
    /// Line 7.
    pub card: Decimal,
    /// Line 8.
    pub housing: Decimal,
    /// Line 9.
    pub mortgage: Decimal,
}

impl IncomeDeductions {
    /// Line 10.
    pub fn total(&self) -> Decimal {
        self.personal + self.pension + self.insurance + self.card + self.housing + self.mortgage
    }

    /// The same deductions with the year-end settlement items removed.
    pub fn without_advanced(&self) -> Self {
        Self {
            card: Decimal::ZERO,
            housing: Decimal::ZERO,
            mortgage: Decimal::ZERO,
            ..*self
        }
    }
}

/// Calculator for the income deduction worksheet.
#[derive(Debug, Clone)]
pub struct IncomeDeductionWorksheet<'a> {
    earned_income_bands: &'a [EarnedIncomeBand],
    rules: &'a DeductionRules,
}

impl<'a> IncomeDeductionWorksheet<'a> {
    pub fn new(
        earned_income_bands: &'a [EarnedIncomeBand],
        rules: &'a DeductionRules,
    ) -> Self {
        Self {
            earned_income_bands,
            rules,
        }
    }

    /// Calculates Lines 4 through 9 for a sanitized input.
    pub fn calculate(
        &self,
        input: &TaxInput,
        total_pay: Decimal,
        premiums: &SocialInsurancePremiums,
    ) -> IncomeDeductions {
        IncomeDeductions {
            personal: self.personal_deduction(input.dependent_count),
            pension: premiums.pension * Decimal::from(12),
            insurance: premiums.non_pension() * Decimal::from(12),
            card: self.card_deduction(
                total_pay,
                input.credit_card_annual,
                input.debit_card_annual,
            ),
            housing: self.housing_deduction(total_pay, input.housing_savings_annual),
            mortgage: self.mortgage_deduction(input.mortgage_interest_annual),
        }
    }

    /// Earned-income deduction (Line 2).
    ///
    /// Bands are cumulative: each band's base is the deduction at its lower
    /// edge, and only pay above that edge uses the band's rate.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use netpay_core::RateSchedule;
    /// use netpay_core::calculations::IncomeDeductionWorksheet;
    ///
    /// let schedule = RateSchedule::default();
    /// let worksheet =
    ///     IncomeDeductionWorksheet::new(&schedule.earned_income_bands, &schedule.deductions);
    ///
    /// // 12,000,000 + (47,600,000 − 45,000,000) × 5%
    /// assert_eq!(worksheet.earned_income_deduction(dec!(47600000)), dec!(12130000));
    /// ```
    pub fn earned_income_deduction(
        &self,
        total_pay: Decimal,
    ) -> Decimal {
        find_band(self.earned_income_bands, total_pay).map_or(Decimal::ZERO, |band| {
            band.base + (total_pay - band.lower) * band.rate
        })
    }

    /// Line 4.
    fn personal_deduction(
        &self,
        dependent_count: u32,
    ) -> Decimal {
        self.rules.personal_per_dependent * Decimal::from(dependent_count)
    }

    /// Card usage deduction (Line 7).
    ///
    /// Usage up to the threshold earns nothing. Credit card spending is
    /// counted against the threshold first, so debit spending earns its
    /// higher rate whenever credit spending alone already clears it.
    fn card_deduction(
        &self,
        total_pay: Decimal,
        credit: Decimal,
        debit: Decimal,
    ) -> Decimal {
        let threshold = total_pay * self.rules.card_threshold_ratio;
        if credit + debit <= threshold {
            if !(credit + debit).is_zero() {
                debug!(
                    usage = %(credit + debit),
                    threshold = %threshold,
                    "card usage does not exceed threshold; no card deduction"
                );
            }
            return Decimal::ZERO;
        }

        let deduction = if credit >= threshold {
            (credit - threshold) * self.rules.credit_card_rate + debit * self.rules.debit_card_rate
        } else {
            floor_at_zero(debit - (threshold - credit)) * self.rules.debit_card_rate
        };

        let cap = find_band(&self.rules.card_caps, total_pay).map_or(Decimal::ZERO, |b| b.cap);
        floor_at_zero(deduction).min(cap)
    }

    /// Housing savings deduction (Line 8).
    fn housing_deduction(
        &self,
        total_pay: Decimal,
        housing_savings: Decimal,
    ) -> Decimal {
        if housing_savings.is_zero() {
            return Decimal::ZERO;
        }
        if total_pay > self.rules.housing_income_limit {
            debug!(
                total_pay = %total_pay,
                limit = %self.rules.housing_income_limit,
                "total pay above housing savings limit; no housing deduction"
            );
            return Decimal::ZERO;
        }
        housing_savings.min(self.rules.housing_savings_cap) * self.rules.housing_rate
    }

    /// Mortgage interest deduction (Line 9).
    fn mortgage_deduction(
        &self,
        mortgage_interest: Decimal,
    ) -> Decimal {
        mortgage_interest.min(self.rules.mortgage_cap)
    }
}
