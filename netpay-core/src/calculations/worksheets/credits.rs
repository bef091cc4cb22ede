//! Tax credit worksheet.
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Computed tax (bracket tax before credits) |
//! | 2    | Raw earned-income credit: 55% of Line 1 up to 1.3M, then 715,000 + 30% of the excess |
//! | 3    | Earned-income credit ceiling from total pay |
//! | 4    | Earned-income credit: smaller of Line 2 or Line 3 |
//! | 5    | Child credit |
//! | 6    | Medical credit: 15% of spending above 3% of total pay |
//! | 7    | Education credit: 15% of spending |
//! | 8    | Other credit: larger of the standard credit or Lines 6 + 7 |
//! | 9    | Total credits: Lines 4 + 5 + 8 |

use rust_decimal::Decimal;

use crate::CreditRules;
use crate::calculations::common::{find_band, floor_at_zero};

/// Calculator for the tax credit worksheet.
#[derive(Debug, Clone)]
pub struct TaxCreditWorksheet<'a> {
    rules: &'a CreditRules,
}

impl<'a> TaxCreditWorksheet<'a> {
    pub fn new(rules: &'a CreditRules) -> Self {
        Self { rules }
    }

    /// Earned-income tax credit (Line 4).
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use netpay_core::CreditRules;
    /// use netpay_core::calculations::TaxCreditWorksheet;
    ///
    /// let rules = CreditRules::default();
    /// let worksheet = TaxCreditWorksheet::new(&rules);
    ///
    /// // 55% of 1,000,000, under the 740,000 ceiling for low pay
    /// assert_eq!(worksheet.earned_income_credit(dec!(1000000), dec!(30000000)), dec!(550000));
    /// // ceiling for 47.6M pay is max(740,000 − 14.6M × 0.8%, 660,000)
    /// assert_eq!(worksheet.earned_income_credit(dec!(3141677.4), dec!(47600000)), dec!(660000));
    /// ```
    pub fn earned_income_credit(
        &self,
        computed_tax: Decimal,
        total_pay: Decimal,
    ) -> Decimal {
        self.raw_earned_income_credit(computed_tax)
            .min(self.earned_income_credit_cap(total_pay))
    }

    /// Line 2.
    fn raw_earned_income_credit(
        &self,
        computed_tax: Decimal,
    ) -> Decimal {
        let r = self.rules;
        if computed_tax <= r.earned_income_threshold {
            computed_tax * r.earned_income_low_rate
        } else {
            r.earned_income_base
                + (computed_tax - r.earned_income_threshold) * r.earned_income_high_rate
        }
    }

    /// Line 3: the band's starting ceiling, reduced linearly over the band,
    /// never below the band's floor.
    fn earned_income_credit_cap(
        &self,
        total_pay: Decimal,
    ) -> Decimal {
        find_band(&self.rules.earned_income_caps, total_pay).map_or(Decimal::ZERO, |band| {
            (band.start - (total_pay - band.lower) * band.slope).max(band.floor)
        })
    }

    /// Child credit (Line 5).
    pub fn child_credit(
        &self,
        child_count: u32,
    ) -> Decimal {
        let r = self.rules;
        match child_count {
            0 => Decimal::ZERO,
            1 => r.child_first,
            n => {
                r.child_first + r.child_second + r.child_additional * Decimal::from(n - 2)
            }
        }
    }

    /// Itemized medical and education credit (Lines 6 + 7).
    pub fn special_credit(
        &self,
        medical: Decimal,
        education: Decimal,
        total_pay: Decimal,
    ) -> Decimal {
        let medical_credit =
            floor_at_zero(medical - total_pay * self.rules.medical_threshold_ratio)
                * self.rules.medical_rate;
        let education_credit = education * self.rules.education_rate;
        medical_credit + education_credit
    }

    /// Other credit (Line 8), and whether the itemized credit was used.
    pub fn other_credit(
        &self,
        special_credit: Decimal,
    ) -> (Decimal, bool) {
        if special_credit > self.rules.standard_credit {
            (special_credit, true)
        } else {
            (self.rules.standard_credit, false)
        }
    }

    /// The flat credit used when nothing is itemized.
    pub fn standard_credit(&self) -> Decimal {
        self.rules.standard_credit
    }
}
