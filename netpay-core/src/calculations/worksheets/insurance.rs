//! Social insurance premium worksheet.
//!
//! Computes the employee's share of the four mandatory monthly premiums from
//! monthly taxable pay.
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Monthly taxable pay |
//! | 2    | Pension base: Line 1 clamped to the pension floor and ceiling |
//! | 3    | National pension: Line 2 × pension rate |
//! | 4    | Health insurance: Line 1 × health rate |
//! | 5    | Long-term care: Line 4 × long-term care ratio |
//! | 6    | Employment insurance: Line 1 × employment rate |
//! | 7    | Total premiums: Lines 3 through 6 |
//!
//! Each premium is rounded to a whole won independently, and Line 5 uses the
//! rounded health premium.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use netpay_core::SocialInsuranceRates;
//! use netpay_core::calculations::SocialInsuranceWorksheet;
//!
//! let rates = SocialInsuranceRates::default();
//! let premiums = SocialInsuranceWorksheet::new(&rates).calculate(dec!(3000000));
//!
//! assert_eq!(premiums.pension, dec!(142500));
//! assert_eq!(premiums.health, dec!(107850));
//! assert_eq!(premiums.long_term_care, dec!(14171));
//! assert_eq!(premiums.employment, dec!(27000));
//! assert_eq!(premiums.total, dec!(291521));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SocialInsuranceRates;
use crate::calculations::common::round_won;

/// Monthly premiums withheld from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialInsurancePremiums {
    /// National pension (Line 3).
    pub pension: Decimal,
    /// Health insurance (Line 4).
    pub health: Decimal,
    /// Long-term care insurance (Line 5).
    pub long_term_care: Decimal,
    /// Employment insurance (Line 6).
    pub employment: Decimal,
    /// Sum of the four premiums (Line 7).
    pub total: Decimal,
}

impl SocialInsurancePremiums {
    /// Premiums other than the pension, which are deducted as one group.
    pub fn non_pension(&self) -> Decimal {
        self.health + self.long_term_care + self.employment
    }
}

/// Calculator for the social insurance worksheet.
#[derive(Debug, Clone)]
pub struct SocialInsuranceWorksheet<'a> {
    rates: &'a SocialInsuranceRates,
}

impl<'a> SocialInsuranceWorksheet<'a> {
    pub fn new(rates: &'a SocialInsuranceRates) -> Self {
        Self { rates }
    }

    /// Calculates all premiums for the given monthly taxable pay.
    ///
    /// The pension floor applies even when taxable pay is zero. Callers with
    /// no salary at all skip the worksheet.
    pub fn calculate(
        &self,
        monthly_taxable: Decimal,
    ) -> SocialInsurancePremiums {
        let pension = self.pension(self.pension_base(monthly_taxable));
        let health = self.health(monthly_taxable);
        let long_term_care = self.long_term_care(health);
        let employment = self.employment(monthly_taxable);

        SocialInsurancePremiums {
            pension,
            health,
            long_term_care,
            employment,
            total: pension + health + long_term_care + employment,
        }
    }

    /// Clamps monthly pay to the pension floor and ceiling (Line 2).
    fn pension_base(
        &self,
        monthly_taxable: Decimal,
    ) -> Decimal {
        let base = monthly_taxable.clamp(self.rates.pension_min_base, self.rates.pension_max_base);
        if base != monthly_taxable {
            debug!(
                monthly_taxable = %monthly_taxable,
                pension_base = %base,
                "pension base clamped"
            );
        }
        base
    }

    /// Line 3.
    fn pension(
        &self,
        pension_base: Decimal,
    ) -> Decimal {
        round_won(pension_base * self.rates.pension_rate)
    }

    /// Line 4.
    fn health(
        &self,
        monthly_taxable: Decimal,
    ) -> Decimal {
        round_won(monthly_taxable * self.rates.health_rate)
    }

    /// Line 5, derived from the rounded health premium.
    fn long_term_care(
        &self,
        health: Decimal,
    ) -> Decimal {
        round_won(health * self.rates.long_term_care_ratio)
    }

    /// Line 6.
    fn employment(
        &self,
        monthly_taxable: Decimal,
    ) -> Decimal {
        round_won(monthly_taxable * self.rates.employment_rate)
    }
}
