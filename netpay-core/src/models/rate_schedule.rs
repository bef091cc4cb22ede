//! Statutory rates and lookup tables for one tax year.
//!
//! [`RateSchedule::default`] carries the 2026 payroll rules. Every struct here
//! uses container-level `#[serde(default)]`, so a configuration file only has
//! to name the values it wants to change:
//!
//! ```
//! use rust_decimal_macros::dec;
//! use netpay_core::RateSchedule;
//!
//! let schedule: RateSchedule = toml::from_str(
//!     r#"
//!     [social_insurance]
//!     health_rate = "0.04"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(schedule.social_insurance.health_rate, dec!(0.04));
//! assert_eq!(schedule.social_insurance.pension_rate, dec!(0.0475));
//! assert_eq!(schedule.tax_brackets.len(), 8);
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tax_bracket::{Banded, CardCapBand, CreditCapBand, EarnedIncomeBand, TaxBracket};
use super::tax_input::MAX_AMOUNT;

/// Errors reported by [`RateSchedule::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateScheduleError {
    /// A rate or ratio must lie in `[0, 1]`.
    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidRate { field: &'static str, value: Decimal },

    /// A currency amount must be non-negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A currency amount may not exceed [`MAX_AMOUNT`].
    #[error("{field} must not exceed {max}, got {value}")]
    AmountTooLarge {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },

    /// The pension floor exceeds the pension ceiling.
    #[error("pension minimum base {min} exceeds maximum base {max}")]
    InvalidPensionBase { min: Decimal, max: Decimal },

    /// A lookup table has no rows.
    #[error("{table} table is empty")]
    EmptyTable { table: &'static str },

    /// Row limits must be strictly increasing, with only the last row unbounded.
    #[error("{table} table is out of order at row {row}")]
    UnorderedTable { table: &'static str, row: usize },

    /// The last row must be unbounded so every value finds a row.
    #[error("{table} table does not end with an unbounded row")]
    MissingUnboundedRow { table: &'static str },
}

/// Monthly social insurance premium rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialInsuranceRates {
    /// Employee share of the national pension contribution.
    pub pension_rate: Decimal,
    /// Monthly pay below this is treated as this amount for pension purposes.
    pub pension_min_base: Decimal,
    /// Monthly pay above this is ignored for pension purposes.
    pub pension_max_base: Decimal,
    /// Employee share of the health insurance premium.
    pub health_rate: Decimal,
    /// Long-term care premium as a fraction of the health premium.
    pub long_term_care_ratio: Decimal,
    /// Employee share of the employment insurance premium.
    pub employment_rate: Decimal,
}

/// Income deduction rules applied before the bracket tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionRules {
    pub personal_per_dependent: Decimal,
    /// Card usage must exceed this share of total pay before any deduction.
    pub card_threshold_ratio: Decimal,
    pub credit_card_rate: Decimal,
    pub debit_card_rate: Decimal,
    pub card_caps: Vec<CardCapBand>,
    /// Housing savings are only deductible at or below this total pay.
    pub housing_income_limit: Decimal,
    pub housing_savings_cap: Decimal,
    pub housing_rate: Decimal,
    pub mortgage_cap: Decimal,
}

/// Tax credit rules applied after the bracket tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditRules {
    /// Computed tax up to which the low earned-income credit rate applies.
    pub earned_income_threshold: Decimal,
    pub earned_income_low_rate: Decimal,
    /// Credit at the threshold; the high rate applies to tax above it.
    pub earned_income_base: Decimal,
    pub earned_income_high_rate: Decimal,
    pub earned_income_caps: Vec<CreditCapBand>,
    pub child_first: Decimal,
    pub child_second: Decimal,
    /// Credit for each child beyond the second.
    pub child_additional: Decimal,
    /// Medical spending below this share of total pay earns no credit.
    pub medical_threshold_ratio: Decimal,
    pub medical_rate: Decimal,
    pub education_rate: Decimal,
    /// Flat credit granted when itemized medical and education credits are smaller.
    pub standard_credit: Decimal,
    /// Local income tax as a fraction of the monthly income tax.
    pub local_tax_ratio: Decimal,
}

/// Complete rate schedule driving a [`TaxEngine`](crate::calculations::TaxEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSchedule {
    pub tax_year: i32,
    pub social_insurance: SocialInsuranceRates,
    pub tax_brackets: Vec<TaxBracket>,
    pub earned_income_bands: Vec<EarnedIncomeBand>,
    pub deductions: DeductionRules,
    pub credits: CreditRules,
}

impl Default for SocialInsuranceRates {
    fn default() -> Self {
        Self {
            pension_rate: dec!(0.0475),
            pension_min_base: dec!(390000),
            pension_max_base: dec!(6370000),
            health_rate: dec!(0.03595),
            long_term_care_ratio: dec!(0.1314),
            employment_rate: dec!(0.009),
        }
    }
}

impl Default for DeductionRules {
    fn default() -> Self {
        Self {
            personal_per_dependent: dec!(1500000),
            card_threshold_ratio: dec!(0.25),
            credit_card_rate: dec!(0.15),
            debit_card_rate: dec!(0.30),
            card_caps: vec![
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
            ],
            housing_income_limit: dec!(70000000),
            housing_savings_cap: dec!(3000000),
            housing_rate: dec!(0.4),
            mortgage_cap: dec!(18000000),
        }
    }
}

impl Default for CreditRules {
    fn default() -> Self {
        Self {
            earned_income_threshold: dec!(1300000),
            earned_income_low_rate: dec!(0.55),
            earned_income_base: dec!(715000),
            earned_income_high_rate: dec!(0.30),
            earned_income_caps: vec![
                CreditCapBand {
                    limit: Some(dec!(33000000)),
                    lower: dec!(0),
                    start: dec!(740000),
                    slope: dec!(0),
                    floor: dec!(740000),
                },
                CreditCapBand {
                    limit: Some(dec!(70000000)),
                    lower: dec!(33000000),
                    start: dec!(740000),
                    slope: dec!(0.008),
                    floor: dec!(660000),
                },
                CreditCapBand {
                    limit: Some(dec!(120000000)),
                    lower: dec!(70000000),
                    start: dec!(660000),
                    slope: dec!(0.5),
                    floor: dec!(500000),
                },
                CreditCapBand {
                    limit: None,
                    lower: dec!(120000000),
                    start: dec!(500000),
                    slope: dec!(0.5),
                    floor: dec!(200000),
                },
            ],
            child_first: dec!(150000),
            child_second: dec!(150000),
            child_additional: dec!(300000),
            medical_threshold_ratio: dec!(0.03),
            medical_rate: dec!(0.15),
            education_rate: dec!(0.15),
            standard_credit: dec!(130000),
            local_tax_ratio: dec!(0.1),
        }
    }
}

impl Default for RateSchedule {
    /// The 2026 rules.
    fn default() -> Self {
        Self {
            tax_year: 2026,
            social_insurance: SocialInsuranceRates::default(),
            tax_brackets: default_tax_brackets(),
            earned_income_bands: default_earned_income_bands(),
            deductions: DeductionRules::default(),
            credits: CreditRules::default(),
        }
    }
}

fn default_tax_brackets() -> Vec<TaxBracket> {
    [
        (Some(dec!(14000000)), dec!(0.06), dec!(0)),
        (Some(dec!(50000000)), dec!(0.15), dec!(1260000)),
        (Some(dec!(88000000)), dec!(0.24), dec!(5760000)),
        (Some(dec!(150000000)), dec!(0.35), dec!(15440000)),
        (Some(dec!(300000000)), dec!(0.38), dec!(19940000)),
        (Some(dec!(500000000)), dec!(0.40), dec!(25940000)),
        (Some(dec!(1000000000)), dec!(0.42), dec!(35940000)),
        (None, dec!(0.45), dec!(65940000)),
    ]
    .into_iter()
    .map(|(limit, rate, deduction)| TaxBracket {
        limit,
        rate,
        deduction,
    })
    .collect()
}

fn default_earned_income_bands() -> Vec<EarnedIncomeBand> {
    [
        (Some(dec!(5000000)), dec!(0), dec!(0), dec!(0.7)),
        (Some(dec!(15000000)), dec!(5000000), dec!(3500000), dec!(0.4)),
        (Some(dec!(45000000)), dec!(15000000), dec!(7500000), dec!(0.15)),
        (Some(dec!(100000000)), dec!(45000000), dec!(12000000), dec!(0.05)),
        (None, dec!(100000000), dec!(14750000), dec!(0.02)),
    ]
    .into_iter()
    .map(|(limit, lower, base, rate)| EarnedIncomeBand {
        limit,
        lower,
        base,
        rate,
    })
    .collect()
}

impl RateSchedule {
    /// Validates every rate, amount and lookup table.
    ///
    /// # Errors
    ///
    /// Returns the first [`RateScheduleError`] found, checking social
    /// insurance first, then the tables, then deduction and credit rules.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use netpay_core::{RateSchedule, RateScheduleError};
    ///
    /// let mut schedule = RateSchedule::default();
    /// schedule.social_insurance.health_rate = dec!(1.2);
    ///
    /// assert_eq!(
    ///     schedule.validate(),
    ///     Err(RateScheduleError::InvalidRate {
    ///         field: "social_insurance.health_rate",
    ///         value: dec!(1.2),
    ///     })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), RateScheduleError> {
        let si = &self.social_insurance;
        check_rate("social_insurance.pension_rate", si.pension_rate)?;
        check_rate("social_insurance.health_rate", si.health_rate)?;
        check_rate("social_insurance.long_term_care_ratio", si.long_term_care_ratio)?;
        check_rate("social_insurance.employment_rate", si.employment_rate)?;
        check_amount("social_insurance.pension_min_base", si.pension_min_base)?;
        check_amount("social_insurance.pension_max_base", si.pension_max_base)?;
        if si.pension_min_base > si.pension_max_base {
            return Err(RateScheduleError::InvalidPensionBase {
                min: si.pension_min_base,
                max: si.pension_max_base,
            });
        }

        check_table("tax_brackets", &self.tax_brackets)?;
        for bracket in &self.tax_brackets {
            check_rate("tax_brackets.rate", bracket.rate)?;
            check_amount("tax_brackets.deduction", bracket.deduction)?;
        }

        check_table("earned_income_bands", &self.earned_income_bands)?;
        for band in &self.earned_income_bands {
            check_rate("earned_income_bands.rate", band.rate)?;
            check_amount("earned_income_bands.lower", band.lower)?;
            check_amount("earned_income_bands.base", band.base)?;
        }

        let d = &self.deductions;
        check_amount("deductions.personal_per_dependent", d.personal_per_dependent)?;
        check_rate("deductions.card_threshold_ratio", d.card_threshold_ratio)?;
        check_rate("deductions.credit_card_rate", d.credit_card_rate)?;
        check_rate("deductions.debit_card_rate", d.debit_card_rate)?;
        check_table("deductions.card_caps", &d.card_caps)?;
        for band in &d.card_caps {
            check_amount("deductions.card_caps.cap", band.cap)?;
        }
        check_amount("deductions.housing_income_limit", d.housing_income_limit)?;
        check_amount("deductions.housing_savings_cap", d.housing_savings_cap)?;
        check_rate("deductions.housing_rate", d.housing_rate)?;
        check_amount("deductions.mortgage_cap", d.mortgage_cap)?;

        let c = &self.credits;
        check_amount("credits.earned_income_threshold", c.earned_income_threshold)?;
        check_rate("credits.earned_income_low_rate", c.earned_income_low_rate)?;
        check_amount("credits.earned_income_base", c.earned_income_base)?;
        check_rate("credits.earned_income_high_rate", c.earned_income_high_rate)?;
        check_table("credits.earned_income_caps", &c.earned_income_caps)?;
        for band in &c.earned_income_caps {
            check_amount("credits.earned_income_caps.lower", band.lower)?;
            check_amount("credits.earned_income_caps.start", band.start)?;
            check_amount("credits.earned_income_caps.floor", band.floor)?;
            check_rate("credits.earned_income_caps.slope", band.slope)?;
        }
        check_amount("credits.child_first", c.child_first)?;
        check_amount("credits.child_second", c.child_second)?;
        check_amount("credits.child_additional", c.child_additional)?;
        check_rate("credits.medical_threshold_ratio", c.medical_threshold_ratio)?;
        check_rate("credits.medical_rate", c.medical_rate)?;
        check_rate("credits.education_rate", c.education_rate)?;
        check_amount("credits.standard_credit", c.standard_credit)?;
        check_rate("credits.local_tax_ratio", c.local_tax_ratio)?;

        Ok(())
    }
}

fn check_rate(
    field: &'static str,
    value: Decimal,
) -> Result<(), RateScheduleError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RateScheduleError::InvalidRate { field, value });
    }
    Ok(())
}

fn check_amount(
    field: &'static str,
    value: Decimal,
) -> Result<(), RateScheduleError> {
    if value < Decimal::ZERO {
        return Err(RateScheduleError::NegativeAmount { field, value });
    }
    if value > MAX_AMOUNT {
        return Err(RateScheduleError::AmountTooLarge {
            field,
            value,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

fn check_table<T: Banded>(
    table: &'static str,
    rows: &[T],
) -> Result<(), RateScheduleError> {
    let Some(last) = rows.last() else {
        return Err(RateScheduleError::EmptyTable { table });
    };
    if last.limit().is_some() {
        return Err(RateScheduleError::MissingUnboundedRow { table });
    }

    let mut previous: Option<Decimal> = None;
    for (row, entry) in rows[..rows.len() - 1].iter().enumerate() {
        let Some(limit) = entry.limit() else {
            return Err(RateScheduleError::UnorderedTable { table, row });
        };
        if previous.is_some_and(|p| limit <= p) {
            return Err(RateScheduleError::UnorderedTable { table, row });
        }
        previous = Some(limit);
    }
    Ok(())
}
