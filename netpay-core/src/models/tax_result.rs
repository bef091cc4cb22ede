use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Calendar days used for the daily net pay equivalent.
pub const DAYS_PER_MONTH: Decimal = dec!(30);

/// Statutory paid hours per month used for the hourly equivalent.
pub const HOURS_PER_MONTH: Decimal = dec!(209);

/// Itemized outcome of one net-pay calculation.
///
/// Monthly figures are per pay period; annual figures are per tax year. Every
/// deduction, credit, premium and tax field is non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Gross pay per month (`annual_salary / 12`).
    pub monthly_gross: Decimal,

    /// Annualized tax-free allowance.
    pub tax_free_annual: Decimal,

    /// Annual taxable pay after removing the retirement share and the
    /// tax-free allowance.
    pub total_pay: Decimal,

    /// Monthly taxable pay, the base for social insurance premiums.
    pub monthly_taxable: Decimal,

    /// `total_pay + tax_free_annual`, reported only when the salary bundles a
    /// retirement allowance.
    pub retirement_adjusted_annual: Option<Decimal>,

    // Social insurance, monthly
    pub pension: Decimal,
    pub health_insurance: Decimal,
    pub long_term_care: Decimal,
    pub employment_insurance: Decimal,
    pub insurance_total: Decimal,

    // Income deductions, annual
    pub earned_income_deduction: Decimal,
    pub personal_deduction: Decimal,
    pub pension_deduction: Decimal,
    pub insurance_deduction: Decimal,
    pub card_deduction: Decimal,
    pub housing_deduction: Decimal,
    pub mortgage_deduction: Decimal,
    /// Sum of every deduction except the earned-income deduction.
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,

    /// Bracket tax before credits.
    pub computed_tax: Decimal,

    // Tax credits, annual
    pub earned_income_credit: Decimal,
    pub child_credit: Decimal,
    /// Itemized medical plus education credit.
    pub special_credit: Decimal,
    /// The larger of the standard credit and `special_credit`.
    pub other_credit: Decimal,
    /// Whether the itemized credit beat the standard credit.
    pub used_itemized_credit: bool,
    pub total_credits: Decimal,

    /// Annual income tax after credits.
    pub final_tax: Decimal,
    pub monthly_income_tax: Decimal,
    pub monthly_local_tax: Decimal,

    /// Premiums plus income and local tax, per month.
    pub total_monthly_deduction: Decimal,
    pub monthly_net: Decimal,
    pub annual_net: Decimal,

    /// Share of gross salary withheld, in percent.
    pub effective_rate: Decimal,

    /// Estimated annual tax saved by the year-end settlement inputs.
    pub advanced_saving: Decimal,
}

impl TaxResult {
    /// Monthly net pay spread over a 30-day month.
    pub fn daily_net(&self) -> Decimal {
        self.monthly_net / DAYS_PER_MONTH
    }

    /// Monthly net pay spread over 209 paid hours.
    pub fn hourly_net(&self) -> Decimal {
        self.monthly_net / HOURS_PER_MONTH
    }

    /// Returns `true` when a card, housing or mortgage deduction applied.
    pub fn has_advanced_deductions(&self) -> bool {
        self.card_deduction > Decimal::ZERO
            || self.housing_deduction > Decimal::ZERO
            || self.mortgage_deduction > Decimal::ZERO
    }
}
