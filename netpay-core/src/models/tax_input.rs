use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest accepted currency amount (one quadrillion won).
///
/// Larger inputs are clamped so intermediate products stay well inside
/// [`Decimal`] range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Inputs to one net-pay calculation. All amounts are in won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    /// Gross annual salary.
    pub annual_salary: Decimal,

    /// Whether `annual_salary` bundles a 13th-month retirement allowance.
    pub retirement_included: bool,

    /// Household dependents including the filer (at least 1).
    pub dependent_count: u32,

    /// Dependents under the qualifying age for the child credit.
    pub child_count: u32,

    /// Non-taxable monthly allowance (meals, transport).
    pub monthly_tax_free_allowance: Decimal,

    // Year-end settlement inputs, all annual.
    pub credit_card_annual: Decimal,
    pub debit_card_annual: Decimal,
    pub housing_savings_annual: Decimal,
    pub mortgage_interest_annual: Decimal,
    pub medical_annual: Decimal,
    pub education_annual: Decimal,
}

impl Default for TaxInput {
    fn default() -> Self {
        Self {
            annual_salary: Decimal::ZERO,
            retirement_included: false,
            dependent_count: 1,
            child_count: 0,
            monthly_tax_free_allowance: Decimal::ZERO,
            credit_card_annual: Decimal::ZERO,
            debit_card_annual: Decimal::ZERO,
            housing_savings_annual: Decimal::ZERO,
            mortgage_interest_annual: Decimal::ZERO,
            medical_annual: Decimal::ZERO,
            education_annual: Decimal::ZERO,
        }
    }
}

impl TaxInput {
    /// Creates an input with the given salary and every other field defaulted.
    pub fn with_salary(annual_salary: Decimal) -> Self {
        Self {
            annual_salary,
            ..Default::default()
        }
    }

    /// Returns a copy of this input with every amount inside `[0, MAX_AMOUNT]`
    /// and at least one dependent.
    ///
    /// This is the only place inputs are clamped; the worksheets assume
    /// sanitized values.
    pub fn sanitized(&self) -> Self {
        Self {
            annual_salary: clamp_amount("annual_salary", self.annual_salary),
            retirement_included: self.retirement_included,
            dependent_count: if self.dependent_count == 0 {
                warn!("dependent count of zero raised to one (the filer)");
                1
            } else {
                self.dependent_count
            },
            child_count: self.child_count,
            monthly_tax_free_allowance: clamp_amount(
                "monthly_tax_free_allowance",
                self.monthly_tax_free_allowance,
            ),
            credit_card_annual: clamp_amount("credit_card_annual", self.credit_card_annual),
            debit_card_annual: clamp_amount("debit_card_annual", self.debit_card_annual),
            housing_savings_annual: clamp_amount(
                "housing_savings_annual",
                self.housing_savings_annual,
            ),
            mortgage_interest_annual: clamp_amount(
                "mortgage_interest_annual",
                self.mortgage_interest_annual,
            ),
            medical_annual: clamp_amount("medical_annual", self.medical_annual),
            education_annual: clamp_amount("education_annual", self.education_annual),
        }
    }

    /// Returns `true` if any year-end settlement input is non-zero.
    pub fn has_advanced_inputs(&self) -> bool {
        [
            self.credit_card_annual,
            self.debit_card_annual,
            self.housing_savings_annual,
            self.mortgage_interest_annual,
            self.medical_annual,
            self.education_annual,
        ]
        .iter()
        .any(|v| !v.is_zero())
    }
}

fn clamp_amount(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "negative amount clamped to zero");
        Decimal::ZERO
    } else if value > MAX_AMOUNT {
        warn!(field, value = %value, max = %MAX_AMOUNT, "amount clamped to maximum");
        MAX_AMOUNT
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn default_has_one_dependent_and_no_amounts() {
        let input = TaxInput::default();

        assert_eq!(input.dependent_count, 1);
        assert_eq!(input.annual_salary, Decimal::ZERO);
        assert!(!input.has_advanced_inputs());
    }

    #[test]
    fn sanitized_leaves_valid_input_unchanged() {
        let input = TaxInput {
            annual_salary: dec!(50000000),
            monthly_tax_free_allowance: dec!(200000),
            child_count: 2,
            dependent_count: 4,
            medical_annual: dec!(1000000),
            ..Default::default()
        };

        assert_eq!(input.sanitized(), input);
    }

    #[test]
    fn sanitized_clamps_negative_amounts_to_zero() {
        let _guard = init_test_tracing();
        let input = TaxInput {
            annual_salary: dec!(-1),
            debit_card_annual: dec!(-500000),
            ..Default::default()
        };

        let clean = input.sanitized();

        assert_eq!(clean.annual_salary, Decimal::ZERO);
        assert_eq!(clean.debit_card_annual, Decimal::ZERO);
    }

    #[test]
    fn sanitized_clamps_huge_amounts_to_maximum() {
        let _guard = init_test_tracing();
        let input = TaxInput::with_salary(dec!(99999999999999999999));

        assert_eq!(input.sanitized().annual_salary, MAX_AMOUNT);
    }

    #[test]
    fn sanitized_raises_zero_dependents_to_one() {
        let _guard = init_test_tracing();
        let input = TaxInput {
            dependent_count: 0,
            ..Default::default()
        };

        assert_eq!(input.sanitized().dependent_count, 1);
    }

    #[test]
    fn has_advanced_inputs_detects_any_field() {
        let input = TaxInput {
            education_annual: dec!(1),
            ..Default::default()
        };

        assert!(input.has_advanced_inputs());
    }
}
