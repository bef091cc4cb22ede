//! Net-pay engine.
//!
//! [`TaxEngine`] owns a validated [`RateSchedule`] and turns a [`TaxInput`]
//! into an itemized [`TaxResult`]. The steps are:
//!
//! 1. Sanitize the input ([`TaxInput::sanitized`]).
//! 2. Normalize pay: remove the retirement share and the tax-free allowance.
//! 3. Social insurance premiums from monthly taxable pay.
//! 4. Earned-income deduction and the remaining income deductions.
//! 5. Settle: taxable income, bracket tax, credits and final tax.
//! 6. Settle again without the year-end settlement deductions to estimate
//!    what they saved.
//! 7. Monthly withholding and net pay.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use netpay_core::{TaxEngine, TaxInput};
//!
//! let engine = TaxEngine::default();
//! let result = engine.compute(&TaxInput {
//!     annual_salary: dec!(50000000),
//!     monthly_tax_free_allowance: dec!(200000),
//!     ..Default::default()
//! });
//!
//! assert_eq!(result.insurance_total, dec!(385457));
//! assert_eq!(result.monthly_income_tax, dec!(195973));
//! assert_eq!(result.monthly_local_tax, dec!(19597));
//! assert_eq!(result.total_monthly_deduction, dec!(601027));
//! ```

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::common::{floor_at_zero, round_won};
use crate::calculations::worksheets::{
    IncomeDeductionWorksheet, IncomeDeductions, IncomeTaxWorksheet, SocialInsurancePremiums,
    SocialInsuranceWorksheet, TaxCreditWorksheet,
};
use crate::{RateSchedule, RateScheduleError, TaxInput, TaxResult};

const MONTHS_PER_YEAR: Decimal = dec!(12);
/// A salary that bundles a retirement allowance is paid over 13 months.
const MONTHS_WITH_RETIREMENT: Decimal = dec!(13);

static DEFAULT_ENGINE: LazyLock<TaxEngine> = LazyLock::new(TaxEngine::default);

/// Computes net pay with the built-in 2026 rate schedule.
///
/// Shorthand for [`TaxEngine::default().compute(input)`](TaxEngine::compute)
/// that reuses one shared engine.
pub fn compute(input: &TaxInput) -> TaxResult {
    DEFAULT_ENGINE.compute(input)
}

/// Net-pay calculator bound to one rate schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxEngine {
    schedule: RateSchedule,
}

/// Outcome of settling one set of deductions and credits.
#[derive(Debug, Clone, Copy)]
struct Settlement {
    taxable_income: Decimal,
    computed_tax: Decimal,
    earned_income_credit: Decimal,
    child_credit: Decimal,
    other_credit: Decimal,
    total_credits: Decimal,
    final_tax: Decimal,
}

impl Default for TaxEngine {
    fn default() -> Self {
        Self {
            schedule: RateSchedule::default(),
        }
    }
}

impl TaxEngine {
    /// Creates an engine after validating `schedule`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RateScheduleError`] found by
    /// [`RateSchedule::validate`].
    pub fn new(schedule: RateSchedule) -> Result<Self, RateScheduleError> {
        schedule.validate()?;
        debug!(tax_year = schedule.tax_year, "rate schedule accepted");
        Ok(Self { schedule })
    }

    pub fn schedule(&self) -> &RateSchedule {
        &self.schedule
    }

    /// Computes the full net-pay breakdown for `input`.
    ///
    /// Never fails: out-of-range inputs are clamped by
    /// [`TaxInput::sanitized`] before any formula runs.
    pub fn compute(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        let input = input.sanitized();
        let schedule = &self.schedule;

        // Pay normalization
        let salary = input.annual_salary;
        let effective_annual = if input.retirement_included {
            salary * MONTHS_PER_YEAR / MONTHS_WITH_RETIREMENT
        } else {
            salary
        };
        let monthly_gross = salary / MONTHS_PER_YEAR;
        let tax_free_annual = input.monthly_tax_free_allowance * MONTHS_PER_YEAR;
        let total_pay = floor_at_zero(effective_annual - tax_free_annual);
        let monthly_taxable = total_pay / MONTHS_PER_YEAR;

        let premiums = if salary.is_zero() {
            debug!("no salary; social insurance premiums are zero");
            SocialInsurancePremiums::default()
        } else {
            SocialInsuranceWorksheet::new(&schedule.social_insurance).calculate(monthly_taxable)
        };

        let deduction_worksheet =
            IncomeDeductionWorksheet::new(&schedule.earned_income_bands, &schedule.deductions);
        let earned_income_deduction = deduction_worksheet.earned_income_deduction(total_pay);
        let earned_income = total_pay - earned_income_deduction;
        let deductions = deduction_worksheet.calculate(&input, total_pay, &premiums);

        let credit_worksheet = TaxCreditWorksheet::new(&schedule.credits);
        let child_credit = credit_worksheet.child_credit(input.child_count);
        let special_credit = credit_worksheet.special_credit(
            input.medical_annual,
            input.education_annual,
            total_pay,
        );
        let (other_credit, used_itemized_credit) = credit_worksheet.other_credit(special_credit);

        let settled = self.settle(
            earned_income,
            total_pay,
            &deductions,
            child_credit,
            other_credit,
        );
        let baseline = self.settle(
            earned_income,
            total_pay,
            &deductions.without_advanced(),
            child_credit,
            credit_worksheet.standard_credit(),
        );
        let advanced_saving = floor_at_zero(baseline.final_tax - settled.final_tax);

        // Credits forfeited at zero tax are reported as zero.
        let (special_credit, used_itemized_credit) = if settled.computed_tax.is_zero() {
            (Decimal::ZERO, false)
        } else {
            (special_credit, used_itemized_credit)
        };

        // Monthly withholding
        let monthly_income_tax = round_won(settled.final_tax / MONTHS_PER_YEAR);
        let monthly_local_tax = round_won(monthly_income_tax * schedule.credits.local_tax_ratio);
        let total_monthly_deduction = premiums.total + monthly_income_tax + monthly_local_tax;
        let monthly_net = monthly_gross - total_monthly_deduction;
        let annual_net = monthly_net * MONTHS_PER_YEAR;
        let effective_rate = if salary > Decimal::ZERO {
            (salary - annual_net) / salary * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        debug!(
            annual_salary = %salary,
            total_pay = %total_pay,
            final_tax = %settled.final_tax,
            monthly_net = %monthly_net,
            advanced_saving = %advanced_saving,
            "net pay computed"
        );

        TaxResult {
            monthly_gross,
            tax_free_annual,
            total_pay,
            monthly_taxable,
            retirement_adjusted_annual: input
                .retirement_included
                .then_some(total_pay + tax_free_annual),
            pension: premiums.pension,
            health_insurance: premiums.health,
            long_term_care: premiums.long_term_care,
            employment_insurance: premiums.employment,
            insurance_total: premiums.total,
            earned_income_deduction,
            personal_deduction: deductions.personal,
            pension_deduction: deductions.pension,
            insurance_deduction: deductions.insurance,
            card_deduction: deductions.card,
            housing_deduction: deductions.housing,
            mortgage_deduction: deductions.mortgage,
            total_deductions: deductions.total(),
            taxable_income: settled.taxable_income,
            computed_tax: settled.computed_tax,
            earned_income_credit: settled.earned_income_credit,
            child_credit: settled.child_credit,
            special_credit,
            other_credit: settled.other_credit,
            used_itemized_credit,
            total_credits: settled.total_credits,
            final_tax: settled.final_tax,
            monthly_income_tax,
            monthly_local_tax,
            total_monthly_deduction,
            monthly_net,
            annual_net,
            effective_rate,
            advanced_saving,
        }
    }

    /// Runs taxable income through the bracket tax and credits.
    fn settle(
        &self,
        earned_income: Decimal,
        total_pay: Decimal,
        deductions: &IncomeDeductions,
        child_credit: Decimal,
        other_credit: Decimal,
    ) -> Settlement {
        let taxable_income = floor_at_zero(earned_income - deductions.total());
        let computed_tax =
            IncomeTaxWorksheet::new(&self.schedule.tax_brackets).calculate(taxable_income);

        if computed_tax.is_zero() {
            debug!(
                taxable_income = %taxable_income,
                "no computed tax; credits forfeited"
            );
            return Settlement {
                taxable_income,
                computed_tax,
                earned_income_credit: Decimal::ZERO,
                child_credit: Decimal::ZERO,
                other_credit: Decimal::ZERO,
                total_credits: Decimal::ZERO,
                final_tax: Decimal::ZERO,
            };
        }

        let earned_income_credit = TaxCreditWorksheet::new(&self.schedule.credits)
            .earned_income_credit(computed_tax, total_pay);
        let total_credits = earned_income_credit + child_credit + other_credit;

        Settlement {
            taxable_income,
            computed_tax,
            earned_income_credit,
            child_credit,
            other_credit,
            total_credits,
            final_tax: floor_at_zero(computed_tax - total_credits),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MAX_AMOUNT;

    fn baseline_input() -> TaxInput {
        TaxInput {
            annual_salary: dec!(50000000),
            monthly_tax_free_allowance: dec!(200000),
            ..Default::default()
        }
    }

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // construction
    // =========================================================================

    #[test]
    fn new_accepts_default_schedule() {
        let engine = TaxEngine::new(RateSchedule::default()).unwrap();

        assert_eq!(engine, TaxEngine::default());
        assert_eq!(engine.schedule().tax_year, 2026);
    }

    #[test]
    fn new_rejects_invalid_schedule() {
        let mut schedule = RateSchedule::default();
        schedule.tax_brackets.clear();

        assert_eq!(
            TaxEngine::new(schedule),
            Err(RateScheduleError::EmptyTable {
                table: "tax_brackets"
            })
        );
    }

    // =========================================================================
    // pay normalization
    // =========================================================================

    #[test]
    fn compute_removes_tax_free_allowance() {
        let result = compute(&baseline_input());

        assert_eq!(result.tax_free_annual, dec!(2400000));
        assert_eq!(result.total_pay, dec!(47600000));
        assert_eq!(round_won(result.monthly_gross), dec!(4166667));
        assert_eq!(result.retirement_adjusted_annual, None);
    }

    #[test]
    fn compute_spreads_retirement_salary_over_thirteen_months() {
        let result = compute(&TaxInput {
            annual_salary: dec!(65000000),
            retirement_included: true,
            monthly_tax_free_allowance: dec!(200000),
            ..Default::default()
        });

        assert_eq!(result.total_pay, dec!(57600000));
        assert_eq!(result.retirement_adjusted_annual, Some(dec!(60000000)));
        // monthly gross still divides the raw salary
        assert_eq!(round_won(result.monthly_gross), dec!(5416667));
    }

    #[test]
    fn compute_floors_total_pay_when_allowance_exceeds_salary() {
        let result = compute(&TaxInput {
            annual_salary: dec!(2000000),
            monthly_tax_free_allowance: dec!(200000),
            ..Default::default()
        });

        assert_eq!(result.total_pay, dec!(0));
        assert_eq!(result.insurance_total, dec!(0));
    }

    // =========================================================================
    // full scenario
    // =========================================================================

    #[test]
    fn compute_baseline_scenario() {
        let result = compute(&baseline_input());

        assert_eq!(result.pension, dec!(188417));
        assert_eq!(result.health_insurance, dec!(142602));
        assert_eq!(result.long_term_care, dec!(18738));
        assert_eq!(result.employment_insurance, dec!(35700));
        assert_eq!(result.earned_income_deduction, dec!(12130000));
        assert_eq!(result.total_deductions, dec!(6125484));
        assert_eq!(result.taxable_income, dec!(29344516));
        assert_eq!(result.computed_tax, dec!(3141677.40));
        assert_eq!(result.earned_income_credit, dec!(660000));
        assert_eq!(result.child_credit, dec!(0));
        assert_eq!(result.other_credit, dec!(130000));
        assert!(!result.used_itemized_credit);
        assert_eq!(result.total_credits, dec!(790000));
        assert_eq!(result.final_tax, dec!(2351677.40));
        assert_eq!(result.monthly_income_tax, dec!(195973));
        assert_eq!(result.monthly_local_tax, dec!(19597));
        assert_eq!(result.total_monthly_deduction, dec!(601027));
        assert_eq!(round_won(result.annual_net), dec!(42787676));
        assert_eq!(result.effective_rate.round_dp(2), dec!(14.42));
        assert_eq!(result.advanced_saving, dec!(0));
    }

    #[test]
    fn compute_is_deterministic() {
        let input = baseline_input();

        assert_eq!(compute(&input), compute(&input));
    }

    #[test]
    fn compute_adds_child_credit() {
        let without = compute(&baseline_input());
        let with = compute(&TaxInput {
            child_count: 2,
            ..baseline_input()
        });

        assert_eq!(with.child_credit, dec!(300000));
        assert_eq!(without.final_tax - with.final_tax, dec!(300000));
    }

    // =========================================================================
    // advanced saving
    // =========================================================================

    #[test]
    fn compute_estimates_card_saving() {
        let result = compute(&TaxInput {
            credit_card_annual: dec!(30000000),
            ..baseline_input()
        });

        assert_eq!(result.card_deduction, dec!(2715000));
        assert_eq!(result.taxable_income, dec!(26629516));
        assert_eq!(result.final_tax, dec!(1944427.40));
        assert_eq!(result.monthly_income_tax, dec!(162036));
        assert_eq!(result.advanced_saving, dec!(407250));
        assert!(result.has_advanced_deductions());
    }

    #[test]
    fn compute_counts_itemized_credit_in_saving() {
        let result = compute(&TaxInput {
            medical_annual: dec!(2428000),
            education_annual: dec!(1000000),
            ..baseline_input()
        });

        // (2,428,000 − 1,428,000) × 15% + 1,000,000 × 15%
        assert_eq!(result.special_credit, dec!(300000));
        assert!(result.used_itemized_credit);
        assert_eq!(result.other_credit, dec!(300000));
        assert_eq!(result.advanced_saving, dec!(170000));
        assert!(!result.has_advanced_deductions());
    }

    #[test]
    fn compute_keeps_child_credit_in_baseline() {
        let result = compute(&TaxInput {
            child_count: 1,
            mortgage_interest_annual: dec!(1000000),
            ..baseline_input()
        });

        // 1,000,000 less taxable income at the 15% bracket
        assert_eq!(result.advanced_saving, dec!(150000));
    }

    // =========================================================================
    // zero tax
    // =========================================================================

    #[test]
    fn compute_zero_salary_yields_zeroes() {
        let _guard = init_test_tracing();

        let result = compute(&TaxInput::default());

        assert_eq!(result.insurance_total, dec!(0));
        assert_eq!(result.computed_tax, dec!(0));
        assert_eq!(result.total_credits, dec!(0));
        assert_eq!(result.other_credit, dec!(0));
        assert_eq!(result.final_tax, dec!(0));
        assert_eq!(result.monthly_net, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn compute_charges_pension_floor_when_allowance_covers_salary() {
        let result = compute(&TaxInput {
            annual_salary: dec!(2400000),
            monthly_tax_free_allowance: dec!(200000),
            ..Default::default()
        });

        assert_eq!(result.total_pay, dec!(0));
        // 390,000 floor × 4.75%
        assert_eq!(result.pension, dec!(18525));
        assert_eq!(result.health_insurance, dec!(0));
        assert_eq!(result.insurance_total, dec!(18525));
        assert_eq!(result.final_tax, dec!(0));
        assert_eq!(result.monthly_net, dec!(181475));
    }

    #[test]
    fn compute_forfeits_credits_when_deductions_cover_income() {
        let result = compute(&TaxInput {
            annual_salary: dec!(12000000),
            dependent_count: 5,
            child_count: 3,
            education_annual: dec!(5000000),
            ..Default::default()
        });

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.child_credit, dec!(0));
        assert_eq!(result.special_credit, dec!(0));
        assert!(!result.used_itemized_credit);
        assert_eq!(result.final_tax, dec!(0));
        assert!(result.monthly_net > dec!(0));
    }

    #[test]
    fn compute_never_goes_negative_when_credits_exceed_tax() {
        let result = compute(&TaxInput {
            annual_salary: dec!(20000000),
            child_count: 4,
            ..Default::default()
        });

        assert!(result.computed_tax > dec!(0));
        assert!(result.total_credits > result.computed_tax);
        assert_eq!(result.final_tax, dec!(0));
        assert_eq!(result.monthly_income_tax, dec!(0));
    }

    // =========================================================================
    // sanitation
    // =========================================================================

    #[test]
    fn compute_treats_negative_salary_as_zero() {
        let _guard = init_test_tracing();

        let result = compute(&TaxInput::with_salary(dec!(-50000000)));

        assert_eq!(result, compute(&TaxInput::default()));
    }

    #[test]
    fn compute_handles_maximum_amounts() {
        let result = compute(&TaxInput {
            annual_salary: dec!(999999999999999999),
            credit_card_annual: dec!(999999999999999999),
            ..Default::default()
        });

        assert!(result.final_tax > dec!(0));
        assert!(result.monthly_net > dec!(0));
    }

    // =========================================================================
    // custom schedule
    // =========================================================================

    #[test]
    fn new_rejects_schedule_amounts_beyond_the_maximum() {
        let mut schedule = RateSchedule::default();
        schedule.deductions.personal_per_dependent = dec!(10000000000000000000000000000);

        let err = TaxEngine::new(schedule).unwrap_err();

        assert!(matches!(err, RateScheduleError::AmountTooLarge { .. }));
    }

    #[test]
    fn compute_stays_in_range_with_maximum_schedule_amounts() {
        let mut schedule = RateSchedule::default();
        schedule.deductions.personal_per_dependent = MAX_AMOUNT;
        schedule.credits.child_additional = MAX_AMOUNT;
        let engine = TaxEngine::new(schedule).unwrap();

        let result = engine.compute(&TaxInput {
            annual_salary: MAX_AMOUNT,
            dependent_count: u32::MAX,
            child_count: u32::MAX,
            ..Default::default()
        });

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.final_tax, dec!(0));
    }

    #[test]
    fn compute_uses_the_engine_schedule() {
        let mut schedule = RateSchedule::default();
        schedule.credits.local_tax_ratio = dec!(0);
        let engine = TaxEngine::new(schedule).unwrap();

        let result = engine.compute(&baseline_input());

        assert_eq!(result.monthly_income_tax, dec!(195973));
        assert_eq!(result.monthly_local_tax, dec!(0));
    }
}
