//! Plain-text receipt rendering.
//!
//! The receipt mirrors the result card of the calculator: the monthly net
//! pay headline, premiums and taxes, net pay in several units and any
//! year-end settlement deductions that applied.

use std::fmt;

use netpay_core::{TaxInput, TaxResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::form::{AmountField, CalculatorForm};
use crate::utils::{format_amount, format_rate};

const WIDTH: usize = 48;

const DISCLAIMER: &str = "\
Estimate based on the configured social insurance rates and income tax
rules. Actual withholding may differ; consult the official simplified
withholding table for exact amounts.";

/// Renders the full receipt for one calculation.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use netpay_core::{TaxInput, compute};
/// use netpay_cli::receipt::render_receipt;
///
/// let input = TaxInput {
///     annual_salary: dec!(50000000),
///     monthly_tax_free_allowance: dec!(200000),
///     ..Default::default()
/// };
/// let receipt = render_receipt(&input, &compute(&input));
///
/// assert!(receipt.contains("3,565,640 won"));
/// ```
pub fn render_receipt(
    input: &TaxInput,
    result: &TaxResult,
) -> String {
    Receipt { input, result }.to_string()
}

/// Renders one row per salary: net pay, withholding and effective rate.
pub fn render_sweep(rows: &[(Decimal, TaxResult)]) -> String {
    Sweep { rows }.to_string()
}

/// Renders the filled-in amount fields of `form` as typed.
///
/// Call [`CalculatorForm::reformat`] first to echo the amounts with
/// separators.
pub fn render_inputs(form: &CalculatorForm) -> String {
    Inputs { form }.to_string()
}

struct Inputs<'a> {
    form: &'a CalculatorForm,
}

struct Receipt<'a> {
    input: &'a TaxInput,
    result: &'a TaxResult,
}

struct Sweep<'a> {
    rows: &'a [(Decimal, TaxResult)],
}

fn rule(
    f: &mut fmt::Formatter<'_>,
    ch: char,
) -> fmt::Result {
    writeln!(f, "{}", ch.to_string().repeat(WIDTH))
}

fn row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: &str,
) -> fmt::Result {
    let pad = WIDTH.saturating_sub(label.chars().count());
    writeln!(f, "{label}{value:>pad$}")
}

fn withheld(value: Decimal) -> String {
    format!("-{}", format_amount(value))
}

fn won(value: Decimal) -> String {
    format!("{} won", format_amount(value))
}

impl fmt::Display for Inputs<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{:^WIDTH$}", "INPUTS")?;
        rule(f, '=')?;
        for field in AmountField::ALL {
            let text = self.form.text(field);
            if !text.is_empty() {
                row(f, field.label(), text)?;
            }
        }
        if self.form.retirement_included {
            writeln!(f, "Retirement allowance included")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Receipt<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        let input = self.input;

        writeln!(f, "{:^WIDTH$}", "MONTHLY NET PAY")?;
        writeln!(f, "{:^WIDTH$}", won(r.monthly_net))?;
        rule(f, '=')?;

        writeln!(
            f,
            "Dependents {} | Children {} | Tax-free {}/month",
            input.dependent_count.max(1),
            input.child_count,
            format_amount(r.tax_free_annual / dec!(12)),
        )?;
        rule(f, '-')?;

        row(f, "Annual gross", &format_amount(r.monthly_gross * dec!(12)))?;
        if let Some(adjusted) = r.retirement_adjusted_annual {
            row(f, "  Excluding retirement", &format_amount(adjusted))?;
        }
        rule(f, '-')?;

        writeln!(f, "Social insurance (monthly)")?;
        row(f, "  National pension", &withheld(r.pension))?;
        row(f, "  Health insurance", &withheld(r.health_insurance))?;
        row(f, "  Long-term care", &withheld(r.long_term_care))?;
        row(f, "  Employment insurance", &withheld(r.employment_insurance))?;
        rule(f, '-')?;

        writeln!(f, "Taxes (monthly)")?;
        row(f, "  Income tax", &withheld(r.monthly_income_tax))?;
        row(f, "  Local income tax", &withheld(r.monthly_local_tax))?;
        rule(f, '-')?;

        row(f, "Total deductions (monthly)", &withheld(r.total_monthly_deduction))?;
        rule(f, '=')?;

        row(f, "Monthly net pay", &won(r.monthly_net))?;
        row(f, "Annual net pay", &won(r.annual_net))?;
        rule(f, '-')?;

        row(f, "Daily equivalent", &won(r.daily_net()))?;
        row(f, "Hourly equivalent", &won(r.hourly_net()))?;
        row(f, "Effective deduction rate", &format_rate(r.effective_rate))?;

        if r.has_advanced_deductions() {
            rule(f, '.')?;
            writeln!(f, "Applied deductions (annual)")?;
            for (label, amount) in [
                ("  Card usage", r.card_deduction),
                ("  Housing savings", r.housing_deduction),
                ("  Mortgage interest", r.mortgage_deduction),
            ] {
                if amount > Decimal::ZERO {
                    row(f, label, &withheld(amount))?;
                }
            }
        }

        if r.advanced_saving > Decimal::ZERO {
            rule(f, '.')?;
            row(f, "Estimated annual saving", &won(r.advanced_saving))?;
        }

        rule(f, '-')?;
        writeln!(f, "{DISCLAIMER}")
    }
}

impl fmt::Display for Sweep<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>15} {:>13} {:>11} {:>11} {:>7}",
            "Annual salary", "Monthly net", "Income tax", "Insurance", "Rate"
        )?;
        for (salary, r) in self.rows {
            writeln!(
                f,
                "{:>15} {:>13} {:>11} {:>11} {:>7}",
                format_amount(*salary),
                format_amount(r.monthly_net),
                format_amount(r.monthly_income_tax + r.monthly_local_tax),
                format_amount(r.insurance_total),
                format_rate(r.effective_rate),
            )?;
        }
        Ok(())
    }
}
