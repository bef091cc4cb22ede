//! CSV batch processing.
//!
//! ## Input format
//!
//! Headers are matched by name, so column order does not matter. Whitespace
//! around headers and values is trimmed. Amount cells go through
//! [`parse_amount`], so `"50,000,000"` (quoted) and `50000000` are both
//! accepted.
//!
//! | Column                     | Required | Type    | Default |
//! |----------------------------|----------|---------|---------|
//! | `annual_salary`            | yes      | amount  |         |
//! | `retirement_included`      | no       | bool    | `false` |
//! | `dependent_count`          | no       | integer | `1`     |
//! | `child_count`              | no       | integer | `0`     |
//! | `monthly_tax_free_allowance` | no     | amount  | `0`     |
//! | `credit_card_annual`       | no       | amount  | `0`     |
//! | `debit_card_annual`        | no       | amount  | `0`     |
//! | `housing_savings_annual`   | no       | amount  | `0`     |
//! | `mortgage_interest_annual` | no       | amount  | `0`     |
//! | `medical_annual`           | no       | amount  | `0`     |
//! | `education_annual`         | no       | amount  | `0`     |
//!
//! ### Minimal example
//!
//! ```csv
//! annual_salary
//! 50000000
//! ```
//!
//! ## Output format
//!
//! One [`BatchRecord`] per input row, in input order, with monetary values
//! rounded to whole won.

use std::io;
use std::path::Path;

use netpay_core::calculations::common::round_won;
use netpay_core::{TaxEngine, TaxInput, TaxResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::utils::parse_amount;

// ---------------------------------------------------------------------------
// Serde-compatible rows that mirror the CSV layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    annual_salary: String,
    retirement_included: Option<bool>,
    dependent_count: Option<u32>,
    child_count: Option<u32>,
    monthly_tax_free_allowance: Option<String>,
    credit_card_annual: Option<String>,
    debit_card_annual: Option<String>,
    housing_savings_annual: Option<String>,
    mortgage_interest_annual: Option<String>,
    medical_annual: Option<String>,
    education_annual: Option<String>,
}

/// One output row of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRecord {
    pub annual_salary: Decimal,
    pub total_pay: Decimal,
    pub insurance_total: Decimal,
    pub taxable_income: Decimal,
    pub final_tax: Decimal,
    pub monthly_income_tax: Decimal,
    pub monthly_local_tax: Decimal,
    pub total_monthly_deduction: Decimal,
    pub monthly_net: Decimal,
    pub annual_net: Decimal,
    /// Percent, two decimal places.
    pub effective_rate: Decimal,
    pub advanced_saving: Decimal,
}

impl BatchRecord {
    pub fn new(
        input: &TaxInput,
        result: &TaxResult,
    ) -> Self {
        Self {
            annual_salary: round_won(input.annual_salary),
            total_pay: round_won(result.total_pay),
            insurance_total: result.insurance_total,
            taxable_income: round_won(result.taxable_income),
            final_tax: round_won(result.final_tax),
            monthly_income_tax: result.monthly_income_tax,
            monthly_local_tax: result.monthly_local_tax,
            total_monthly_deduction: result.total_monthly_deduction,
            monthly_net: round_won(result.monthly_net),
            annual_net: round_won(result.annual_net),
            effective_rate: result.effective_rate.round_dp(2),
            advanced_saving: round_won(result.advanced_saving),
        }
    }
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while reading or writing batch CSV data.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The CSV was structurally invalid, a required column was missing or a
    /// non-amount cell had the wrong type.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input file could not be opened or the output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An amount cell held more digits than a decimal can represent.
    /// `row` is 1-based (header = row 0).
    #[error("invalid amount in column '{column}' on row {row}")]
    InvalidAmount { column: &'static str, row: usize },
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn amount(
    cell: Option<&str>,
    column: &'static str,
    row: usize,
) -> Result<Decimal, BatchError> {
    cell.map_or(Ok(Decimal::ZERO), parse_amount)
        .map_err(|_| BatchError::InvalidAmount { column, row })
}

/// Converts one CSV row into engine input. `row_number` is 1-based.
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxInput, BatchError> {
    Ok(TaxInput {
        annual_salary: amount(Some(&row.annual_salary), "annual_salary", row_number)?,
        retirement_included: row.retirement_included.unwrap_or(false),
        dependent_count: row.dependent_count.unwrap_or(1),
        child_count: row.child_count.unwrap_or(0),
        monthly_tax_free_allowance: amount(
            row.monthly_tax_free_allowance.as_deref(),
            "monthly_tax_free_allowance",
            row_number,
        )?,
        credit_card_annual: amount(
            row.credit_card_annual.as_deref(),
            "credit_card_annual",
            row_number,
        )?,
        debit_card_annual: amount(
            row.debit_card_annual.as_deref(),
            "debit_card_annual",
            row_number,
        )?,
        housing_savings_annual: amount(
            row.housing_savings_annual.as_deref(),
            "housing_savings_annual",
            row_number,
        )?,
        mortgage_interest_annual: amount(
            row.mortgage_interest_annual.as_deref(),
            "mortgage_interest_annual",
            row_number,
        )?,
        medical_annual: amount(row.medical_annual.as_deref(), "medical_annual", row_number)?,
        education_annual: amount(
            row.education_annual.as_deref(),
            "education_annual",
            row_number,
        )?,
    })
}

/// Reads engine inputs from CSV. Rows are returned in input order.
///
/// # Errors
///
/// * [`BatchError::Csv`] if the CSV is structurally invalid or a required
///   column is missing.
/// * [`BatchError::InvalidAmount`] if an amount cell cannot be parsed.
pub fn read_inputs<R: io::Read>(reader: R) -> Result<Vec<TaxInput>, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

/// Reads engine inputs from a CSV file on disk.
///
/// # Errors
///
/// [`BatchError::Io`] when the file cannot be opened, otherwise as
/// [`read_inputs`].
pub fn load_inputs(path: &Path) -> Result<Vec<TaxInput>, BatchError> {
    let file = std::fs::File::open(path)?;
    let inputs = read_inputs(file)?;
    info!(path = %path.display(), rows = inputs.len(), "batch inputs loaded");
    Ok(inputs)
}

// ---------------------------------------------------------------------------
// Computing and writing
// ---------------------------------------------------------------------------

/// Computes every input with `engine`.
pub fn compute_all(
    engine: &TaxEngine,
    inputs: &[TaxInput],
) -> Vec<BatchRecord> {
    inputs
        .iter()
        .map(|input| BatchRecord::new(input, &engine.compute(input)))
        .collect()
}

/// Writes records as CSV with a header row.
///
/// # Errors
///
/// [`BatchError::Csv`] or [`BatchError::Io`] when the writer fails.
pub fn write_records<W: io::Write>(
    writer: W,
    records: &[BatchRecord],
) -> Result<(), BatchError> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    debug!(rows = records.len(), "batch results written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
