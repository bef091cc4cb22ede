use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use netpay_cli::form::{AmountField, CalculatorForm, Counter, SALARY_PRESETS};
use netpay_cli::utils::parse_amount;
use netpay_cli::{batch, config, logging, receipt};
use netpay_core::{TaxEngine, TaxResult};

/// Longest salary sweep printed in one run.
const MAX_SWEEP_ROWS: usize = 1000;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Net salary calculator for Korean payroll.
///
/// Estimates social insurance premiums, income tax and monthly take-home pay
/// from an annual salary.
#[derive(Debug, Parser)]
#[command(name = "netpay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML rate schedule overriding the built-in 2026 rules.
    #[arg(long, global = true)]
    schedule: Option<PathBuf>,

    /// Log level or filter directive. `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a full receipt for one salary.
    Calc(CalcArgs),

    /// Print net pay for a range of salaries.
    Sweep(SweepArgs),

    /// Compute every row of a CSV file and write the results as CSV.
    Batch {
        /// Input CSV with an `annual_salary` column.
        #[arg(long)]
        input: PathBuf,

        /// Output CSV path. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Calculator inputs. Amounts are taken as typed; separators and units are
/// ignored.
#[derive(Debug, Args)]
struct CalcArgs {
    /// Annual salary.
    #[arg(long, default_value = "50,000,000")]
    salary: String,

    /// The salary includes a retirement allowance (paid over 13 months).
    #[arg(long)]
    retirement: bool,

    /// Household dependents including yourself.
    #[arg(long, default_value_t = 1)]
    dependents: u32,

    /// Children eligible for the child credit.
    #[arg(long, default_value_t = 0)]
    children: u32,

    /// Monthly tax-free allowance (meals, transport).
    #[arg(long, default_value = "200,000")]
    allowance: String,

    /// Annual credit card spending.
    #[arg(long)]
    credit_card: Option<String>,

    /// Annual debit card and cash receipt spending.
    #[arg(long)]
    debit_card: Option<String>,

    /// Annual housing subscription savings.
    #[arg(long)]
    housing_savings: Option<String>,

    /// Annual mortgage interest paid.
    #[arg(long)]
    mortgage_interest: Option<String>,

    /// Annual medical expenses.
    #[arg(long)]
    medical: Option<String>,

    /// Annual education expenses.
    #[arg(long)]
    education: Option<String>,
}

#[derive(Debug, Args)]
struct SweepArgs {
    /// First salary. Without a range the standard presets are used.
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// Last salary (inclusive).
    #[arg(long, requires = "from")]
    to: Option<String>,

    /// Salary increment.
    #[arg(long, default_value = "10,000,000")]
    step: String,
}

impl CalcArgs {
    fn to_form(&self) -> CalculatorForm {
        let mut form = CalculatorForm::new();
        form.set_text(AmountField::Salary, &self.salary);
        form.set_text(AmountField::MonthlyAllowance, &self.allowance);
        form.retirement_included = self.retirement;
        form.set_count(Counter::Dependents, self.dependents);
        form.set_count(Counter::Children, self.children);

        for (field, value) in [
            (AmountField::CreditCard, &self.credit_card),
            (AmountField::DebitCard, &self.debit_card),
            (AmountField::HousingSavings, &self.housing_savings),
            (AmountField::MortgageInterest, &self.mortgage_interest),
            (AmountField::Medical, &self.medical),
            (AmountField::Education, &self.education),
        ] {
            if let Some(text) = value {
                form.set_text(field, text);
            }
        }
        form
    }
}

impl SweepArgs {
    fn salaries(&self) -> anyhow::Result<Vec<Decimal>> {
        let (Some(from), Some(to)) = (&self.from, &self.to) else {
            return Ok(SALARY_PRESETS.to_vec());
        };
        let from = parse_amount(from).context("Invalid --from")?;
        let to = parse_amount(to).context("Invalid --to")?;
        let step = parse_amount(&self.step).context("Invalid --step")?;

        if step <= Decimal::ZERO {
            bail!("--step must be positive");
        }
        if from > to {
            bail!("--from must not exceed --to");
        }
        let rows = (to - from) / step + dec!(1);
        if rows > Decimal::from(MAX_SWEEP_ROWS) {
            bail!("sweep would print more than {MAX_SWEEP_ROWS} rows; raise --step");
        }

        Ok(
            std::iter::successors(Some(from), |s| Some(*s + step))
                .take_while(|s| *s <= to)
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_calc(
    engine: &TaxEngine,
    args: &CalcArgs,
) -> anyhow::Result<()> {
    let mut form = args.to_form();
    form.reformat().context("Invalid amount")?;
    let input = form.to_input().context("Invalid amount")?;
    debug!(?input, "calculating");

    let result = engine.compute(&input);
    print!("{}", receipt::render_inputs(&form));
    print!("{}", receipt::render_receipt(&input, &result));
    Ok(())
}

fn run_sweep(
    engine: &TaxEngine,
    args: &SweepArgs,
) -> anyhow::Result<()> {
    let mut form = CalculatorForm::new();
    let mut rows: Vec<(Decimal, TaxResult)> = Vec::new();
    for salary in args.salaries()? {
        form.apply_preset(salary);
        let input = form.to_input().context("Invalid amount")?;
        rows.push((salary, engine.compute(&input)));
    }

    print!("{}", receipt::render_sweep(&rows));
    Ok(())
}

fn run_batch(
    engine: &TaxEngine,
    input: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let inputs = batch::load_inputs(input)
        .with_context(|| format!("Failed to load '{}'", input.display()))?;
    let records = batch::compute_all(engine, &inputs);

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            batch::write_records(file, &records)?;
            info!(path = %path.display(), rows = records.len(), "batch results written");
        }
        None => batch::write_records(io::stdout().lock(), &records)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&cli.log_level)?;
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let schedule = config::load_schedule(cli.schedule.as_deref())?;
    let engine = TaxEngine::new(schedule).context("Rate schedule rejected")?;
    debug!(tax_year = engine.schedule().tax_year, "engine ready");

    match &cli.command {
        Command::Calc(args) => run_calc(&engine, args),
        Command::Sweep(args) => run_sweep(&engine, args),
        Command::Batch { input, output } => run_batch(&engine, input, output.as_deref()),
    }
}
