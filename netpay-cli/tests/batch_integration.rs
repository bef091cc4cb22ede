//! Integration tests that run the batch pipeline against on-disk fixtures.
//!
//! The unit tests in batch.rs use inline CSV; these cover reading from
//! disk, a schedule file and writing the output back out.

use std::path::PathBuf;

use netpay_cli::{batch, config};
use netpay_core::{TaxEngine, TaxInput};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture() -> Vec<TaxInput> {
    batch::load_inputs(&fixture_path("sample_inputs.csv"))
        .expect("fixture file should load without error")
}

#[test]
fn test_load_fixture_file_succeeds() {
    assert_eq!(load_fixture().len(), 3);
}

#[test]
fn test_fixture_rows_fill_defaults() {
    let inputs = load_fixture();

    assert_eq!(
        inputs[0],
        TaxInput {
            annual_salary: dec!(50000000),
            monthly_tax_free_allowance: dec!(200000),
            ..Default::default()
        }
    );

    let second = &inputs[1];
    assert!(second.retirement_included);
    assert_eq!(second.dependent_count, 2);
    assert_eq!(second.child_count, 1);
    assert_eq!(second.credit_card_annual, dec!(0));

    assert_eq!(inputs[2].credit_card_annual, dec!(30000000));
}

#[test]
fn test_compute_fixture_with_default_schedule() {
    let records = batch::compute_all(&TaxEngine::default(), &load_fixture());

    let base = &records[0];
    assert_eq!(base.total_pay, dec!(47600000));
    assert_eq!(base.insurance_total, dec!(385457));
    assert_eq!(base.final_tax, dec!(2351677));
    assert_eq!(base.monthly_income_tax, dec!(195973));
    assert_eq!(base.monthly_local_tax, dec!(19597));
    assert_eq!(base.total_monthly_deduction, dec!(601027));
    assert_eq!(base.monthly_net, dec!(3565640));
    assert_eq!(base.annual_net, dec!(42787676));
    assert_eq!(base.effective_rate, dec!(14.42));
    assert_eq!(base.advanced_saving, dec!(0));

    // retirement spread over 13 months, allowance excluded
    assert_eq!(records[1].total_pay, dec!(57600000));

    let card = &records[2];
    assert_eq!(card.final_tax, dec!(1944427));
    assert_eq!(card.monthly_income_tax, dec!(162036));
    assert_eq!(card.advanced_saving, dec!(407250));
}

#[test]
fn test_write_fixture_results_round_trip_header() {
    let records = batch::compute_all(&TaxEngine::default(), &load_fixture());
    let mut out = Vec::new();
    batch::write_records(&mut out, &records).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("annual_salary,total_pay,"));
    assert!(lines[1].starts_with("50000000,47600000,385457,"));
}

#[test]
fn test_schedule_fixture_changes_results() {
    let schedule = config::load_schedule(Some(&fixture_path("schedule_2027.toml"))).unwrap();
    assert_eq!(schedule.tax_year, 2027);

    let engine = TaxEngine::new(schedule).unwrap();
    let inputs = load_fixture();
    let custom = batch::compute_all(&engine, &inputs[..1]);
    let default = batch::compute_all(&TaxEngine::default(), &inputs[..1]);

    // a larger standard credit lowers the settled tax by the difference
    assert_eq!(default[0].final_tax - custom[0].final_tax, dec!(20000));
}
