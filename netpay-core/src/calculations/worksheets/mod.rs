//! Payroll worksheet implementations.
//!
//! Each worksheet borrows the part of the [`RateSchedule`](crate::RateSchedule)
//! it needs and computes one stage of the net-pay calculation. The
//! [`TaxEngine`](crate::calculations::TaxEngine) chains them together.

pub mod credits;
pub mod deductions;
pub mod income_tax;
pub mod insurance;

pub use credits::TaxCreditWorksheet;
pub use deductions::{IncomeDeductionWorksheet, IncomeDeductions};
pub use income_tax::IncomeTaxWorksheet;
pub use insurance::{SocialInsurancePremiums, SocialInsuranceWorksheet};
