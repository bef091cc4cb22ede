//! Net-pay calculation modules.
//!
//! The [`TaxEngine`] runs the worksheets in order: social insurance premiums,
//! income deductions, the bracket tax, then tax credits. Shared rounding and
//! table helpers live in [`common`].

pub mod common;
pub mod engine;
pub mod worksheets;

pub use engine::{TaxEngine, compute};
pub use worksheets::{
    IncomeDeductionWorksheet, IncomeDeductions, IncomeTaxWorksheet, SocialInsurancePremiums,
    SocialInsuranceWorksheet, TaxCreditWorksheet,
};
