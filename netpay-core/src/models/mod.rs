mod rate_schedule;
mod tax_bracket;
mod tax_input;
mod tax_result;

pub use rate_schedule::{
    CreditRules, DeductionRules, RateSchedule, RateScheduleError, SocialInsuranceRates,
};
pub use tax_bracket::{Banded, CardCapBand, CreditCapBand, EarnedIncomeBand, TaxBracket};
pub use tax_input::{MAX_AMOUNT, TaxInput};
pub use tax_result::{DAYS_PER_MONTH, HOURS_PER_MONTH, TaxResult};
