use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A row in an ordered, upper-bounded lookup table.
///
/// Tables are scanned in ascending order and the first row whose `limit` is at
/// or above the looked-up value applies. The last row of a valid table is
/// unbounded (`limit` is `None`).
pub trait Banded {
    fn limit(&self) -> Option<Decimal>;

    fn contains(
        &self,
        value: Decimal,
    ) -> bool {
        self.limit().is_none_or(|limit| value <= limit)
    }
}

/// Progressive income tax bracket.
///
/// Tax for a taxable income in this bracket is `income × rate − deduction`;
/// the deduction constant already folds in every lower bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub limit: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}

/// Earned-income deduction band: `base + (total_pay − lower) × rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedIncomeBand {
    pub limit: Option<Decimal>,
    pub lower: Decimal,
    pub base: Decimal,
    pub rate: Decimal,
}

/// Earned-income tax credit ceiling band.
///
/// The ceiling is `start − (total_pay − lower) × slope`, never below `floor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCapBand {
    pub limit: Option<Decimal>,
    pub lower: Decimal,
    pub start: Decimal,
    pub slope: Decimal,
    pub floor: Decimal,
}

/// Income-dependent ceiling on the card usage deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCapBand {
    pub limit: Option<Decimal>,
    pub cap: Decimal,
}

impl Banded for TaxBracket {
    fn limit(&self) -> Option<Decimal> {
        self.limit
    }
}

impl Banded for EarnedIncomeBand {
    fn limit(&self) -> Option<Decimal> {
        self.limit
    }
}

impl Banded for CreditCapBand {
    fn limit(&self) -> Option<Decimal> {
        self.limit
    }
}

impl Banded for CardCapBand {
    fn limit(&self) -> Option<Decimal> {
        self.limit
    }
}
