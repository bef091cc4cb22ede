//! Calculator form state.
//!
//! Holds what a user has typed, exactly as typed, plus the toggles and
//! counters of the calculator. Nothing here is computed; [`CalculatorForm::to_input`]
//! converts the form into a [`TaxInput`] for the engine.

use netpay_core::TaxInput;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::utils::{ParseAmountError, format_amount, parse_amount};

/// Annual salaries offered as one-click presets.
pub const SALARY_PRESETS: [Decimal; 6] = [
    dec!(30000000),
    dec!(40000000),
    dec!(50000000),
    dec!(60000000),
    dec!(80000000),
    dec!(100000000),
];

/// Free-text amount fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Salary,
    MonthlyAllowance,
    CreditCard,
    DebitCard,
    HousingSavings,
    MortgageInterest,
    Medical,
    Education,
}

impl AmountField {
    pub const ALL: [AmountField; 8] = [
        AmountField::Salary,
        AmountField::MonthlyAllowance,
        AmountField::CreditCard,
        AmountField::DebitCard,
        AmountField::HousingSavings,
        AmountField::MortgageInterest,
        AmountField::Medical,
        AmountField::Education,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AmountField::Salary => "Annual salary",
            AmountField::MonthlyAllowance => "Tax-free allowance (monthly)",
            AmountField::CreditCard => "Credit card spending",
            AmountField::DebitCard => "Debit card spending",
            AmountField::HousingSavings => "Housing savings",
            AmountField::MortgageInterest => "Mortgage interest",
            AmountField::Medical => "Medical expenses",
            AmountField::Education => "Education expenses",
        }
    }

    /// Whether the field belongs to the year-end settlement section.
    pub fn is_advanced(self) -> bool {
        !matches!(self, AmountField::Salary | AmountField::MonthlyAllowance)
    }
}

/// Counters of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// Household dependents including the filer; never below 1.
    Dependents,
    /// Children eligible for the child credit; never below 0.
    Children,
}

impl Counter {
    fn minimum(self) -> u32 {
        match self {
            Counter::Dependents => 1,
            Counter::Children => 0,
        }
    }
}

/// Everything the user can set on the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorForm {
    pub salary_text: String,
    pub allowance_text: String,
    pub retirement_included: bool,
    pub dependent_count: u32,
    pub child_count: u32,
    pub show_advanced: bool,
    pub credit_card_text: String,
    pub debit_card_text: String,
    pub housing_text: String,
    pub mortgage_text: String,
    pub medical_text: String,
    pub education_text: String,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self {
            salary_text: "50,000,000".to_string(),
            allowance_text: "200,000".to_string(),
            retirement_included: false,
            dependent_count: 1,
            child_count: 0,
            show_advanced: false,
            credit_card_text: String::new(),
            debit_card_text: String::new(),
            housing_text: String::new(),
            mortgage_text: String::new(),
            medical_text: String::new(),
            education_text: String::new(),
        }
    }
}

impl CalculatorForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(
        &self,
        field: AmountField,
    ) -> &str {
        match field {
            AmountField::Salary => &self.salary_text,
            AmountField::MonthlyAllowance => &self.allowance_text,
            AmountField::CreditCard => &self.credit_card_text,
            AmountField::DebitCard => &self.debit_card_text,
            AmountField::HousingSavings => &self.housing_text,
            AmountField::MortgageInterest => &self.mortgage_text,
            AmountField::Medical => &self.medical_text,
            AmountField::Education => &self.education_text,
        }
    }

    fn text_mut(
        &mut self,
        field: AmountField,
    ) -> &mut String {
        match field {
            AmountField::Salary => &mut self.salary_text,
            AmountField::MonthlyAllowance => &mut self.allowance_text,
            AmountField::CreditCard => &mut self.credit_card_text,
            AmountField::DebitCard => &mut self.debit_card_text,
            AmountField::HousingSavings => &mut self.housing_text,
            AmountField::MortgageInterest => &mut self.mortgage_text,
            AmountField::Medical => &mut self.medical_text,
            AmountField::Education => &mut self.education_text,
        }
    }

    /// Stores raw user text for `field`.
    ///
    /// Typing into an advanced field opens the advanced section.
    pub fn set_text(
        &mut self,
        field: AmountField,
        raw: &str,
    ) {
        if field.is_advanced() && !raw.trim().is_empty() {
            self.show_advanced = true;
        }
        *self.text_mut(field) = raw.to_string();
    }

    /// Parses the current text of `field`.
    pub fn amount(
        &self,
        field: AmountField,
    ) -> Result<Decimal, ParseAmountError> {
        parse_amount(self.text(field))
    }

    /// Rewrites every amount field with thousands separators.
    ///
    /// Fields without digits are cleared. A field that fails to parse is left
    /// untouched and its error returned after the others are rewritten.
    pub fn reformat(&mut self) -> Result<(), ParseAmountError> {
        let mut first_error = None;
        for field in AmountField::ALL {
            let text = self.text(field);
            if text.chars().all(|c| !c.is_ascii_digit()) {
                self.text_mut(field).clear();
                continue;
            }
            match parse_amount(text) {
                Ok(value) => *self.text_mut(field) = format_amount(value),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Sets the salary to a preset amount.
    pub fn apply_preset(
        &mut self,
        salary: Decimal,
    ) {
        debug!(salary = %salary, "salary preset applied");
        self.salary_text = format_amount(salary);
    }

    pub fn count(
        &self,
        counter: Counter,
    ) -> u32 {
        match counter {
            Counter::Dependents => self.dependent_count,
            Counter::Children => self.child_count,
        }
    }

    /// Sets a counter, raising it to the counter's minimum when needed.
    pub fn set_count(
        &mut self,
        counter: Counter,
        value: u32,
    ) {
        let value = value.max(counter.minimum());
        match counter {
            Counter::Dependents => self.dependent_count = value,
            Counter::Children => self.child_count = value,
        }
    }

    /// Builds engine input from the current form.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseAmountError`] among the amount fields.
    pub fn to_input(&self) -> Result<TaxInput, ParseAmountError> {
        Ok(TaxInput {
            annual_salary: self.amount(AmountField::Salary)?,
            retirement_included: self.retirement_included,
            dependent_count: self.dependent_count,
            child_count: self.child_count,
            monthly_tax_free_allowance: self.amount(AmountField::MonthlyAllowance)?,
            credit_card_annual: self.amount(AmountField::CreditCard)?,
            debit_card_annual: self.amount(AmountField::DebitCard)?,
            housing_savings_annual: self.amount(AmountField::HousingSavings)?,
            mortgage_interest_annual: self.amount(AmountField::MortgageInterest)?,
            medical_annual: self.amount(AmountField::Medical)?,
            education_annual: self.amount(AmountField::Education)?,
        })
    }
}
