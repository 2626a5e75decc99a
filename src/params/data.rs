//! Validated savings parameter record

use serde::Serialize;
use thiserror::Error;

/// Input field of a projection request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterField {
    InitialAmount,
    MonthlyDeposit,
    InterestRate,
    Years,
}

impl ParameterField {
    /// All fields in validation order
    pub const ALL: [ParameterField; 4] = [
        ParameterField::InitialAmount,
        ParameterField::MonthlyDeposit,
        ParameterField::InterestRate,
        ParameterField::Years,
    ];

    /// Wire name used in query strings and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterField::InitialAmount => "initial_amount",
            ParameterField::MonthlyDeposit => "monthly_deposit",
            ParameterField::InterestRate => "interest_rate",
            ParameterField::Years => "years",
        }
    }

    /// Human-readable label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            ParameterField::InitialAmount => "Initial amount",
            ParameterField::MonthlyDeposit => "Monthly deposit",
            ParameterField::InterestRate => "Interest rate",
            ParameterField::Years => "Years",
        }
    }
}

/// An input value that violates a parameter constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("Initial amount cannot be negative")]
    NegativeInitialAmount,

    #[error("Monthly deposit cannot be negative")]
    NegativeMonthlyDeposit,

    #[error("Interest rate cannot be negative")]
    NegativeInterestRate,

    #[error("Years must be greater than zero")]
    NonPositiveYears,

    #[error("Years is too large to project")]
    YearsOutOfRange,

    #[error("{} must be a finite number", .0.label())]
    NotFinite(ParameterField),
}

impl ParameterError {
    /// The field whose value triggered this error
    pub fn field(&self) -> ParameterField {
        match self {
            ParameterError::NegativeInitialAmount => ParameterField::InitialAmount,
            ParameterError::NegativeMonthlyDeposit => ParameterField::MonthlyDeposit,
            ParameterError::NegativeInterestRate => ParameterField::InterestRate,
            ParameterError::NonPositiveYears | ParameterError::YearsOutOfRange => ParameterField::Years,
            ParameterError::NotFinite(field) => *field,
        }
    }
}

/// Inputs for a single savings projection
///
/// Fields are private so a value of this type is always one that passed
/// [`SavingsParameters::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsParameters {
    /// Principal deposited at month 0
    initial_amount: f64,

    /// Contribution at the end of every month from month 1
    monthly_deposit: f64,

    /// Nominal annual rate in percent (12.0 = 12%/year)
    interest_rate: f64,

    /// Projection horizon in years
    years: u32,
}

impl SavingsParameters {
    /// Validate raw inputs, checking fields in order and failing on the first violation
    pub fn new(
        initial_amount: f64,
        monthly_deposit: f64,
        interest_rate: f64,
        years: i64,
    ) -> Result<Self, ParameterError> {
        check_amount(initial_amount, ParameterField::InitialAmount, ParameterError::NegativeInitialAmount)?;
        check_amount(monthly_deposit, ParameterField::MonthlyDeposit, ParameterError::NegativeMonthlyDeposit)?;
        check_amount(interest_rate, ParameterField::InterestRate, ParameterError::NegativeInterestRate)?;

        if years <= 0 {
            return Err(ParameterError::NonPositiveYears);
        }
        // total months must fit in a u32
        let years = u32::try_from(years)
            .ok()
            .filter(|y| y.checked_mul(12).is_some())
            .ok_or(ParameterError::YearsOutOfRange)?;

        Ok(Self {
            initial_amount,
            monthly_deposit,
            interest_rate,
            years,
        })
    }

    pub fn initial_amount(&self) -> f64 {
        self.initial_amount
    }

    pub fn monthly_deposit(&self) -> f64 {
        self.monthly_deposit
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    /// Monthly rate as a decimal (12% annual -> 0.01)
    pub fn monthly_rate(&self) -> f64 {
        self.interest_rate / 100.0 / 12.0
    }

    /// Number of projected months after month 0
    pub fn total_months(&self) -> u32 {
        self.years * 12
    }
}

fn check_amount(value: f64, field: ParameterField, negative: ParameterError) -> Result<(), ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::NotFinite(field));
    }
    if value < 0.0 {
        return Err(negative);
    }
    Ok(())
}
