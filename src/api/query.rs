//! Query-string parsing for projection requests
//!
//! Field errors are collected across all parameters so a client sees every
//! problem at once, keyed by field name.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::params::{ParameterError, ParameterField, SavingsParameters};

const REQUIRED: &str = "This field is required.";
const INVALID_NUMBER: &str = "A valid number is required.";
const INVALID_INTEGER: &str = "A valid integer is required.";

/// Field name -> messages for every query parameter that failed to parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} invalid query parameter(s)", .fields.len())]
pub struct QueryErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl QueryErrors {
    pub fn add(&mut self, field: ParameterField, message: impl Into<String>) {
        self.fields
            .entry(field.as_str().to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`
    pub fn get(&self, field: ParameterField) -> Option<&[String]> {
        self.fields.get(field.as_str()).map(Vec::as_slice)
    }
}

impl From<ParameterError> for QueryErrors {
    fn from(err: ParameterError) -> Self {
        let mut errors = QueryErrors::default();
        errors.add(err.field(), err.to_string());
        errors
    }
}

/// Parsed, range-checked query parameters, not yet validated as a savings plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionQuery {
    pub initial_amount: f64,
    pub monthly_deposit: f64,
    pub interest_rate: f64,
    pub years: i64,
}

impl ProjectionQuery {
    /// Parse key/value pairs; when a key repeats, the last value wins
    pub fn parse<I, K, V>(pairs: I, config: &ServiceConfig) -> Result<Self, QueryErrors>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let values: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        let lookup = |field: ParameterField| values.get(field.as_str()).map(String::as_str);

        let mut errors = QueryErrors::default();

        let initial_amount = amount_field(lookup(ParameterField::InitialAmount), ParameterField::InitialAmount, &mut errors);
        let monthly_deposit = amount_field(lookup(ParameterField::MonthlyDeposit), ParameterField::MonthlyDeposit, &mut errors);
        let interest_rate = amount_field(lookup(ParameterField::InterestRate), ParameterField::InterestRate, &mut errors);
        let years = years_field(lookup(ParameterField::Years), config, &mut errors);

        match (initial_amount, monthly_deposit, interest_rate, years) {
            (Some(initial_amount), Some(monthly_deposit), Some(interest_rate), Some(years)) if errors.is_empty() => Ok(Self {
                initial_amount,
                monthly_deposit,
                interest_rate,
                years,
            }),
            _ => Err(errors),
        }
    }

    /// Run the savings parameter validation on the parsed values
    pub fn into_parameters(self) -> Result<SavingsParameters, ParameterError> {
        SavingsParameters::new(self.initial_amount, self.monthly_deposit, self.interest_rate, self.years)
    }
}

/// Required real number, at least zero
fn amount_field(raw: Option<&str>, field: ParameterField, errors: &mut QueryErrors) -> Option<f64> {
    let Some(raw) = raw else {
        errors.add(field, REQUIRED);
        return None;
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value < 0.0 {
                errors.add(field, min_value_message(0));
                None
            } else {
                Some(value)
            }
        }
        _ => {
            errors.add(field, INVALID_NUMBER);
            None
        }
    }
}

/// Optional integer between 1 and the configured maximum
fn years_field(raw: Option<&str>, config: &ServiceConfig, errors: &mut QueryErrors) -> Option<i64> {
    let Some(raw) = raw else {
        return Some(i64::from(config.default_years));
    };

    let Some(years) = parse_integer(raw) else {
        errors.add(ParameterField::Years, INVALID_INTEGER);
        return None;
    };

    if years < 1 {
        errors.add(ParameterField::Years, min_value_message(1));
        None
    } else if years > i64::from(config.max_years) {
        errors.add(ParameterField::Years, max_value_message(config.max_years));
        None
    } else {
        Some(years)
    }
}

/// Integer parse that also accepts a zero fraction ("5.0", "5.")
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let digits = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => trimmed,
    };
    digits.parse().ok()
}

fn min_value_message(min: i64) -> String {
    format!("Ensure this value is greater than or equal to {}.", min)
}

fn max_value_message(max: u32) -> String {
    format!("Ensure this value is less than or equal to {}.", max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pairs: &[(&str, &str)]) -> Result<ProjectionQuery, QueryErrors> {
        ProjectionQuery::parse(pairs.iter().copied(), &ServiceConfig::default())
    }

    #[test]
    fn test_parse_valid_query() {
        let query = parse(&[
            ("initial_amount", "1000"),
            ("monthly_deposit", "100.5"),
            ("interest_rate", " 5 "),
            ("years", "5"),
        ])
        .unwrap();

        assert_eq!(query.initial_amount, 1000.0);
        assert_eq!(query.monthly_deposit, 100.5);
        assert_eq!(query.interest_rate, 5.0);
        assert_eq!(query.years, 5);
    }

    #[test]
    fn test_years_defaults_to_config() {
        let query = parse(&[("initial_amount", "1000"), ("monthly_deposit", "100"), ("interest_rate", "5")]).unwrap();
        assert_eq!(query.years, 50);

        let config = ServiceConfig {
            default_years: 20,
            ..ServiceConfig::default()
        };
        let query = ProjectionQuery::parse(
            [("initial_amount", "0"), ("monthly_deposit", "0"), ("interest_rate", "0")],
            &config,
        )
        .unwrap();
        assert_eq!(query.years, 20);
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let errors = parse(&[("interest_rate", "5")]).unwrap_err();

        assert_eq!(errors.get(ParameterField::InitialAmount), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get(ParameterField::MonthlyDeposit), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get(ParameterField::InterestRate), None);
        assert_eq!(errors.get(ParameterField::Years), None);
    }

    #[test]
    fn test_invalid_numbers() {
        let errors = parse(&[
            ("initial_amount", "abc"),
            ("monthly_deposit", ""),
            ("interest_rate", "nan"),
            ("years", "2.5"),
        ])
        .unwrap_err();

        assert_eq!(errors.get(ParameterField::InitialAmount).unwrap()[0], INVALID_NUMBER);
        assert_eq!(errors.get(ParameterField::MonthlyDeposit).unwrap()[0], INVALID_NUMBER);
        assert_eq!(errors.get(ParameterField::InterestRate).unwrap()[0], INVALID_NUMBER);
        assert_eq!(errors.get(ParameterField::Years).unwrap()[0], INVALID_INTEGER);
    }

    #[test]
    fn test_range_messages() {
        let errors = parse(&[
            ("initial_amount", "-1000"),
            ("monthly_deposit", "100"),
            ("interest_rate", "5"),
            ("years", "0"),
        ])
        .unwrap_err();

        assert_eq!(
            errors.get(ParameterField::InitialAmount).unwrap()[0],
            "Ensure this value is greater than or equal to 0."
        );
        assert_eq!(
            errors.get(ParameterField::Years).unwrap()[0],
            "Ensure this value is greater than or equal to 1."
        );

        let errors = parse(&[
            ("initial_amount", "1"),
            ("monthly_deposit", "1"),
            ("interest_rate", "1"),
            ("years", "101"),
        ])
        .unwrap_err();
        assert_eq!(
            errors.get(ParameterField::Years).unwrap()[0],
            "Ensure this value is less than or equal to 100."
        );
    }

    #[test]
    fn test_integer_with_zero_fraction() {
        assert_eq!(parse_integer("5.0"), Some(5));
        assert_eq!(parse_integer("5."), Some(5));
        assert_eq!(parse_integer(" 12 "), Some(12));
        assert_eq!(parse_integer("5.01"), None);
        assert_eq!(parse_integer("five"), None);
    }

    #[test]
    fn test_last_value_wins() {
        let query = parse(&[
            ("initial_amount", "1"),
            ("initial_amount", "2"),
            ("monthly_deposit", "0"),
            ("interest_rate", "0"),
        ])
        .unwrap();

        assert_eq!(query.initial_amount, 2.0);
    }

    #[test]
    fn test_errors_serialize_as_field_map() {
        let errors = parse(&[("monthly_deposit", "1"), ("interest_rate", "1")]).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json, serde_json::json!({ "initial_amount": [REQUIRED] }));
    }

    #[test]
    fn test_parameter_error_conversion() {
        let errors = QueryErrors::from(ParameterError::NonPositiveYears);
        assert_eq!(
            errors.get(ParameterField::Years),
            Some(&["Years must be greater than zero".to_string()][..])
        );
    }
}
