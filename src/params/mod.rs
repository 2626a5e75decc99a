//! Savings parameters and their validation

mod data;

pub use data::{ParameterError, ParameterField, SavingsParameters};
