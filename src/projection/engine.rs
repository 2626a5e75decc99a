//! Closed-form compound interest projection
//!
//! Every month is evaluated directly from the annuity formulas instead of
//! rolling a balance forward, so long horizons do not accumulate float drift:
//!
//! - principal: `P * (1 + r)^m`
//! - deposits:  `D * ((1 + r)^m - 1) / r`, or `D * m` when `r == 0`
//!
//! with the deposit term forced to zero at month 0. `(1 + r)^m` is evaluated
//! as `exp(m * ln_1p(r))` and the annuity numerator with `exp_m1`, so rates
//! far below `f64::EPSILON` still grow deposits correctly.

use thiserror::Error;

use super::points::{ProjectionPoint, ProjectionResult};
use super::rounding::{round_half_up, DISPLAY_DECIMAL_PLACES};
use crate::params::SavingsParameters;

/// Internal failure while projecting already-validated parameters
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    #[error("projected value {value} at month {month} cannot be represented")]
    Computation { month: u32, value: f64 },
}

/// Main projection engine
///
/// Stateless; a single instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionEngine;

impl ProjectionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Project monthly balances for `params`, months `0..=years * 12`
    pub fn project(&self, params: &SavingsParameters) -> Result<ProjectionResult, ProjectionError> {
        let monthly_rate = params.monthly_rate();
        let months = 0..=params.total_months();

        let log_rate = monthly_rate.ln_1p();

        // ln((1 + r)^m) for every month
        let log_growth: Vec<f64> = months.clone().map(|m| f64::from(m) * log_rate).collect();

        let points = months
            .zip(&log_growth)
            .map(|(month, &log_factor)| {
                let principal = params.initial_amount() * log_factor.exp();
                let deposits = deposit_growth(params.monthly_deposit(), monthly_rate, month, log_factor);
                let value = principal + deposits;

                round_half_up(value, DISPLAY_DECIMAL_PLACES)
                    .map(|value| ProjectionPoint { month, value })
                    .ok_or(ProjectionError::Computation { month, value })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProjectionResult::new(*params, points))
    }
}

/// Future value of the deposits made up to `month`
fn deposit_growth(monthly_deposit: f64, monthly_rate: f64, month: u32, log_factor: f64) -> f64 {
    // No contribution has happened yet at the starting instant
    if month == 0 {
        return 0.0;
    }

    if monthly_rate > 0.0 {
        monthly_deposit * log_factor.exp_m1() / monthly_rate
    } else {
        monthly_deposit * f64::from(month)
    }
}
