//! Projection output structures

use serde::{Deserialize, Serialize};

use super::rounding::{round_half_up, DISPLAY_DECIMAL_PLACES};
use crate::params::SavingsParameters;

/// Account balance at the end of one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Month index, 0 is immediately after the initial deposit
    pub month: u32,

    /// Balance rounded to two decimal places
    pub value: f64,
}

/// Complete projection: one point per month from 0 to `total_months`, ascending
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    parameters: SavingsParameters,
    points: Vec<ProjectionPoint>,
}

impl ProjectionResult {
    pub(crate) fn new(parameters: SavingsParameters, points: Vec<ProjectionPoint>) -> Self {
        Self { parameters, points }
    }

    /// Parameters this projection was computed from
    pub fn parameters(&self) -> &SavingsParameters {
        &self.parameters
    }

    /// Monthly points, month 0 first
    pub fn points(&self) -> &[ProjectionPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<ProjectionPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of months after month 0
    pub fn total_months(&self) -> u32 {
        self.parameters.total_months()
    }

    /// Balance at the final month
    pub fn final_value(&self) -> f64 {
        self.points.last().map(|p| p.value).unwrap_or(0.0)
    }

    /// Point for a given month, if inside the horizon
    pub fn at_month(&self, month: u32) -> Option<&ProjectionPoint> {
        self.points.get(month as usize)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_months = self.total_months();
        let final_value = self.final_value();

        let contributions = self.parameters.initial_amount()
            + self.parameters.monthly_deposit() * f64::from(total_months);
        let total_contributions = round_half_up(contributions, DISPLAY_DECIMAL_PLACES).unwrap_or(contributions);
        let interest = final_value - total_contributions;
        let total_interest = round_half_up(interest, DISPLAY_DECIMAL_PLACES).unwrap_or(interest);

        ProjectionSummary {
            total_months,
            final_value,
            total_contributions,
            total_interest,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub final_value: f64,

    /// Initial amount plus every monthly deposit
    pub total_contributions: f64,

    /// Growth earned on top of contributions
    pub total_interest: f64,
}
