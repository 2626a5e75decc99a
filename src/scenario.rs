//! Scenario runner for batch projections
//!
//! Projects many parameter sets at once, e.g. a sweep over interest rates for
//! the same deposit plan. Each projection is independent, so batches are spread
//! across rayon's thread pool.

use rayon::prelude::*;
use thiserror::Error;

use crate::params::{ParameterError, SavingsParameters};
use crate::projection::{ProjectionEngine, ProjectionError, ProjectionResult};

/// Batch runner around a shared [`ProjectionEngine`]
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let base = SavingsParameters::new(10_000.0, 200.0, 5.0, 30)?;
///
/// for result in runner.run_rate_sweep(&base, &[3.0, 5.0, 7.0])? {
///     println!("{:.2}", result.final_value());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: ProjectionEngine) -> Self {
        Self { engine }
    }

    /// Run a single projection
    pub fn run(&self, params: &SavingsParameters) -> Result<ProjectionResult, ProjectionError> {
        self.engine.project(params)
    }

    /// Run projections for many parameter sets in parallel, preserving input order
    pub fn run_batch(&self, scenarios: &[SavingsParameters]) -> Result<Vec<ProjectionResult>, ProjectionError> {
        scenarios
            .par_iter()
            .map(|params| self.engine.project(params))
            .collect()
    }

    /// Project `base` once per annual rate in `rates`, keeping everything else fixed
    pub fn run_rate_sweep(&self, base: &SavingsParameters, rates: &[f64]) -> Result<Vec<ProjectionResult>, ScenarioError> {
        let scenarios = rates
            .iter()
            .map(|&rate| {
                SavingsParameters::new(
                    base.initial_amount(),
                    base.monthly_deposit(),
                    rate,
                    i64::from(base.years()),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.run_batch(&scenarios)?)
    }
}

/// Failure building or projecting a scenario batch
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
