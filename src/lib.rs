//! Savings Projection - monthly compound interest projections for a savings plan
//!
//! This library provides:
//! - Validated savings parameters (initial amount, monthly deposit, annual rate, years)
//! - Closed-form month-by-month projection with half-up decimal rounding
//! - Batch and rate-sweep projections across a thread pool
//! - A runtime-independent HTTP handler with response caching

pub mod api;
pub mod config;
pub mod params;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use params::{ParameterError, ParameterField, SavingsParameters};
pub use projection::{ProjectionEngine, ProjectionError, ProjectionPoint, ProjectionResult, ProjectionSummary};
pub use scenario::ScenarioRunner;
