//! Projection engine for monthly savings growth

mod engine;
mod points;
mod rounding;

pub use engine::{ProjectionEngine, ProjectionError};
pub use points::{ProjectionPoint, ProjectionResult, ProjectionSummary};
pub use rounding::{round_half_up, DISPLAY_DECIMAL_PLACES};
