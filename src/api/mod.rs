//! HTTP-facing layer: query parsing, response bodies, caching and routing

pub mod cache;
mod handler;
pub mod query;
pub mod response;

pub use cache::{NoCache, ResponseCache, TtlCache};
pub use handler::{ApiResponse, ProjectionHandler, ALLOWED_METHODS, PROJECTIONS_PATH};
pub use query::{ProjectionQuery, QueryErrors};
