//! JSON response bodies

use serde::Serialize;

use super::query::QueryErrors;
use crate::params::SavingsParameters;
use crate::projection::{ProjectionPoint, ProjectionResult};

/// Message returned for any internal failure; details stay in the logs
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Message returned when query parameters fail to parse
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input parameters";

/// Successful projection: `{"data": [...], "meta": {...}}`
#[derive(Debug, Serialize)]
pub struct ProjectionEnvelope<'a> {
    pub data: &'a [ProjectionPoint],
    pub meta: ProjectionMeta<'a>,
}

#[derive(Debug, Serialize)]
pub struct ProjectionMeta<'a> {
    pub total_months: u32,
    pub final_value: f64,
    pub parameters: &'a SavingsParameters,
}

impl<'a> ProjectionEnvelope<'a> {
    pub fn new(result: &'a ProjectionResult) -> Self {
        Self {
            data: result.points(),
            meta: ProjectionMeta {
                total_months: result.total_months(),
                final_value: result.final_value(),
                parameters: result.parameters(),
            },
        }
    }
}

/// Error body: `{"error": "...", "details": {...}}`
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a QueryErrors>,
}

impl<'a> ErrorBody<'a> {
    pub fn message(error: &'a str) -> Self {
        Self { error, details: None }
    }

    pub fn with_details(error: &'a str, details: &'a QueryErrors) -> Self {
        Self {
            error,
            details: Some(details),
        }
    }

    /// Serialize to JSON
    ///
    /// Falls back to a hand-built body so an error response can always be sent.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, INTERNAL_ERROR_MESSAGE))
    }
}
