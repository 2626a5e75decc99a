//! Request handling for the projection endpoint
//!
//! Independent of the HTTP runtime: takes a method, path and query pairs and
//! returns a status plus JSON body. The Lambda binary adds headers and framing.

use std::time::Instant;

use log::{debug, error, info, warn};

use super::cache::{cache_key, ResponseCache};
use super::query::{ProjectionQuery, QueryErrors};
use super::response::{ErrorBody, ProjectionEnvelope, INTERNAL_ERROR_MESSAGE, INVALID_INPUT_MESSAGE};
use crate::config::ServiceConfig;
use crate::projection::ProjectionEngine;

/// Route served by the handler (trailing slash optional)
pub const PROJECTIONS_PATH: &str = "/api/projections/";

/// Methods accepted on [`PROJECTIONS_PATH`]
pub const ALLOWED_METHODS: &str = "GET, OPTIONS";

/// Status and body produced for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,

    /// JSON body; `None` for CORS preflight
    pub body: Option<String>,

    /// Seconds a client may cache the response
    pub max_age: Option<u64>,

    /// Whether the body came from the response cache
    pub cache_hit: bool,
}

impl ApiResponse {
    fn json(status: u16, body: String) -> Self {
        Self {
            status,
            body: Some(body),
            max_age: None,
            cache_hit: false,
        }
    }

    fn error(status: u16, body: ErrorBody<'_>) -> Self {
        Self::json(status, body.to_json())
    }

    fn preflight() -> Self {
        Self {
            status: 200,
            body: None,
            max_age: None,
            cache_hit: false,
        }
    }
}

/// Projection endpoint with an injected response cache
pub struct ProjectionHandler<C> {
    config: ServiceConfig,
    engine: ProjectionEngine,
    cache: C,
}

impl<C: ResponseCache> ProjectionHandler<C> {
    pub fn new(config: ServiceConfig, cache: C) -> Self {
        Self {
            config,
            engine: ProjectionEngine::new(),
            cache,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Route a request and produce its response
    pub fn handle<I, K, V>(&self, method: &str, path: &str, query: I) -> ApiResponse
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if path.trim_end_matches('/') != PROJECTIONS_PATH.trim_end_matches('/') {
            debug!("No route for {} {}", method, path);
            return ApiResponse::error(404, ErrorBody::message("Not found"));
        }

        match method {
            "OPTIONS" => ApiResponse::preflight(),
            "GET" => self.get_projection(query),
            other => {
                let message = format!("Method \"{}\" not allowed.", other);
                ApiResponse::error(405, ErrorBody::message(&message))
            }
        }
    }

    /// GET handler: parse, validate, project, render
    pub fn get_projection<I, K, V>(&self, query: I) -> ApiResponse
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let start = Instant::now();

        let query = match ProjectionQuery::parse(query, &self.config) {
            Ok(q) => q,
            Err(errors) => {
                warn!("Rejected projection query: {:?}", errors);
                return ApiResponse::error(400, ErrorBody::with_details(INVALID_INPUT_MESSAGE, &errors));
            }
        };

        let params = match query.into_parameters() {
            Ok(p) => p,
            Err(e) => {
                warn!("Rejected projection parameters: {}", e);
                let message = e.to_string();
                let details = QueryErrors::from(e);
                return ApiResponse::error(400, ErrorBody::with_details(&message, &details));
            }
        };

        let max_age = self.config.caching_enabled().then(|| self.config.cache_ttl.as_secs());
        let key = cache_key(&params);

        if let Some(body) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return ApiResponse {
                max_age,
                cache_hit: true,
                ..ApiResponse::json(200, body)
            };
        }
        debug!("Cache miss for {}", key);

        let result = match self.engine.project(&params) {
            Ok(r) => r,
            Err(e) => {
                error!("Unexpected error projecting {:?}: {}", params, e);
                return ApiResponse::error(500, ErrorBody::message(INTERNAL_ERROR_MESSAGE));
            }
        };

        let body = match serde_json::to_string(&ProjectionEnvelope::new(&result)) {
            Ok(b) => b,
            Err(e) => {
                error!("Failed to serialize projection for {:?}: {}", params, e);
                return ApiResponse::error(500, ErrorBody::message(INTERNAL_ERROR_MESSAGE));
            }
        };

        if max_age.is_some() {
            self.cache.put(key, body.clone());
        }

        info!(
            "Projected {} months (final value {:.2}) in {:?}",
            result.total_months(),
            result.final_value(),
            start.elapsed()
        );

        ApiResponse {
            max_age,
            ..ApiResponse::json(200, body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cache::{NoCache, TtlCache};
    use approx::assert_abs_diff_eq;
    use serde_json::Value;
    use std::time::Duration;

    const VALID: [(&str, &str); 3] = [("initial_amount", "1000"), ("monthly_deposit", "100"), ("interest_rate", "5")];

    fn handler() -> ProjectionHandler<TtlCache> {
        let config = ServiceConfig::default();
        let cache = TtlCache::new(config.cache_ttl, config.cache_max_entries);
        ProjectionHandler::new(config, cache)
    }

    fn body_json(response: &ApiResponse) -> Value {
        serde_json::from_str(response.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let response = handler().handle("GET", "/api/projections/", VALID);

        assert_eq!(response.status, 200);
        assert_eq!(response.max_age, Some(300));
        assert!(!response.cache_hit);

        let json = body_json(&response);
        assert_eq!(json["data"][0]["month"], 0);
        assert_eq!(json["data"][0]["value"], 1000.0);
        // years defaults to 50
        assert_eq!(json["data"].as_array().unwrap().len(), 601);
        assert_eq!(json["meta"]["total_months"], 600);
        assert_eq!(json["meta"]["parameters"]["years"], 50);
        assert_eq!(json["meta"]["final_value"], json["data"][600]["value"]);
    }

    #[test]
    fn test_custom_years_parameter() {
        let mut query = VALID.to_vec();
        query.push(("years", "5"));

        let response = handler().handle("GET", "/api/projections", query);
        assert_eq!(response.status, 200);

        let json = body_json(&response);
        assert_eq!(json["data"].as_array().unwrap().len(), 61);
        assert_eq!(json["meta"]["parameters"]["years"], 5);
    }

    #[test]
    fn test_known_projection_values() {
        let query = [
            ("initial_amount", "1000"),
            ("monthly_deposit", "100"),
            ("interest_rate", "12"),
            ("years", "1"),
        ];
        let json = body_json(&handler().handle("GET", "/api/projections/", query));

        assert_abs_diff_eq!(json["meta"]["final_value"].as_f64().unwrap(), 2395.08, epsilon = 0.1);
    }

    #[test]
    fn test_missing_parameters() {
        let response = handler().handle("GET", "/api/projections/", [("monthly_deposit", "100"), ("interest_rate", "5")]);

        assert_eq!(response.status, 400);
        let json = body_json(&response);
        assert_eq!(json["error"], "Invalid input parameters");
        assert_eq!(json["details"]["initial_amount"][0], "This field is required.");
    }

    #[test]
    fn test_invalid_parameter_values() {
        let query = [("initial_amount", "-1000"), ("monthly_deposit", "100"), ("interest_rate", "5")];
        let response = handler().handle("GET", "/api/projections/", query);

        assert_eq!(response.status, 400);
        let json = body_json(&response);
        assert!(json["error"].is_string());
        assert!(json["details"]["initial_amount"].is_array());
    }

    #[test]
    fn test_response_caching() {
        let handler = handler();

        let first = handler.handle("GET", "/api/projections/", VALID);
        let second = handler.handle("GET", "/api/projections/", VALID);

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);
        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(first.body, second.body);

        let stats = handler.cache().stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_caching_disabled() {
        let config = ServiceConfig {
            cache_ttl: Duration::ZERO,
            ..ServiceConfig::default()
        };
        let handler = ProjectionHandler::new(config, NoCache);

        let first = handler.handle("GET", "/api/projections/", VALID);
        let second = handler.handle("GET", "/api/projections/", VALID);

        assert_eq!(first.max_age, None);
        assert!(!second.cache_hit);
        assert_eq!(first.body, second.body);
    }

    #[test]
    fn test_cache_size_is_capped() {
        let config = ServiceConfig {
            cache_max_entries: 4,
            ..ServiceConfig::default()
        };
        let cache = TtlCache::new(config.cache_ttl, config.cache_max_entries);
        let handler = ProjectionHandler::new(config, cache);

        for amount in 0..20 {
            let initial_amount = amount.to_string();
            let query = [
                ("initial_amount", initial_amount.as_str()),
                ("monthly_deposit", "100"),
                ("interest_rate", "5"),
                ("years", "1"),
            ];
            assert_eq!(handler.handle("GET", "/api/projections/", query).status, 200);
        }

        assert_eq!(handler.cache().stats().entries, 4);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let handler = handler();
        handler.handle("GET", "/api/projections/", [("initial_amount", "x")]);

        assert_eq!(handler.cache().stats().entries, 0);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let query = [
            ("initial_amount", "1e25"),
            ("monthly_deposit", "0"),
            ("interest_rate", "1200"),
            ("years", "50"),
        ];
        let response = handler().handle("GET", "/api/projections/", query);

        assert_eq!(response.status, 500);
        assert_eq!(body_json(&response), serde_json::json!({ "error": "An unexpected error occurred" }));
    }

    #[test]
    fn test_routing() {
        let handler = handler();

        let preflight = handler.handle("OPTIONS", "/api/projections/", VALID);
        assert_eq!(preflight.status, 200);
        assert_eq!(preflight.body, None);

        let post = handler.handle("POST", "/api/projections/", VALID);
        assert_eq!(post.status, 405);
        assert_eq!(body_json(&post)["error"], "Method \"POST\" not allowed.");

        let missing = handler.handle("GET", "/api/other/", VALID);
        assert_eq!(missing.status, 404);
    }
}
