//! AWS Lambda handler for the savings projection endpoint
//!
//! Serves `GET /api/projections/?initial_amount=..&monthly_deposit=..&interest_rate=..[&years=..]`
//! through a Lambda Function URL. Configuration comes from the environment
//! (see `savings_projection::config`).

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use log::info;
use savings_projection::api::{ApiResponse, NoCache, ProjectionHandler, ResponseCache, TtlCache, ALLOWED_METHODS};
use savings_projection::ServiceConfig;
use std::sync::Arc;

type Handler = ProjectionHandler<Box<dyn ResponseCache>>;

fn to_lambda_response(api: ApiResponse) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder()
        .status(api.status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
        .header("Access-Control-Allow-Headers", "Content-Type");

    if let Some(max_age) = api.max_age {
        builder = builder.header("Cache-Control", format!("max-age={}", max_age));
    }
    if api.status == 405 {
        builder = builder.header("Allow", ALLOWED_METHODS);
    }

    let body = match api.body {
        Some(text) => Body::Text(text),
        None => Body::Empty,
    };

    Ok(builder.body(body)?)
}

/// Lambda handler function
async fn handler(projections: &Handler, event: Request) -> Result<Response<Body>, Error> {
    let query = event.query_string_parameters();
    let response = projections.handle(event.method().as_str(), event.uri().path(), query.iter());

    to_lambda_response(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = ServiceConfig::from_env()?;
    info!("Starting projection handler with {:?}", config);

    let cache: Box<dyn ResponseCache> = if config.caching_enabled() {
        Box::new(TtlCache::new(config.cache_ttl, config.cache_max_entries))
    } else {
        Box::new(NoCache)
    };
    let projections = Arc::new(ProjectionHandler::new(config, cache));

    run(service_fn(move |event: Request| {
        let projections = Arc::clone(&projections);
        async move { handler(&projections, event).await }
    }))
    .await
}
