//! Router configuration.
//!
//! All routes share one middleware stack: tracing, request IDs, JSON error
//! bodies, security headers, CORS, timeouts, metrics, rate limiting and a
//! body size limit.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::app_state::AppState;
use crate::error::not_found_fallback;
use crate::handlers::{self, health, open_classrooms};
use crate::middleware;
use crate::openapi;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let config = &app_state.config;

    let api = Router::new()
        .route(
            "/api/open-classrooms",
            get(open_classrooms::list_open_classrooms).post(open_classrooms::nearby_open_classrooms),
        )
        .route("/api/health", get(health::health_check))
        .route("/api/docs/openapi.json", get(openapi::openapi_json))
        .route("/metrics", get(handlers::metrics::get_prometheus_metrics))
        .fallback(not_found_fallback);

    api.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(from_fn(middleware::request_logger_middleware))
            .layer(from_fn(middleware::json_error_bodies))
            .layer(from_fn(middleware::add_security_headers))
            .layer(cors_layer(&config.cors_origins))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.request_timeout),
            ))
            .layer(from_fn(middleware::metrics_middleware))
            .layer(from_fn_with_state(
                app_state.clone(),
                middleware::rate_limit_middleware,
            ))
            .layer(DefaultBodyLimit::max(config.max_content_length))
            .layer(RequestBodyLimitLayer::new(config.max_content_length)),
    )
    .with_state(app_state)
}

/// CORS for the configured origins only. No origins means same-origin only.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
