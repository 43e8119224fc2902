// Metrics endpoint for Prometheus
// Renders the recorder installed at startup

use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

/// Prometheus metrics endpoint
///
/// # Returns
///
/// Returns Prometheus-formatted metrics for monitoring
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "metrics",
    summary = "Prometheus metrics",
    description = "Export Prometheus metrics for monitoring and alerting",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain")
    )
)]
pub async fn get_prometheus_metrics(State(app_state): State<AppState>) -> Response {
    let metrics_text = app_state.metrics_handle.render();

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics_text,
    )
        .into_response()
}
