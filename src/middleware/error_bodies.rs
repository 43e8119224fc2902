use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::{ApiError, ErrorCode};

/// Rewrite bare 408/413 responses from tower layers into JSON error bodies
pub async fn json_error_bodies(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;

    if is_json(&response) {
        return response;
    }

    let replacement = match response.status() {
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout,
        StatusCode::PAYLOAD_TOO_LARGE => {
            ApiError::validation(ErrorCode::PayloadTooLarge, ErrorCode::PayloadTooLarge.message())
        }
        _ => return response,
    };

    debug!(status = %response.status(), "Replacing layer error body");
    replacement.into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}
