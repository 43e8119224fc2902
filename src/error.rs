use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::request_logger::current_request_id;
use crate::services::availability::AvailabilityError;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum ErrorCode {
    // Validation errors (3xxx)
    #[serde(rename = "VAL_3002")]
    MissingRequiredField,
    #[serde(rename = "VAL_3003")]
    InvalidFormat,
    #[serde(rename = "VAL_3004")]
    CoordinatesOutOfRange,
    #[serde(rename = "VAL_3005")]
    PayloadTooLarge,

    // Resource errors (4xxx)
    #[serde(rename = "RES_4001")]
    NotFound,

    // Rate limiting errors (9xxx)
    #[serde(rename = "RATE_9001")]
    RateLimitExceeded,

    // Internal errors (9xxx)
    #[serde(rename = "INT_9998")]
    DatasetError,
    #[serde(rename = "INT_9997")]
    RequestTimeout,
}

impl ErrorCode {
    /// Get numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::MissingRequiredField => 3002,
            ErrorCode::InvalidFormat => 3003,
            ErrorCode::CoordinatesOutOfRange => 3004,
            ErrorCode::PayloadTooLarge => 3005,
            ErrorCode::NotFound => 4001,
            ErrorCode::RateLimitExceeded => 9001,
            ErrorCode::DatasetError => 9998,
            ErrorCode::RequestTimeout => 9997,
        }
    }

    /// Get user-friendly message
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::MissingRequiredField => "Required field is missing",
            ErrorCode::InvalidFormat => "Invalid format provided",
            ErrorCode::CoordinatesOutOfRange => "Coordinates out of range",
            ErrorCode::PayloadTooLarge => "Request body is too large",
            ErrorCode::NotFound => "Not found",
            ErrorCode::RateLimitExceeded => "Rate limit exceeded. Please try again later",
            ErrorCode::DatasetError => "Internal server error",
            ErrorCode::RequestTimeout => "Request timed out",
        }
    }
}

/// Error body returned by every failing endpoint.
///
/// `error` is always a human-readable string so clients can display it as is.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorCode,
    pub code_number: u16,
    pub request_id: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{1}")]
    Validation(ErrorCode, String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("Availability error: {0}")]
    Availability(#[from] AvailabilityError),

    #[error("Request timed out")]
    Timeout,
}

impl ApiError {
    /// Create a 400 error carrying a specific validation code
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError::Validation(code, message.into())
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::Validation(code, _) => *code,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::RateLimitExceeded { .. } => ErrorCode::RateLimitExceeded,
            ApiError::Availability(_) => ErrorCode::DatasetError,
            ApiError::Timeout => ErrorCode::RequestTimeout,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(ErrorCode::PayloadTooLarge, _) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Validation(_, _) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Availability(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client. Server-side detail never leaks.
    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(_, msg) => msg.clone(),
            ApiError::NotFound(_) => ErrorCode::NotFound.message().to_string(),
            other => other.error_code().message().to_string(),
        }
    }

    /// Log error with appropriate level
    fn log_error(&self, request_id: &str) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(
                    request_id = %request_id,
                    error = %self,
                    "Server error occurred"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    request_id = %request_id,
                    error = %self,
                    "Client error occurred"
                );
            }
            _ => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = current_request_id().unwrap_or_else(|| Uuid::new_v4().to_string());
        let status = self.status_code();
        let code = self.error_code();

        self.log_error(&request_id);

        let retry_after = match &self {
            ApiError::RateLimitExceeded {
                retry_after_seconds,
            } => Some(*retry_after_seconds),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.public_message(),
            code,
            code_number: code.code(),
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            retry_after,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert("Retry-After", HeaderValue::from(seconds));
        }

        response
    }
}

/// Handle Axum JSON rejections and convert to structured API errors
pub fn handle_rejection(err: JsonRejection) -> ApiError {
    match err {
        JsonRejection::BytesRejection(ref e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            ApiError::validation(ErrorCode::PayloadTooLarge, ErrorCode::PayloadTooLarge.message())
        }
        // Missing content type, unreadable or malformed bodies all mean no usable data
        _ => ApiError::validation(ErrorCode::MissingRequiredField, "No data provided"),
    }
}

/// Fallback for unknown routes
pub async fn not_found_fallback(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
