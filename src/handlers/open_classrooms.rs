//! Open classroom endpoints.
//!
//! `GET` returns every building with usable rooms in dataset order. `POST`
//! takes the caller's position and returns the same list nearest first.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::{handle_rejection, ApiError, ErrorCode, ErrorResponse};
use crate::models::{BuildingResult, UserLocation};
use crate::services::find_open_classrooms;

const MISSING_COORDINATES: &str = "Invalid location data. 'lat' and 'lng' are required.";
const NON_NUMERIC_COORDINATES: &str = "Invalid location data. 'lat' and 'lng' must be numbers.";
const COORDINATES_OUT_OF_RANGE: &str = "Invalid location data. 'lat' or 'lng' out of range.";

/// List buildings with open or soon-open rooms
#[utoipa::path(
    get,
    path = "/api/open-classrooms",
    tag = "classrooms",
    responses(
        (status = 200, description = "Buildings in dataset order, distance 0", body = Vec<BuildingResult>),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_open_classrooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<BuildingResult>>, ApiError> {
    let buildings = find_open_classrooms(&state.dataset, state.current_time(), None)?;
    Ok(Json(buildings))
}

/// List buildings with open rooms, nearest to the caller first
#[utoipa::path(
    post,
    path = "/api/open-classrooms",
    tag = "classrooms",
    request_body = UserLocation,
    responses(
        (status = 200, description = "Buildings sorted by distance in km", body = Vec<BuildingResult>),
        (status = 400, description = "Missing, non-numeric or out-of-range coordinates", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn nearby_open_classrooms(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<BuildingResult>>, ApiError> {
    let Json(payload) = payload.map_err(handle_rejection)?;
    let location = parse_location(&payload)?;

    info!(lat = location.lat, lng = location.lng, "Open classrooms requested by location");

    let buildings =
        find_open_classrooms(&state.dataset, state.current_time(), Some(location.into()))?;
    Ok(Json(buildings))
}

/// Extract and validate `lat`/`lng` from a request body
pub fn parse_location(payload: &Value) -> Result<UserLocation, ApiError> {
    let object = match payload {
        Value::Null => {
            return Err(ApiError::validation(
                ErrorCode::MissingRequiredField,
                "No data provided",
            ))
        }
        Value::Object(object) => object,
        _ => {
            return Err(ApiError::validation(
                ErrorCode::MissingRequiredField,
                MISSING_COORDINATES,
            ))
        }
    };

    let (Some(lat), Some(lng)) = (
        object.get("lat").filter(|value| !value.is_null()),
        object.get("lng").filter(|value| !value.is_null()),
    ) else {
        return Err(ApiError::validation(
            ErrorCode::MissingRequiredField,
            MISSING_COORDINATES,
        ));
    };

    let (Some(lat), Some(lng)) = (coordinate(lat), coordinate(lng)) else {
        return Err(ApiError::validation(
            ErrorCode::InvalidFormat,
            NON_NUMERIC_COORDINATES,
        ));
    };

    let location = UserLocation { lat, lng };
    if !location.is_finite() || location.validate().is_err() {
        return Err(ApiError::validation(
            ErrorCode::CoordinatesOutOfRange,
            COORDINATES_OUT_OF_RANGE,
        ));
    }

    Ok(location)
}

/// Numbers, and strings holding a decimal number, are accepted
fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}
