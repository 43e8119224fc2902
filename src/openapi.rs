use utoipa::OpenApi;

use crate::error::{ErrorCode, ErrorResponse};
use crate::handlers::HealthStatus;
use crate::models::{BuildingResult, BuildingRoom, RoomSlot, SlotStatus, UserLocation};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Study Space Finder API",
        description = "Open classroom availability by campus building, optionally sorted by distance",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Classrooms
        crate::handlers::open_classrooms::list_open_classrooms,
        crate::handlers::open_classrooms::nearby_open_classrooms,

        // Health & Metrics
        crate::handlers::health::health_check,
        crate::handlers::metrics::get_prometheus_metrics,
    ),
    components(
        schemas(
            BuildingResult,
            BuildingRoom,
            RoomSlot,
            SlotStatus,
            UserLocation,
            HealthStatus,
            ErrorResponse,
            ErrorCode,
        )
    ),
    tags(
        (name = "classrooms", description = "Open classroom lookup"),
        (name = "health", description = "Service health"),
        (name = "metrics", description = "Prometheus metrics")
    )
)]
pub struct ApiDoc;

/// GET /api/docs/openapi.json
pub async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
