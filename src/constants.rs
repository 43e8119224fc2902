//! Application constants and configuration defaults.
//!
//! This module centralizes hardcoded values so the availability rules,
//! geographic bounds and HTTP defaults live in one place.

/// Slot availability constants
pub mod availability {
    /// A slot starting within this many minutes is reported as upcoming
    pub const UPCOMING_WINDOW_MINUTES: f64 = 20.0;

    /// Wall-clock format used by the dataset (`HH:MM:SS`)
    pub const SLOT_TIME_FORMAT: &str = "%H:%M:%S";
}

/// Geographic constants
pub mod geo {
    /// Mean Earth radius used by the haversine formula
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Latitude bounds in decimal degrees
    pub const MIN_LATITUDE: f64 = -90.0;
    pub const MAX_LATITUDE: f64 = 90.0;

    /// Longitude bounds in decimal degrees
    pub const MIN_LONGITUDE: f64 = -180.0;
    pub const MAX_LONGITUDE: f64 = 180.0;
}

/// Rate limiting constants
pub mod rate_limit {
    /// Default limit expression, `N per <unit>`
    pub const DEFAULT_RATE_LIMIT: &str = "60 per minute";

    /// Maximum requests per client per window
    pub const MAX_REQUESTS_PER_IP: u32 = 60;

    /// Window size in seconds
    pub const WINDOW_SIZE_SECONDS: u64 = 60;
}

/// HTTP constants
pub mod http {
    /// Default bind host
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default bind port
    pub const DEFAULT_PORT: u16 = 8080;

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Maximum request body size in bytes (1MB)
    pub const MAX_BODY_SIZE: usize = 1024 * 1024;

    /// Request ID header name
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
}

/// Dataset constants
pub mod data {
    /// Bundled dataset location, relative to the working directory
    pub const DEFAULT_DATA_PATH: &str = "data/study_spaces.json";
}
