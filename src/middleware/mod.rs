// Middleware module - logging, metrics, rate limiting, security headers, error bodies

pub mod error_bodies;
pub mod metrics;
pub mod rate_limit;
pub mod request_logger;
pub mod security_headers;

pub use error_bodies::json_error_bodies;
pub use metrics::metrics_middleware;
pub use rate_limit::{rate_limit_middleware, RateLimiter};
pub use request_logger::{current_request_id, request_logger_middleware};
pub use security_headers::add_security_headers;
