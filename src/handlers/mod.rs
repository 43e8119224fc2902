pub mod health;
pub mod metrics;
pub mod open_classrooms;

// Re-export commonly used types
pub use health::{health_check, HealthStatus};
pub use open_classrooms::{list_open_classrooms, nearby_open_classrooms, parse_location};
