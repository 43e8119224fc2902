// Utility functions
// Request inspection helpers

pub mod request_info;

pub use request_info::{extract_ip_address, extract_user_agent};
