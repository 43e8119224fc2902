use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::rate_limit::{MAX_REQUESTS_PER_IP, WINDOW_SIZE_SECONDS};

/// Per-client request budget, e.g. `60 per minute`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed inside one window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: MAX_REQUESTS_PER_IP,
            window_secs: WINDOW_SIZE_SECONDS,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl FromStr for RateLimitConfig {
    type Err = ConfigError;

    /// Parse `N per <second|minute|hour|day>`; `N/<unit>` is accepted too.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('/', " per ");
        let mut parts = normalized.split_whitespace();

        let (Some(count), Some("per"), Some(unit), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ConfigError::InvalidRateLimit(raw.to_string()));
        };

        let max_requests: u32 = count
            .parse()
            .map_err(|_| ConfigError::InvalidRateLimit(raw.to_string()))?;
        if max_requests == 0 {
            return Err(ConfigError::InvalidRateLimit(raw.to_string()));
        }

        let window_secs = match unit.trim_end_matches('s') {
            "second" => 1,
            "minute" => 60,
            "hour" => 3600,
            "day" => 86_400,
            _ => return Err(ConfigError::InvalidRateLimit(raw.to_string())),
        };

        Ok(Self {
            max_requests,
            window_secs,
        })
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is missing or invalid")]
    InvalidVariable(String),

    #[error("Invalid rate limit '{0}', expected '<count> per <second|minute|hour|day>'")]
    InvalidRateLimit(String),

    #[error("Invalid time override '{0}', expected HH:MM:SS")]
    InvalidTimeOverride(String),
}
