use anyhow::Result;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

use crate::constants::rate_limit::DEFAULT_RATE_LIMIT;
use crate::constants::{availability, data, http};

pub mod rate_limit;
pub use rate_limit::{ConfigError, RateLimitConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// Dataset file holding buildings, rooms and schedules
    pub data_path: String,
    /// Origins allowed to call the API cross-origin; empty disables CORS
    pub cors_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
    /// Key rate limits on `X-Forwarded-For`/`X-Real-IP` instead of the peer address
    pub trust_proxy_headers: bool,
    pub max_content_length: usize,
    pub request_timeout: u64,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Fixed wall-clock time used instead of the system clock
    pub current_time_override: Option<NaiveTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidVariable("LOG_FORMAT".to_string())),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: http::DEFAULT_HOST.to_string(),
            port: http::DEFAULT_PORT,
            data_path: data::DEFAULT_DATA_PATH.to_string(),
            cors_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
            trust_proxy_headers: false,
            max_content_length: http::MAX_BODY_SIZE,
            request_timeout: http::REQUEST_TIMEOUT_SECS,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            current_time_override: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any variable source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let rate_limit = match lookup("RATE_LIMIT") {
            Some(raw) => raw.parse::<RateLimitConfig>()?,
            None => DEFAULT_RATE_LIMIT.parse::<RateLimitConfig>()?,
        };

        let current_time_override = match lookup("CURRENT_TIME_OVERRIDE") {
            Some(raw) if !raw.trim().is_empty() => Some(
                NaiveTime::parse_from_str(raw.trim(), availability::SLOT_TIME_FORMAT)
                    .map_err(|_| ConfigError::InvalidTimeOverride(raw.clone()))?,
            ),
            _ => None,
        };

        let config = Config {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: match lookup("PORT") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidVariable("PORT".to_string()))?,
                None => defaults.port,
            },
            data_path: lookup("DATA_PATH").unwrap_or(defaults.data_path),
            cors_origins: parse_origins(&lookup("CORS_ORIGINS").unwrap_or_default()),
            rate_limit,
            trust_proxy_headers: parse_or_default(
                &lookup,
                "TRUST_PROXY_HEADERS",
                defaults.trust_proxy_headers,
            ),
            max_content_length: parse_or_default(
                &lookup,
                "MAX_CONTENT_LENGTH",
                defaults.max_content_length,
            ),
            request_timeout: parse_or_default(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout,
            ),
            log_level: lookup("LOG_LEVEL")
                .map(|level| level.to_ascii_lowercase())
                .unwrap_or(defaults.log_level),
            log_format: parse_or_default(&lookup, "LOG_FORMAT", defaults.log_format),
            current_time_override,
        };

        Ok(config)
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => match val.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Failed to parse {}: {}, using default {}", key, val, default);
                default
            }
        },
        None => default,
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}
