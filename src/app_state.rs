//! Application state shared across all handlers.
//!
//! This module defines the `AppState` struct which holds the dataset snapshot,
//! configuration and the few services needed to answer requests.

use chrono::{Local, NaiveTime};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::config::Config;
use crate::middleware::rate_limit::RateLimiter;
use crate::services::SpaceDataset;

/// Application state shared across handlers.
///
/// Cloned per request, so every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Buildings loaded at startup, never mutated
    pub dataset: Arc<SpaceDataset>,
    /// Per-client request counters
    pub rate_limiter: RateLimiter,
    /// Prometheus recorder handle rendered by `/metrics`
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(config: Config, dataset: SpaceDataset, metrics_handle: PrometheusHandle) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit);
        Self {
            config,
            dataset: Arc::new(dataset),
            rate_limiter,
            metrics_handle,
        }
    }

    /// Time of day used to classify slots
    pub fn current_time(&self) -> NaiveTime {
        self.config
            .current_time_override
            .unwrap_or_else(|| Local::now().time())
    }
}
