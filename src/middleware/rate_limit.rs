use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::app_state::AppState;
use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::middleware::metrics::track_rate_limited;
use crate::utils::request_info::extract_ip_address;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client address
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<DashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(DashMap::new()),
        }
    }

    /// Record one request for `client`.
    ///
    /// Returns the seconds until the window resets when the budget is spent.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Result<(), u64> {
        let window_len = self.config.window();
        let mut entry = self.windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(entry.started) >= window_len {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.config.max_requests {
            let remaining = window_len.saturating_sub(now.saturating_duration_since(entry.started));
            return Err(retry_after_secs(remaining));
        }

        entry.count += 1;
        Ok(())
    }

    /// Drop windows that have expired
    pub fn prune(&self) {
        let window_len = self.config.window();
        let now = Instant::now();
        self.windows
            .retain(|_, window| now.saturating_duration_since(window.started) < window_len);
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }
}

fn retry_after_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}

/// Reject requests over the per-client budget with 429
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client = extract_ip_address(
        request.headers(),
        peer,
        state.config.trust_proxy_headers,
    );

    if let Err(retry_after_seconds) = state.rate_limiter.check(&client) {
        warn!(
            client = %client,
            path = %request.uri().path(),
            retry_after = retry_after_seconds,
            "Rate limit exceeded"
        );
        track_rate_limited(request.uri().path());
        return Err(ApiError::RateLimitExceeded {
            retry_after_seconds,
        });
    }

    debug!(client = %client, "Rate limit check passed");
    Ok(next.run(request).await)
}
