//! # Per-Client Rate Limiting
//!
//! Fixed-window limiter keyed by client IP. In-memory and per process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;

use crate::error::AppError;
use crate::extractors::ClientIp;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u64,
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn per_minute(max_requests: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
struct Window {
    count: u64,
    started: Instant,
}

/// Shared limiter state, injected as a request extension.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count a request from `key`; `false` when the window is exhausted.
    pub fn check(&self, key: &str) -> bool {
        let mut windows = self.windows.lock();
        let now = Instant::now();
        let span = self.config.window;
        windows.retain(|_, w| now.duration_since(w.started) < span);

        let window = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(window.started) >= self.config.window {
            window.count = 0;
            window.started = now;
        }

        if window.count >= self.config.max_requests {
            false
        } else {
            window.count += 1;
            true
        }
    }

    /// Number of clients with an open window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }
}

/// Middleware that enforces per-client limits when a [`RateLimiter`]
/// extension is present.
pub async fn rate_limit_middleware(request: Request, next: Next) -> Response {
    if let Some(limiter) = request.extensions().get::<RateLimiter>().cloned() {
        let (parts, body) = request.into_parts();
        let ClientIp(ip) = ClientIp::from_parts(&parts);
        if !limiter.check(&ip) {
            tracing::warn!(client_ip = %ip, "rate limit exceeded");
            return AppError::RateLimited("rate limit exceeded".into()).into_response();
        }
        return next.run(Request::from_parts(parts, body)).await;
    }

    next.run(request).await
}
