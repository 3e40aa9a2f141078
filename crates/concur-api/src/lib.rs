//! # concur-api - Axum HTTP Service for the Concur Consent Registry
//!
//! Developers register an organisation, create applications and declare
//! collection points (what personal data is collected, for which purposes,
//! on which legal basis). Data principals then record consent against
//! those collection points. Every organisation also has a YAML manifest on
//! disk mirroring its applications and collection points.
//!
//! ## API Surface
//!
//! | Path                                        | Module                         |
//! |---------------------------------------------|--------------------------------|
//! | `/package-register`, `/create-application`  | [`routes::registration`]       |
//! | `/create-collection-point`, `/get-collection-points/{app_id}`, `/delete-collection-point/{id}` | [`routes::collection_points`] |
//! | `/collection-point-template`, `/push-yaml`, `/rebuild-manifest` | [`routes::manifests`] |
//! | `/get-notice-info/{cp_id}`                  | [`routes::notice`]             |
//! | `/post-consent-preference`                  | [`routes::consent`]            |
//! | `/openapi.json`                             | [`openapi`]                    |
//! | `/metrics`                                  | [`middleware::metrics`]        |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CORS → MetricsMiddleware → RateLimitMiddleware → Handler
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) sit outside the middleware stack so they are
/// neither rate limited nor counted.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let mut api = Router::new()
        .route("/", get(welcome))
        .route("/metrics", get(middleware::metrics::render))
        .merge(routes::registration::router())
        .merge(routes::collection_points::router())
        .merge(routes::manifests::router())
        .merge(routes::notice::router())
        .merge(routes::consent::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    if state.config.rate_limit_per_minute > 0 {
        let limiter = RateLimiter::new(RateLimitConfig::per_minute(state.config.rate_limit_per_minute));
        api = api.layer(axum::Extension(limiter));
    }

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api).with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_allow_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// GET /: Welcome message.
async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Concur consent registry" }))
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the document store answers a ping.
async fn readiness(State(state): State<AppState>) -> Response {
    match state.store().ping().await {
        Ok(()) => "ready".into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable").into_response()
        }
    }
}
