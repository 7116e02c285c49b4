//! # mrl-api: Axum API Service for MRL Compliance
//!
//! HTTP surface over [`mrl_engine::ComplianceChecker`].
//!
//! ## API Surface
//!
//! | Prefix                 | Module                   | Domain                 |
//! |------------------------|--------------------------|------------------------|
//! | `/v1/compliance/*`     | [`routes::compliance`]   | Verdicts, alternatives |
//! | `/v1/crops/*`          | [`routes::crops`]        | Crop listings          |
//! | `/openapi.json`        | [`openapi`]              | OpenAPI document       |
//! | `/health/*`            | this module              | Probes                 |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::compliance::router())
        .merge(routes::crops::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
