//! REST API Routes Module
//!
//! The HTTP gateway mirrors the gRPC surface as JSON:
//! - Account routes under /v1/users
//! - Event routes under /v1
//! - Health checks at /health/* (Kubernetes-compatible)
//! - Prometheus metrics at /metrics
//! - Static files at /static
//! - CORS support for the browser client

pub mod event;
pub mod health;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn,
    routing::get,
    BoxError, Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::error::{ApiError, ErrorCode};
use crate::services::{AccountService, EventService};
use crate::telemetry::{metrics_handler, observability_middleware};

// Re-export route creation functions for convenience
pub use event::create_router as event_router;
pub use health::create_router as health_router;
pub use health::ReadinessProbe;
pub use user::create_router as user_router;

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

// ============================================================================
// ROUTER
// ============================================================================

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ApiError>) {
    let body = if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::from_code(ErrorCode::Timeout)
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::from_code(ErrorCode::InternalError)
    };
    (body.status_code(), Json(body))
}

/// Create the complete HTTP gateway router.
///
/// # Middleware Order (outer to inner)
/// 1. CORS - handles preflight requests
/// 2. Observability - tracing span and metrics
/// 3. Request tracing (tower-http)
/// 4. Timeout - bounds handler time
pub fn create_api_router(
    accounts: Arc<AccountService>,
    events: Arc<EventService>,
    probe: Arc<dyn ReadinessProbe>,
    config: &ApiConfig,
    metrics_enabled: bool,
) -> Router {
    let v1 = Router::new()
        .nest("/users", user::create_router(accounts))
        .merge(event::create_router(events));

    let mut router = Router::new()
        .nest("/v1", v1)
        .nest("/health", health::create_router(probe))
        .nest_service("/static", ServeDir::new(&config.static_dir));

    if metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    let timeout = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .timeout(config.request_timeout);

    router
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(observability_middleware))
        .layer(build_cors_layer(config))
}
