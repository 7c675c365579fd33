//! EventPass API Server Entry Point
//!
//! Loads configuration, prepares the database, and serves gRPC and the HTTP
//! gateway side by side until Ctrl-C.

use std::sync::Arc;

use axum::Router;
use eventpass_api::telemetry::{init_tracing, TelemetryConfig};
use eventpass_api::{
    codec_config_from_env, create_api_router, create_services, credential_codec, ensure_schema,
    AccountService, ApiConfig, ApiError, ApiResult, DbConfig, EventService, PgStore,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // Missing env/.env is fine; the process environment still applies.
    dotenv::from_path("env/.env").ok();

    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let db_config = DbConfig::from_env();
    let store = PgStore::from_config(&db_config)?;
    store.health_check().await?;
    ensure_schema(store.pool()).await?;
    tracing::info!("Database connection established");

    let codec = credential_codec(codec_config_from_env())?;

    let store = Arc::new(store);
    let accounts = Arc::new(AccountService::new(store.clone(), codec)?);
    let events = Arc::new(EventService::new(store.clone()));

    let api_config = ApiConfig::from_env()?;
    let app: Router = create_api_router(
        accounts.clone(),
        events.clone(),
        store,
        &api_config,
        telemetry_config.metrics_enabled,
    );
    let (user_service, event_service) = create_services(accounts, events);

    let grpc_addr = api_config.grpc_addr;
    let grpc_server = tonic::transport::Server::builder()
        .add_service(user_service)
        .add_service(event_service)
        .serve(grpc_addr);

    let http_addr = api_config.http_addr;
    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", http_addr, e)))?;
    let http_server = axum::serve(listener, app);

    tracing::info!(%grpc_addr, %http_addr, "Starting EventPass API server");

    tokio::select! {
        result = grpc_server => {
            result.map_err(|e| ApiError::internal_error(format!("gRPC server error: {}", e)))?;
        }
        result = http_server => {
            result.map_err(|e| ApiError::internal_error(format!("HTTP server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
