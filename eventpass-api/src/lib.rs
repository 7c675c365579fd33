//! EventPass API - gRPC and HTTP API Layer
//!
//! Exposes the account and event services over tonic gRPC and an axum
//! HTTP/JSON gateway, backed by a pooled PostgreSQL record store.

pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod routes;
pub mod schema;
pub mod services;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{codec_config_from_env, credential_codec, ApiConfig};
pub use db::{DbConfig, PgStore, PgTransaction};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use grpc::{create_services, proto, GrpcServices};
pub use routes::{create_api_router, ReadinessProbe};
pub use schema::ensure_schema;
pub use services::{AccountService, EventService};
pub use types::*;
