//! API Configuration Module
//!
//! Listener addresses, CORS, static file serving, request limits and the
//! credential codec cost. Everything is read from environment variables with
//! development defaults; `main` loads `env/.env` first when it exists.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use eventpass_core::{CodecConfig, CredentialCodec};

use crate::error::{ApiError, ApiResult};

/// Default gRPC listener.
pub const DEFAULT_GRPC_ADDR: &str = "0.0.0.0:50051";

/// Default HTTP gateway listener.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Transport-level settings for both listeners.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// gRPC listen address.
    pub grpc_addr: SocketAddr,

    /// HTTP gateway listen address.
    pub http_addr: SocketAddr,

    /// Allowed CORS origins. Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Directory served under `/static`.
    pub static_dir: PathBuf,

    /// Upper bound on a single HTTP request, handler included.
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            grpc_addr: SocketAddr::from(([0, 0, 0, 0], 50051)),
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origins: Vec::new(),
            cors_max_age_secs: 86400,
            static_dir: PathBuf::from("./static"),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `EVENTPASS_GRPC_ADDR`: gRPC listener (default: 0.0.0.0:50051)
    /// - `EVENTPASS_HTTP_ADDR`: HTTP listener (default: 0.0.0.0:8080)
    /// - `PORT`: overrides the HTTP listener port
    /// - `EVENTPASS_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `EVENTPASS_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `EVENTPASS_STATIC_DIR`: Static file root (default: ./static)
    /// - `EVENTPASS_REQUEST_TIMEOUT_SECS`: HTTP request timeout (default: 30)
    pub fn from_env() -> ApiResult<Self> {
        let grpc_addr = parse_addr(
            &std::env::var("EVENTPASS_GRPC_ADDR").unwrap_or_else(|_| DEFAULT_GRPC_ADDR.to_string()),
        )?;

        let http_addr = parse_addr(
            &std::env::var("EVENTPASS_HTTP_ADDR").unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string()),
        )?;
        let http_addr = apply_port_override(http_addr, std::env::var("PORT").ok().as_deref())?;

        let cors_origins = std::env::var("EVENTPASS_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        Ok(Self {
            grpc_addr,
            http_addr,
            cors_origins,
            cors_max_age_secs: env_or("EVENTPASS_CORS_MAX_AGE_SECS", 86400),
            static_dir: std::env::var("EVENTPASS_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./static")),
            request_timeout: Duration::from_secs(env_or("EVENTPASS_REQUEST_TIMEOUT_SECS", 30)),
        })
    }
}

// ============================================================================
// CODEC CONFIGURATION
// ============================================================================

/// Credential codec cost from environment variables.
///
/// - `EVENTPASS_ARGON2_MEMORY_KIB` (default: 19456)
/// - `EVENTPASS_ARGON2_ITERATIONS` (default: 2)
/// - `EVENTPASS_ARGON2_PARALLELISM` (default: 1)
/// - `EVENTPASS_MAX_SECRET_BYTES` (default: 1024)
pub fn codec_config_from_env() -> CodecConfig {
    let defaults = CodecConfig::default();
    CodecConfig {
        memory_kib: env_or("EVENTPASS_ARGON2_MEMORY_KIB", defaults.memory_kib),
        iterations: env_or("EVENTPASS_ARGON2_ITERATIONS", defaults.iterations),
        parallelism: env_or("EVENTPASS_ARGON2_PARALLELISM", defaults.parallelism),
        max_secret_bytes: env_or("EVENTPASS_MAX_SECRET_BYTES", defaults.max_secret_bytes),
    }
}

/// Build the credential codec, treating bad cost parameters as a startup
/// misconfiguration.
pub fn credential_codec(config: CodecConfig) -> ApiResult<CredentialCodec> {
    CredentialCodec::new(config).map_err(|e| {
        ApiError::internal_error(format!("Invalid credential codec configuration: {}", e))
    })
}

// ============================================================================
// HELPERS
// ============================================================================

/// Read and parse an env var, falling back to `default` when unset or invalid.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_addr(value: &str) -> ApiResult<SocketAddr> {
    value
        .trim()
        .parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", value, e)))
}

fn apply_port_override(addr: SocketAddr, port: Option<&str>) -> ApiResult<SocketAddr> {
    match port {
        Some(port_str) => {
            let port = port_str
                .trim()
                .parse::<u16>()
                .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;
            Ok(SocketAddr::new(addr.ip(), port))
        }
        None => Ok(addr),
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.grpc_addr.port(), 50051);
        assert_eq!(config.http_addr.port(), 8080);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_default_addr_constants_parse() {
        assert_eq!(parse_addr(DEFAULT_GRPC_ADDR).unwrap(), ApiConfig::default().grpc_addr);
        assert_eq!(parse_addr(DEFAULT_HTTP_ADDR).unwrap(), ApiConfig::default().http_addr);
    }

    #[test]
    fn test_bad_codec_config_is_internal() {
        let err = credential_codec(CodecConfig {
            max_secret_bytes: 0,
            ..CodecConfig::default()
        })
        .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InternalError);
        assert!(err.message.starts_with("Invalid credential codec configuration"));

        assert!(credential_codec(CodecConfig::default()).is_ok());
    }

    #[test]
    fn test_parse_addr_rejects_garbage() {
        let err = parse_addr("localhost").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidInput);
    }

    #[test]
    fn test_port_override() {
        let addr = parse_addr("127.0.0.1:8080").unwrap();
        assert_eq!(apply_port_override(addr, Some("9090")).unwrap().port(), 9090);
        assert_eq!(apply_port_override(addr, None).unwrap().port(), 8080);
        assert!(apply_port_override(addr, Some("not-a-port")).is_err());
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("https://a.example, ,https://b.example");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: u64 = env_or("EVENTPASS_TEST_SURELY_UNSET_VAR", 42);
        assert_eq!(value, 42);
    }
}
