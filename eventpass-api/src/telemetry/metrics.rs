//! Prometheus Metrics Definitions
//!
//! Defines all EventPass metrics with appropriate labels and types.
//! Exposes a /metrics endpoint for Prometheus scraping.

use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// Request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const REQUEST_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Database operation latency buckets (seconds)
const DB_LATENCY_BUCKETS: &[f64] =
    &[0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0];

/// Global metrics instance - initialized once on first use
pub static METRICS: Lazy<ApiResult<EventPassMetrics>> = Lazy::new(EventPassMetrics::new);

/// Container for all EventPass metrics.
#[derive(Clone)]
pub struct EventPassMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// gRPC call counter - labels: service, method, code
    pub rpc_requests_total: CounterVec,

    /// gRPC call duration histogram - labels: service, method
    pub rpc_request_duration_seconds: HistogramVec,

    /// Database operation counter - labels: operation, status
    pub db_operations_total: CounterVec,

    /// Database operation duration histogram - labels: operation
    pub db_operation_duration_seconds: HistogramVec,
}

impl EventPassMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "eventpass_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| registration_error("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "eventpass_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                REQUEST_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("http_request_duration_seconds", e))?,

            rpc_requests_total: register_counter_vec!(
                "eventpass_rpc_requests_total",
                "Total number of gRPC calls",
                &["service", "method", "code"]
            )
            .map_err(|e| registration_error("rpc_requests_total", e))?,

            rpc_request_duration_seconds: register_histogram_vec!(
                "eventpass_rpc_request_duration_seconds",
                "gRPC call duration in seconds",
                &["service", "method"],
                REQUEST_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("rpc_request_duration_seconds", e))?,

            db_operations_total: register_counter_vec!(
                "eventpass_db_operations_total",
                "Total number of database operations",
                &["operation", "status"]
            )
            .map_err(|e| registration_error("db_operations_total", e))?,

            db_operation_duration_seconds: register_histogram_vec!(
                "eventpass_db_operation_duration_seconds",
                "Database operation duration in seconds",
                &["operation"],
                DB_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("db_operation_duration_seconds", e))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status_str.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a gRPC call with its final status code.
    pub fn record_rpc(&self, service: &str, method: &str, code: tonic::Code, duration_secs: f64) {
        let code_str = format!("{:?}", code);
        self.rpc_requests_total
            .with_label_values(&[service, method, code_str.as_str()])
            .inc();
        self.rpc_request_duration_seconds
            .with_label_values(&[service, method])
            .observe(duration_secs);
    }

    /// Record a database operation.
    pub fn record_db_operation(&self, operation: &str, success: bool, duration_secs: f64) {
        let status = if success { "success" } else { "error" };
        self.db_operations_total
            .with_label_values(&[operation, status])
            .inc();
        self.db_operation_duration_seconds
            .with_label_values(&[operation])
            .observe(duration_secs);
    }
}

fn registration_error(name: &str, err: prometheus::Error) -> ApiError {
    ApiError::internal_error(format!("Failed to register {}: {}", name, err))
}

/// Record a database operation if metrics initialized.
pub fn observe_db(operation: &str, success: bool, elapsed: Duration) {
    if let Ok(metrics) = METRICS.as_ref() {
        metrics.record_db_operation(operation, success, elapsed.as_secs_f64());
    }
}

/// Record a gRPC call if metrics initialized.
pub fn observe_rpc(service: &str, method: &str, code: tonic::Code, elapsed: Duration) {
    if let Ok(metrics) = METRICS.as_ref() {
        metrics.record_rpc(service, method, code, elapsed.as_secs_f64());
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::core::Collector;

    #[test]
    fn test_metrics_creation() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        assert!(!metrics.http_requests_total.desc().is_empty());
        Ok(())
    }

    #[test]
    fn test_record_rpc() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        metrics.record_rpc("UserService", "LoginUser", tonic::Code::Unauthenticated, 0.02);
        let count = metrics
            .rpc_requests_total
            .with_label_values(&["UserService", "LoginUser", "Unauthenticated"])
            .get();
        assert!(count >= 1.0);
        Ok(())
    }

    #[test]
    fn test_record_db_operation() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        metrics.record_db_operation("create_user", true, 0.005);
        metrics.record_db_operation("get_event", false, 0.010);
        Ok(())
    }

    #[tokio::test]
    async fn test_metrics_handler_encodes() {
        observe_db("test_probe", true, Duration::from_millis(1));
        let response = metrics_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
