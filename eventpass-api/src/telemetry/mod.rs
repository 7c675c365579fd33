//! EventPass Telemetry - Observability Infrastructure
//!
//! Structured logging through `tracing` and Prometheus metrics for both
//! the HTTP gateway and the gRPC services.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics_handler, EventPassMetrics, METRICS};
pub use middleware::observability_middleware;
pub use tracer::{init_tracing, LogFormat, TelemetryConfig};
