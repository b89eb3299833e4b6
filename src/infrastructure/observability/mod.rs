//! Observability infrastructure - Tracing and Metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    CacheLookup, CacheOperation, PrometheusMetrics, create_metrics_router, init_metrics,
    record_cache_backend_error, record_cache_lookup, record_http_request,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
