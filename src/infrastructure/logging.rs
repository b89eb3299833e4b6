//! Log subscriber setup

use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingConfig};
use crate::infrastructure::observability::{TracingConfig, init_tracing};

/// Installs the global subscriber
///
/// `RUST_LOG` overrides the configured level. When tracing export is enabled
/// but the exporter cannot be built, logging continues without it.
pub fn init_logging(config: &LoggingConfig, tracing_config: &TracingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    let (otel_layer, otel_error) = if tracing_config.enabled {
        match init_tracing(tracing_config) {
            Ok(tracer) => (Some(tracing_opentelemetry::layer().with_tracer(tracer)), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };
    let otel_enabled = otel_layer.is_some();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    match otel_error {
        Some(e) => tracing::warn!("Failed to initialize OpenTelemetry: {}. Export disabled.", e),
        None if otel_enabled => tracing::info!(
            "Tracing initialized with OpenTelemetry export to {}",
            tracing_config.otlp_endpoint
        ),
        None => tracing::info!("Logging initialized with level: {}", config.level),
    }
}
