//! Structured logging and metrics emission.
//!
//! Logging goes through [`tracing`]; metrics go through the
//! [`MetricsSink`](crate::store::MetricsSink) trait, for which this module
//! provides a tracing-backed implementation suitable for log-based
//! aggregation.

use std::io;

use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::store::MetricsSink;

/// Log format configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format for development.
    Pretty,
    /// JSON format for production log aggregation.
    Json,
}

impl LogFormat {
    /// Determines log format from environment.
    ///
    /// Checks `LOG_FORMAT` environment variable:
    /// - `json` => JSON format
    /// - `pretty` or unset => Pretty format
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Initializes structured logging for the payment core.
///
/// Emits to stderr with span close events, so `pay` and `approve` spans
/// report their timing. Log levels come from `RUST_LOG` (default `info`).
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let base = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(io::stderr);
    let output = match format {
        LogFormat::Pretty => base.boxed(),
        LogFormat::Json => base.json().with_current_span(true).with_span_list(true).boxed(),
    };

    tracing_subscriber::registry().with(filter).with(output).init();
}

/// Initializes logging from `LOG_FORMAT`/`RUST_LOG` alone.
pub fn init_logging_from_env() {
    init_logging(LogFormat::from_env());
}

/// [`MetricsSink`] that emits each measurement as a structured log event.
///
/// Log-based aggregation keeps the orchestration core free of a metrics
/// backend dependency; swap in a real sink where one exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetricsSink;

impl TracingMetricsSink {
    /// Creates the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for TracingMetricsSink {
    fn record_value(&self, name: &str, value: f64, tags: &[(&str, &str)]) {
        tracing::debug!(metric = name, value, ?tags, "metric recorded");
    }
}
