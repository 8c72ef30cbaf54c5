//! Tracing subscriber and Prometheus exporter setup.
//!
//! `RUST_LOG` takes precedence over `logger.level` when set.

mod config;

use std::net::SocketAddr;

pub(crate) use config::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Node publishes are polled for up to ten minutes by default.
const PUBLISH_DURATION_BUCKETS: &[f64] = &[1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0];
/// Receipt waits plus optional finality polling.
const REGISTRATION_DURATION_BUCKETS: &[f64] = &[2.0, 5.0, 15.0, 30.0, 60.0, 180.0, 300.0];
const BATCH_SIZE_BUCKETS: &[f64] = &[1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0];

pub(crate) fn initialize(logger_config: &LoggerConfig, telemetry_config: &TelemetryConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logger_config.level));

    initialize_logger(logger_config, filter);

    initialize_metrics(&telemetry_config.metrics);
}

fn initialize_logger(logger_config: &LoggerConfig, filter: EnvFilter) {
    let registry = tracing_subscriber::registry().with(filter);

    match logger_config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
        // Span fields such as operation_id and batch_size ride along on every event.
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init(),
    }
}

fn initialize_metrics(metrics_config: &TelemetryMetricsConfig) {
    if !metrics_config.enabled {
        return;
    }

    let installed = metrics_builder(metrics_config).and_then(|(builder, bind_address)| {
        builder.install()?;
        Ok(bind_address)
    });

    match installed {
        Ok(bind_address) => tracing::info!(%bind_address, "Prometheus metrics exporter enabled"),
        Err(error) => tracing::warn!(
            bind_address = %metrics_config.bind_address,
            error = %error,
            "Metrics exporter disabled"
        ),
    }
}

fn metrics_builder(
    metrics_config: &TelemetryMetricsConfig,
) -> Result<(PrometheusBuilder, SocketAddr), BuildError> {
    let bind_address: SocketAddr = metrics_config.bind_address.parse().map_err(|e| {
        BuildError::FailedToCreateHTTPListener(format!(
            "bind address '{}': {e}",
            metrics_config.bind_address
        ))
    })?;

    let builder = PrometheusBuilder::new()
        .with_http_listener(bind_address)
        .set_buckets_for_metric(
            Matcher::Full("dkg_publisher_publish_duration_seconds".to_string()),
            PUBLISH_DURATION_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full("dkg_publisher_registration_duration_seconds".to_string()),
            REGISTRATION_DURATION_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full("dkg_publisher_registration_batch_size".to_string()),
            BATCH_SIZE_BUCKETS,
        )?;

    Ok((builder, bind_address))
}
