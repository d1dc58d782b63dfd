use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for the cache and origin metrics.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "quietfeed_cache_hit_total",
            Unit::Count,
            "Total number of lookups served from the cache store."
        );
        describe_counter!(
            "quietfeed_cache_miss_total",
            Unit::Count,
            "Total number of lookups that started an origin fill."
        );
        describe_counter!(
            "quietfeed_cache_joined_total",
            Unit::Count,
            "Total number of lookups that waited on a fill already in flight."
        );
        describe_counter!(
            "quietfeed_origin_fetch_total",
            Unit::Count,
            "Total number of origin fetches issued."
        );
        describe_counter!(
            "quietfeed_origin_error_total",
            Unit::Count,
            "Total number of origin fetches that failed."
        );
        describe_histogram!(
            "quietfeed_origin_fetch_ms",
            Unit::Milliseconds,
            "Origin fetch latency in milliseconds."
        );
    });
}
