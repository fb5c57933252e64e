use std::sync::Once;

use metrics::{Unit, describe_counter};
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

    // sqlx logs each executed statement at info.
    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy()
        .add_directive(
            "sqlx::query=warn"
                .parse()
                .map_err(|err| InfraError::telemetry(format!("invalid log directive: {err}")))?,
        );

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

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "quill_post_cache_hit_total",
            Unit::Count,
            "Point reads served from the post cache."
        );
        describe_counter!(
            "quill_post_cache_miss_total",
            Unit::Count,
            "Point reads that found no cached snapshot."
        );
        describe_counter!(
            "quill_post_cache_error_total",
            Unit::Count,
            "Cache reads or writes that failed or timed out."
        );
        describe_counter!(
            "quill_post_cache_corrupt_total",
            Unit::Count,
            "Cached snapshots that could not be decoded and were ignored."
        );
        describe_counter!(
            "quill_post_cache_invalidate_failed_total",
            Unit::Count,
            "Post updates whose cache invalidation failed."
        );
        describe_counter!(
            "quill_post_cache_populate_discarded_total",
            Unit::Count,
            "Cache populates undone because the post was updated during the read."
        );
    });
}
