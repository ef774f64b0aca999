use crate::table::{AggregationMode, EntityKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The provider failed or returned a table that cannot be used.
    #[error("{kind} stats ({mode}) unavailable: {reason}")]
    DataUnavailable {
        kind: EntityKind,
        mode: AggregationMode,
        reason: String,
    },

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// A configured metric column is absent from the provider schema.
    #[error("Metric column missing: {0}")]
    MetricMissing(String),

    #[error("Metric set must contain at least one metric")]
    EmptyMetricSet,

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}
