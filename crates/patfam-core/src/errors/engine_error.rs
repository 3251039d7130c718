//! Engine-level errors and non-fatal error collection.

use super::{ConfigError, MergeError, NormalizeError, ValidationError};

/// Errors that fail a whole request. Per spec, only malformed input and
/// total source exhaustion do; everything else degrades to partial
/// coverage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("every source failed and no records were obtained")]
    AllSourcesFailed,

    #[error("request cancelled")]
    Cancelled,
}

/// A non-fatal per-record failure collected during pipeline execution.
/// The affected record is excluded; the run's result stays valid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}
