//! Source connector errors.

use crate::types::Source;

/// A collaborator fetch failed. Consolidation continues with the remaining
/// sources; the failure is reflected as partial coverage in the report
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("{src} unavailable: {reason}")]
    Unavailable { src: Source, reason: String },

    #[error("{src} timed out")]
    Timeout { src: Source },

    #[error("fetch cancelled")]
    Cancelled,
}

impl SourceError {
    pub fn unavailable(source: Source, reason: impl Into<String>) -> Self {
        SourceError::Unavailable {
            src: source,
            reason: reason.into(),
        }
    }
}
