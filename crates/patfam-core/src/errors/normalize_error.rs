//! Normalization errors.

use crate::types::Source;

/// A raw record could not be normalized. The record is dropped from
/// consolidation and logged; the request continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("{src} record carries no publication number field")]
    MissingPublicationNumber { src: Source },

    #[error("{src} record has unparseable publication number {value:?}")]
    UnparseablePublicationNumber { src: Source, value: String },
}

impl NormalizeError {
    pub fn source_tag(&self) -> Source {
        match self {
            NormalizeError::MissingPublicationNumber { src }
            | NormalizeError::UnparseablePublicationNumber { src, .. } => *src,
        }
    }
}
