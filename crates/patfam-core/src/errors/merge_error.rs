//! Merge errors.

/// Two records share a normalized publication number but disagree on an
/// identity field. This signals a normalization defect and is fatal for
/// that record pair only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error(
        "records for {number} disagree on {field}: {existing:?} vs {incoming:?}"
    )]
    InconsistentRecord {
        number: String,
        field: &'static str,
        existing: String,
        incoming: String,
    },
}
