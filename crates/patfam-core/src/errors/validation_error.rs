//! Caller input validation errors, surfaced before any fetch.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("molecule name must not be empty")]
    EmptyMoleculeName,
}
