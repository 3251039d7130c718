//! Error handling.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod engine_error;
pub mod merge_error;
pub mod normalize_error;
pub mod source_error;
pub mod validation_error;

pub use config_error::ConfigError;
pub use engine_error::{EngineError, RecordError};
pub use merge_error::MergeError;
pub use normalize_error::NormalizeError;
pub use source_error::SourceError;
pub use validation_error::ValidationError;
