//! Core types, traits, errors, and configuration for the patfam
//! consolidation engine.
//!
//! This crate is I/O-free: it defines the data model (raw and canonical
//! patent records, consolidated families, the report shape), the
//! collaborator traits (source connectors, R&D provider, cancellation),
//! the per-subsystem error enums, and the layered configuration. The
//! pipeline itself lives in `patfam-engine`.

pub mod config;
pub mod errors;
pub mod traits;
pub mod types;

pub use config::{EngineConfig, PrecedenceConfig, SearchConfig, TermConfig};
pub use errors::{
    ConfigError, EngineError, MergeError, NormalizeError, RecordError, SourceError,
    ValidationError,
};
pub use traits::{CancellationToken, Cancellable, RdProvider, SourceConnector};
pub use types::{
    CanonicalPatentRecord, ConsolidatedFamily, DocumentLink, PartialDate, PatentCliffImpact,
    PublicationNumber, RawPatentRecord, SearchResult, Source, Sourced,
};
