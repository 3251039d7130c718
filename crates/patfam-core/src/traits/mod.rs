//! Collaborator traits: source connectors, R&D provider, cancellation.

pub mod cancellation;
pub mod rd_provider;
pub mod source_connector;

pub use cancellation::{Cancellable, CancellationToken};
pub use rd_provider::{NoRdProvider, RdProvider};
pub use source_connector::SourceConnector;
