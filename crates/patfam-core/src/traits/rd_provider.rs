//! R&D data passthrough contract.

use async_trait::async_trait;

use crate::errors::SourceError;

/// Provider of the research-and-development payload (clinical trials,
/// regulatory, molecular data). The engine embeds the payload opaquely;
/// it is never inspected or transformed.
#[async_trait]
pub trait RdProvider: Send + Sync {
    async fn fetch(&self, molecule: &str) -> Result<serde_json::Value, SourceError>;
}

/// No-op provider for deployments without R&D collectors — returns an
/// empty object.
pub struct NoRdProvider;

#[async_trait]
impl RdProvider for NoRdProvider {
    async fn fetch(&self, _molecule: &str) -> Result<serde_json::Value, SourceError> {
        Ok(serde_json::Value::Object(serde_json::Map::new()))
    }
}
