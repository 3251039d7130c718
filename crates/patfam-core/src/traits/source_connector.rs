//! The fetch contract between the engine and its source connectors.

use async_trait::async_trait;

use super::cancellation::CancellationToken;
use crate::errors::SourceError;
use crate::types::{RawPatentRecord, Source};

/// One upstream provider of raw patent records.
///
/// Connectors own all network, scraping, retry, and caching mechanics; the
/// engine sees only this contract. Fetches for different sources run
/// concurrently and a failed fetch degrades the request to partial
/// coverage instead of failing it.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Which source this connector speaks for.
    fn source(&self) -> Source;

    /// Fetch raw records for a molecule across the target jurisdictions.
    ///
    /// Implementations should observe `cancel` and abandon in-flight work
    /// once it trips, returning `SourceError::Cancelled`.
    async fn fetch(
        &self,
        molecule: &str,
        target_countries: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<RawPatentRecord>, SourceError>;
}
