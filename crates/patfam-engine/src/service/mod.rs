//! The async search service — fan-out over source connectors, fold through
//! the associative merge, assemble the report.
//!
//! The three upstream fetches are independent and share no mutable state,
//! so they run concurrently with no ordering dependency. A failed or
//! cancelled source narrows coverage instead of failing the request; only
//! invalid input or total source exhaustion does that.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde_json::Value;
use tracing::{info, warn};

use patfam_core::config::EngineConfig;
use patfam_core::errors::{EngineError, ValidationError};
use patfam_core::traits::{
    Cancellable, CancellationToken, NoRdProvider, RdProvider, SourceConnector,
};
use patfam_core::types::{RawPatentRecord, SearchResult, Source};

use crate::pipeline::{self, ConsolidateOptions};
use crate::stats::{EngineStats, EngineStatsSnapshot};

/// A molecule search request.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub molecule_name: String,
    pub target_countries: Vec<String>,
    /// Also emit the legacy flat projection.
    pub include_legacy: bool,
}

/// The consolidation engine's front door.
pub struct SearchService {
    config: EngineConfig,
    connectors: Vec<Arc<dyn SourceConnector>>,
    rd_provider: Arc<dyn RdProvider>,
    stats: EngineStats,
}

impl SearchService {
    pub fn new(config: EngineConfig, connectors: Vec<Arc<dyn SourceConnector>>) -> Self {
        Self {
            config,
            connectors,
            rd_provider: Arc::new(NoRdProvider),
            stats: EngineStats::default(),
        }
    }

    /// Attach an R&D collaborator whose payload is passed through opaquely.
    pub fn with_rd_provider(mut self, rd_provider: Arc<dyn RdProvider>) -> Self {
        self.rd_provider = rd_provider;
        self
    }

    /// Run a search with a fresh cancellation token.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, EngineError> {
        self.search_with_cancellation(request, &CancellationToken::new())
            .await
    }

    /// Run a search, observing the caller's cancellation token between
    /// phases and inside connectors.
    pub async fn search_with_cancellation(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchResult, EngineError> {
        let molecule = request.molecule_name.trim().to_string();
        if molecule.is_empty() {
            return Err(ValidationError::EmptyMoleculeName.into());
        }
        let targets = self.config.search.resolve_targets(&request.target_countries);

        info!(molecule = %molecule, targets = ?targets, "search started");
        let started = Instant::now();

        let fetches = self.connectors.iter().map(|connector| {
            let molecule = molecule.clone();
            let targets = targets.clone();
            async move {
                let source = connector.source();
                (source, connector.fetch(&molecule, &targets, cancel).await)
            }
        });
        let (fetch_results, rd_result) =
            tokio::join!(join_all(fetches), self.rd_provider.fetch(&molecule));

        let mut raw: Vec<RawPatentRecord> = Vec::new();
        let mut sources_queried: Vec<Source> = Vec::new();
        let mut sources_failed: Vec<Source> = Vec::new();

        for (source, result) in fetch_results {
            sources_queried.push(source);
            match result {
                Ok(records) => {
                    info!(source = %source, records = records.len(), "source fetch complete");
                    raw.extend(records);
                }
                Err(err) => {
                    warn!(source = %source, error = %err, "source fetch failed, continuing without it");
                    sources_failed.push(source);
                }
            }
        }

        if !self.connectors.is_empty() && sources_failed.len() == self.connectors.len() {
            return Err(EngineError::AllSourcesFailed);
        }
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let research_and_development = match rd_result {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "R&D fetch failed, embedding empty payload");
                Value::Object(serde_json::Map::new())
            }
        };

        let fetched = raw.len() as u64;
        let failures = sources_failed.len() as u64;
        let options = ConsolidateOptions {
            molecule_name: molecule,
            target_countries: targets,
            as_of: chrono::Utc::now().date_naive(),
            include_legacy: request.include_legacy,
            research_and_development,
            sources_queried,
            sources_failed,
            generated_at: chrono::Utc::now().to_rfc3339(),
            elapsed_ms: None,
        };

        let mut outcome = pipeline::run(&raw, &self.config, cancel, options)?;
        outcome.result.metadata.elapsed_ms = Some(started.elapsed().as_millis() as u64);

        let families = &outcome.result.patent_search.consolidated_patents;
        self.stats.record_search(
            fetched,
            outcome.dropped.len() as u64,
            families.len() as u64,
            families.iter().filter(|f| f.orphan).count() as u64,
            failures,
        );

        Ok(outcome.result)
    }

    /// Cumulative process-lifetime counters.
    pub fn stats(&self) -> EngineStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
