//! Search service behavior with in-memory connectors.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use patfam_core::config::EngineConfig;
use patfam_core::errors::{EngineError, SourceError};
use patfam_core::traits::{CancellationToken, RdProvider, SourceConnector};
use patfam_core::types::{RawPatentRecord, Source};
use patfam_engine::{SearchRequest, SearchService};

/// Connector serving a fixed batch of records.
struct FixedConnector {
    source: Source,
    records: Vec<RawPatentRecord>,
}

#[async_trait]
impl SourceConnector for FixedConnector {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(
        &self,
        _molecule: &str,
        _target_countries: &[String],
        _cancel: &CancellationToken,
    ) -> Result<Vec<RawPatentRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

/// Connector that always fails.
struct BrokenConnector {
    source: Source,
}

#[async_trait]
impl SourceConnector for BrokenConnector {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(
        &self,
        _molecule: &str,
        _target_countries: &[String],
        _cancel: &CancellationToken,
    ) -> Result<Vec<RawPatentRecord>, SourceError> {
        Err(SourceError::unavailable(self.source, "upstream 503"))
    }
}

struct FixedRd;

#[async_trait]
impl RdProvider for FixedRd {
    async fn fetch(&self, _molecule: &str) -> Result<serde_json::Value, SourceError> {
        Ok(json!({"clinical_trials": {"count": 3}}))
    }
}

/// Surface engine logs in test output when RUST_LOG is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn epo_connector() -> Arc<dyn SourceConnector> {
    Arc::new(FixedConnector {
        source: Source::Epo,
        records: vec![RawPatentRecord::from_value(
            Source::Epo,
            json!({"publication_number": "WO2015183882", "priority_date": "2015-05-27"}),
        )],
    })
}

fn inpi_connector() -> Arc<dyn SourceConnector> {
    Arc::new(FixedConnector {
        source: Source::Inpi,
        records: vec![RawPatentRecord::from_value(
            Source::Inpi,
            json!({"patent_number": "BR112017012345", "wo_number": "WO2015183882"}),
        )],
    })
}

#[tokio::test]
async fn merges_across_concurrent_sources() {
    init_tracing();
    let service = SearchService::new(
        EngineConfig::default(),
        vec![epo_connector(), inpi_connector()],
    )
    .with_rd_provider(Arc::new(FixedRd));

    let result = service
        .search(&SearchRequest {
            molecule_name: "darolutamide".to_string(),
            target_countries: vec!["br".to_string()],
            include_legacy: false,
        })
        .await
        .unwrap();

    assert_eq!(result.metadata.target_countries, vec!["BR".to_string()]);
    assert_eq!(result.patent_search.consolidated_patents.len(), 1);
    assert_eq!(
        result.patent_search.consolidated_patents[0].wo_number,
        "WO2015183882"
    );
    assert_eq!(
        result.research_and_development["clinical_trials"]["count"],
        json!(3)
    );

    let stats = service.stats();
    assert_eq!(stats.searches, 1);
    assert_eq!(stats.records_fetched, 2);
    assert_eq!(stats.families_built, 1);
    assert_eq!(stats.source_failures, 0);
}

#[tokio::test]
async fn empty_molecule_fails_before_any_fetch() {
    let service = SearchService::new(EngineConfig::default(), vec![epo_connector()]);
    let err = service
        .search(&SearchRequest {
            molecule_name: "   ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(service.stats().searches, 0);
}

#[tokio::test]
async fn one_failed_source_degrades_to_partial_coverage() {
    let service = SearchService::new(
        EngineConfig::default(),
        vec![
            epo_connector(),
            Arc::new(BrokenConnector {
                source: Source::Inpi,
            }),
        ],
    );

    let result = service
        .search(&SearchRequest {
            molecule_name: "darolutamide".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result.metadata.sources.failed, vec!["INPI".to_string()]);
    assert_eq!(result.patent_search.consolidated_patents.len(), 1);
    assert_eq!(service.stats().source_failures, 1);
}

#[tokio::test]
async fn total_source_exhaustion_fails_the_request() {
    let service = SearchService::new(
        EngineConfig::default(),
        vec![
            Arc::new(BrokenConnector {
                source: Source::Epo,
            }),
            Arc::new(BrokenConnector {
                source: Source::GooglePatents,
            }),
        ],
    );

    let err = service
        .search(&SearchRequest {
            molecule_name: "darolutamide".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AllSourcesFailed));
}

#[tokio::test]
async fn stats_accumulate_across_searches() {
    let service = SearchService::new(EngineConfig::default(), vec![epo_connector()]);
    let request = SearchRequest {
        molecule_name: "darolutamide".to_string(),
        ..Default::default()
    };

    service.search(&request).await.unwrap();
    service.search(&request).await.unwrap();

    let stats = service.stats();
    assert_eq!(stats.searches, 2);
    assert_eq!(stats.records_fetched, 2);
    assert_eq!(stats.families_built, 2);
}
