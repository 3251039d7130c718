//! The consolidation pipeline: normalize → resolve → merge → consolidate →
//! cliff → output.
//!
//! Everything after the fetches is pure, synchronous, per-request
//! computation. Per-record failures are collected, not fatal: the run
//! returns a valid report plus the list of records it had to drop.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

use patfam_core::config::EngineConfig;
use patfam_core::errors::{EngineError, RecordError};
use patfam_core::traits::{Cancellable, CancellationToken};
use patfam_core::types::{RawPatentRecord, SearchResult, Source, SourceCoverage};

use crate::cliff::CliffCalculator;
use crate::consolidate::consolidate;
use crate::merge::Merger;
use crate::normalize::normalize;
use crate::output::{build, BuildContext};
use crate::resolve::resolve_family;

/// Request-scoped inputs to a consolidation run.
#[derive(Debug, Clone)]
pub struct ConsolidateOptions {
    pub molecule_name: String,
    pub target_countries: Vec<String>,
    /// Analysis date for expiration arithmetic.
    pub as_of: NaiveDate,
    /// Emit the backward-compatible flat projection alongside the
    /// WO-centric view.
    pub include_legacy: bool,
    /// Opaque R&D payload embedded in the report.
    pub research_and_development: Value,
    /// Sources that were attempted, for coverage metadata.
    pub sources_queried: Vec<Source>,
    /// Sources whose fetch failed; reflected as partial coverage.
    pub sources_failed: Vec<Source>,
    pub generated_at: String,
    pub elapsed_ms: Option<u64>,
}

impl ConsolidateOptions {
    /// Options for a caller holding pre-fetched raw data: analysis date is
    /// today, coverage is derived from the records themselves.
    pub fn for_prefetched(molecule_name: impl Into<String>, include_legacy: bool) -> Self {
        Self {
            molecule_name: molecule_name.into(),
            target_countries: Vec::new(),
            as_of: chrono::Utc::now().date_naive(),
            include_legacy,
            research_and_development: Value::Object(serde_json::Map::new()),
            sources_queried: Vec::new(),
            sources_failed: Vec::new(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            elapsed_ms: None,
        }
    }
}

/// A completed run: the report plus the per-record failures it tolerated.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub result: SearchResult,
    pub dropped: Vec<RecordError>,
}

impl PipelineOutcome {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Run the full pipeline over raw records.
pub fn run(
    raw: &[RawPatentRecord],
    config: &EngineConfig,
    cancel: &CancellationToken,
    options: ConsolidateOptions,
) -> Result<PipelineOutcome, EngineError> {
    let mut dropped: Vec<RecordError> = Vec::new();

    let mut records_by_source: BTreeMap<String, usize> = BTreeMap::new();
    for record in raw {
        *records_by_source
            .entry(record.source.label().to_string())
            .or_insert(0) += 1;
    }

    // Normalize, dropping records with no usable identity.
    let mut canonical = Vec::with_capacity(raw.len());
    for record in raw {
        match normalize(record) {
            Ok(mut normalized) => {
                resolve_family(&mut normalized);
                canonical.push(normalized);
            }
            Err(err) => {
                debug!(source = %record.source, error = %err, "dropping unnormalizable record");
                dropped.push(RecordError::Normalize(err));
            }
        }
    }
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }

    // Dedup/merge by normalized number.
    let merger = Merger::new(&config.precedence);
    let (merged, merge_errors) = merger.merge_all(canonical);
    dropped.extend(merge_errors);
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }

    // Group under WO families and attach expiration impacts.
    let mut families = consolidate(merged);
    let calculator = CliffCalculator::new(&config.terms);
    for family in &mut families {
        family.patent_cliff_impact = calculator.compute_impact(family, options.as_of);
    }
    let cliff_summary = calculator.summarize(&families, options.as_of);

    info!(
        molecule = %options.molecule_name,
        raw = raw.len(),
        families = families.len(),
        dropped = dropped.len(),
        "consolidation pipeline complete"
    );

    let sources_queried = if options.sources_queried.is_empty() {
        // Pre-fetched path: coverage is whatever the records claim.
        let mut sources: Vec<Source> = raw.iter().map(|r| r.source).collect();
        sources.sort();
        sources.dedup();
        sources
    } else {
        options.sources_queried
    };

    let ctx = BuildContext {
        molecule_name: options.molecule_name,
        generated_at: options.generated_at,
        target_countries: options.target_countries,
        sources: SourceCoverage {
            queried: sources_queried.iter().map(|s| s.label().to_string()).collect(),
            failed: options
                .sources_failed
                .iter()
                .map(|s| s.label().to_string())
                .collect(),
            records_by_source,
        },
        research_and_development: options.research_and_development,
        include_legacy: options.include_legacy,
        elapsed_ms: options.elapsed_ms,
    };

    Ok(PipelineOutcome {
        result: build(families, cliff_summary, ctx),
        dropped,
    })
}

/// Consolidate pre-fetched raw records into a report.
///
/// The entry point for callers that already hold raw data and do not go
/// through the async search service. `enable_legacy` additionally emits
/// the flat backward-compatible projection.
pub fn consolidate_records(
    raw: &[RawPatentRecord],
    config: &EngineConfig,
    molecule_name: &str,
    enable_legacy: bool,
) -> Result<SearchResult, EngineError> {
    let cancel = CancellationToken::new();
    let options = ConsolidateOptions::for_prefetched(molecule_name, enable_legacy);
    run(raw, config, &cancel, options).map(|outcome| outcome.result)
}
