//! The final report shape.
//!
//! Top-level keys (`metadata`, `executive_summary`, `patent_search`,
//! `research_and_development`) and the per-family shape under
//! `patent_search.consolidated_patents` are a compatibility contract;
//! renaming or restructuring them breaks downstream consumers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::family::ConsolidatedFamily;
use super::records::CanonicalPatentRecord;

/// Which sources were queried, which failed, and how many records each
/// source returned. Failed sources narrow completeness without failing
/// the request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SourceCoverage {
    pub queried: Vec<String>,
    pub failed: Vec<String>,
    pub records_by_source: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub molecule_name: String,
    pub generated_at: String,
    pub engine_version: String,
    pub target_countries: Vec<String>,
    pub sources: SourceCoverage,
    pub total_families: usize,
    pub total_national_patents: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

/// One year of the expiration timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliffTimelineEntry {
    pub year: i32,
    pub families_expiring: usize,
    pub wo_numbers: Vec<String>,
}

/// Report-level expiration summary across all families.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CliffSummary {
    pub first_expiration: Option<NaiveDate>,
    pub last_expiration: Option<NaiveDate>,
    pub families_with_known_expiration: usize,
    pub years_until_cliff: Option<f64>,
    pub status: Option<String>,
    pub timeline: Vec<CliffTimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PatentOverview {
    pub total_families: usize,
    pub wo_families: usize,
    pub orphan_families: usize,
    pub total_national_patents: usize,
    pub jurisdictions: Vec<String>,
}

/// Executive-summary echo of the cliff, with a coarse risk band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CliffOutlook {
    pub first_expiration: Option<NaiveDate>,
    pub years_until_cliff: Option<f64>,
    pub status: Option<String>,
    pub risk_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub molecule_name: String,
    pub patent_overview: PatentOverview,
    pub patent_cliff: CliffOutlook,
    pub records_by_source: BTreeMap<String, usize>,
}

/// Aggregate statistics over the consolidated output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchStatistics {
    pub total_wo_patents: usize,
    pub wo_with_national_patents: usize,
    pub wo_without_national_patents: usize,
    pub orphan_families: usize,
    pub total_national_patents: usize,
    /// National records grouped under orphan families.
    pub patents_without_wo: usize,
    pub total_unique_jurisdictions: usize,
}

/// The WO-centric core of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatentSearchSection {
    pub consolidated_patents: Vec<ConsolidatedFamily>,
    pub statistics: SearchStatistics,
    pub patent_cliff: CliffSummary,
}

/// Backward-compatible flat projection. Derived from the consolidated
/// families, never recomputed, so the two views cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyView {
    pub wo_patents: Vec<String>,
    pub patents_by_country: BTreeMap<String, Vec<CanonicalPatentRecord>>,
}

/// The complete response document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub metadata: Metadata,
    pub executive_summary: ExecutiveSummary,
    pub patent_search: PatentSearchSection,
    /// Opaque passthrough from the R&D collaborators.
    pub research_and_development: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy: Option<LegacyView>,
}
