//! Final report assembly.
//!
//! Everything here is derived from already-consolidated data. The legacy
//! flat view in particular is a pure projection of the consolidated
//! families — never a second computation — so the two views cannot
//! disagree.

use std::collections::BTreeMap;

use patfam_core::types::{
    CliffOutlook, CliffSummary, ConsolidatedFamily, ExecutiveSummary, LegacyView, Metadata,
    PatentOverview, PatentSearchSection, SearchResult, SearchStatistics, SourceCoverage,
};

/// Request-scoped context the builder folds into `metadata` and the
/// executive summary.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub molecule_name: String,
    pub generated_at: String,
    pub target_countries: Vec<String>,
    pub sources: SourceCoverage,
    pub research_and_development: serde_json::Value,
    pub include_legacy: bool,
    pub elapsed_ms: Option<u64>,
}

/// Assemble the final nested report.
pub fn build(
    families: Vec<ConsolidatedFamily>,
    cliff_summary: CliffSummary,
    ctx: BuildContext,
) -> SearchResult {
    let statistics = search_statistics(&families);
    let legacy = ctx.include_legacy.then(|| project_legacy(&families));

    let metadata = Metadata {
        molecule_name: ctx.molecule_name.clone(),
        generated_at: ctx.generated_at,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        target_countries: ctx.target_countries,
        sources: ctx.sources.clone(),
        total_families: families.len(),
        total_national_patents: statistics.total_national_patents,
        elapsed_ms: ctx.elapsed_ms,
    };

    let executive_summary = ExecutiveSummary {
        molecule_name: ctx.molecule_name,
        patent_overview: patent_overview(&families, &statistics),
        patent_cliff: cliff_outlook(&cliff_summary),
        records_by_source: ctx.sources.records_by_source,
    };

    SearchResult {
        metadata,
        executive_summary,
        patent_search: PatentSearchSection {
            consolidated_patents: families,
            statistics,
            patent_cliff: cliff_summary,
        },
        research_and_development: ctx.research_and_development,
        legacy,
    }
}

fn search_statistics(families: &[ConsolidatedFamily]) -> SearchStatistics {
    let mut jurisdictions: Vec<&str> = Vec::new();
    let mut stats = SearchStatistics::default();

    for family in families {
        let nationals = family.national_count();
        stats.total_national_patents += nationals;
        if family.orphan {
            stats.orphan_families += 1;
            stats.patents_without_wo += nationals;
        } else {
            stats.total_wo_patents += 1;
            if nationals > 0 {
                stats.wo_with_national_patents += 1;
            } else {
                stats.wo_without_national_patents += 1;
            }
        }
        for jurisdiction in family.national_patents.keys() {
            if !jurisdictions.contains(&jurisdiction.as_str()) {
                jurisdictions.push(jurisdiction);
            }
        }
    }

    stats.total_unique_jurisdictions = jurisdictions.len();
    stats
}

fn patent_overview(
    families: &[ConsolidatedFamily],
    statistics: &SearchStatistics,
) -> PatentOverview {
    let mut jurisdictions: Vec<String> = families
        .iter()
        .flat_map(|f| f.national_patents.keys().cloned())
        .collect();
    jurisdictions.sort();
    jurisdictions.dedup();

    PatentOverview {
        total_families: families.len(),
        wo_families: statistics.total_wo_patents,
        orphan_families: statistics.orphan_families,
        total_national_patents: statistics.total_national_patents,
        jurisdictions,
    }
}

/// Risk bands over years-until-cliff: High under 3 years, Medium under 5,
/// Low otherwise (or when no expiration is computable).
fn cliff_outlook(summary: &CliffSummary) -> CliffOutlook {
    let risk_level = match summary.years_until_cliff {
        Some(years) if years < 3.0 => "High",
        Some(years) if years < 5.0 => "Medium",
        _ => "Low",
    };

    CliffOutlook {
        first_expiration: summary.first_expiration,
        years_until_cliff: summary.years_until_cliff,
        status: summary.status.clone(),
        risk_level: risk_level.to_string(),
    }
}

/// The backward-compatible flat shape: sorted real WO numbers plus
/// national records flattened per jurisdiction.
pub fn project_legacy(families: &[ConsolidatedFamily]) -> LegacyView {
    let mut wo_patents: Vec<String> = families
        .iter()
        .filter(|f| !f.orphan)
        .map(|f| f.wo_number.clone())
        .collect();
    wo_patents.sort();

    let mut patents_by_country: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for family in families {
        for (jurisdiction, records) in &family.national_patents {
            patents_by_country
                .entry(jurisdiction.clone())
                .or_default()
                .extend(records.iter().cloned());
        }
    }
    for records in patents_by_country.values_mut() {
        records.sort_by(|a, b| a.canonical_number().cmp(b.canonical_number()));
    }

    LegacyView {
        wo_patents,
        patents_by_country,
    }
}
