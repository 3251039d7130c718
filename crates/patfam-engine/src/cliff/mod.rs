//! Patent cliff computation — effective expirations and proximity.

use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate};

use patfam_core::config::TermConfig;
use patfam_core::types::{
    CanonicalPatentRecord, CliffSummary, CliffTimelineEntry, ConsolidatedFamily,
    PatentCliffImpact,
};

/// Signed fractional years between two dates, rounded to two decimals.
/// Negative when `to` lies before `as_of`.
pub fn years_between(as_of: NaiveDate, to: NaiveDate) -> f64 {
    let days = (to - as_of).num_days() as f64;
    (days / 365.25 * 100.0).round() / 100.0
}

pub struct CliffCalculator<'a> {
    terms: &'a TermConfig,
}

impl<'a> CliffCalculator<'a> {
    pub fn new(terms: &'a TermConfig) -> Self {
        Self { terms }
    }

    /// Effective expiration of one record: priority date (falling back to
    /// filing date) plus the jurisdiction's statutory term, plus any
    /// recorded term extension when extensions are honored. `None` when
    /// the record carries neither date — expiration is never guessed.
    pub fn effective_expiration(&self, record: &CanonicalPatentRecord) -> Option<NaiveDate> {
        let base = record.term_base_date()?.earliest_day();
        let years = self.terms.years_for(&record.jurisdiction);
        let mut expiration = base.checked_add_months(Months::new(years * 12))?;
        if self.terms.effective_honor_extensions() {
            if let Some(ext) = &record.term_extension_days {
                expiration = expiration.checked_add_signed(Duration::try_days(ext.value)?)?;
            }
        }
        Some(expiration)
    }

    /// The family's earliest effective expiration, or `None` when no
    /// member record is computable. Ties break on the canonical number so
    /// the basis record is deterministic.
    pub fn compute_impact(
        &self,
        family: &ConsolidatedFamily,
        as_of: NaiveDate,
    ) -> Option<PatentCliffImpact> {
        let earliest = family
            .records()
            .filter_map(|record| {
                self.effective_expiration(record)
                    .map(|expiration| (expiration, record.canonical_number().to_string()))
            })
            .min()?;

        Some(PatentCliffImpact {
            years_until_expiration: years_between(as_of, earliest.0),
            earliest_expiration: earliest.0,
            basis_record: earliest.1,
        })
    }

    /// Report-level summary across all families, read from the impacts
    /// already attached to them.
    pub fn summarize(&self, families: &[ConsolidatedFamily], as_of: NaiveDate) -> CliffSummary {
        let mut expirations: Vec<NaiveDate> = Vec::new();
        let mut by_year: BTreeMap<i32, Vec<String>> = BTreeMap::new();

        for family in families {
            if let Some(impact) = &family.patent_cliff_impact {
                expirations.push(impact.earliest_expiration);
                by_year
                    .entry(chrono::Datelike::year(&impact.earliest_expiration))
                    .or_default()
                    .push(family.wo_number.clone());
            }
        }

        let first_expiration = expirations.iter().min().copied();
        let last_expiration = expirations.iter().max().copied();
        let years_until_cliff = first_expiration.map(|d| years_between(as_of, d));
        let status = years_until_cliff.map(|years| {
            if years > 5.0 {
                "Safe (>5 years)".to_string()
            } else {
                "Warning (<5 years)".to_string()
            }
        });

        let timeline = by_year
            .into_iter()
            .map(|(year, mut wo_numbers)| {
                wo_numbers.sort();
                CliffTimelineEntry {
                    year,
                    families_expiring: wo_numbers.len(),
                    wo_numbers,
                }
            })
            .collect();

        CliffSummary {
            first_expiration,
            last_expiration,
            families_with_known_expiration: expirations.len(),
            years_until_cliff,
            status,
            timeline,
        }
    }
}
