//! WO-centric consolidated families.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::records::CanonicalPatentRecord;

/// Expiration outlook for one family.
///
/// Absent entirely (the family-level field is `None`) when no member record
/// carries a computable expiration — absence is explicit, never a sentinel
/// date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatentCliffImpact {
    /// Minimum effective expiration across the family's records.
    pub earliest_expiration: NaiveDate,
    /// Signed fractional years from the analysis date; negative means the
    /// family is already expired.
    pub years_until_expiration: f64,
    /// Canonical number of the record that produced the minimum.
    pub basis_record: String,
}

/// Per-family counts and coverage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FamilyStatistics {
    pub total_national_patents: usize,
    pub jurisdiction_count: usize,
    pub patents_by_jurisdiction: BTreeMap<String, usize>,
    pub jurisdictions_with_protection: Vec<String>,
    /// Labels of the sources that contributed records to this family.
    pub sources: Vec<String>,
}

/// One WO family and everything consolidated under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedFamily {
    /// Real WO number, or a deterministic synthetic key for orphans.
    pub wo_number: String,
    /// True when no WO parent could be discovered for the group.
    pub orphan: bool,
    /// The WO-level record, when one was fetched. Families referenced only
    /// through national linkage keep their real number with no WO data.
    pub wo_data: Option<CanonicalPatentRecord>,
    /// National records grouped by jurisdiction, publication date ascending.
    pub national_patents: BTreeMap<String, Vec<CanonicalPatentRecord>>,
    pub patent_cliff_impact: Option<PatentCliffImpact>,
    pub statistics: FamilyStatistics,
}

impl ConsolidatedFamily {
    /// All records in the family: WO data first, then nationals in
    /// jurisdiction order.
    pub fn records(&self) -> impl Iterator<Item = &CanonicalPatentRecord> {
        self.wo_data
            .iter()
            .chain(self.national_patents.values().flatten())
    }

    pub fn national_count(&self) -> usize {
        self.national_patents.values().map(Vec::len).sum()
    }
}
