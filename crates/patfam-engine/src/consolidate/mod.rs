//! Family consolidation — grouping merged records under their WO parent.

use std::collections::BTreeMap;

use tracing::info;
use xxhash_rust::xxh3::xxh3_64;

use patfam_core::types::collections::FxHashMap;
use patfam_core::types::{CanonicalPatentRecord, ConsolidatedFamily, FamilyStatistics};

use crate::normalize::normalize_name;

/// Deterministic key for a record with no discoverable WO parent.
///
/// Hashes (jurisdiction, earliest priority/filing date, normalized title)
/// so identical unlinked input produces identical keys across runs, and
/// related unlinked records coalesce into one orphan family.
pub fn synthetic_family_key(record: &CanonicalPatentRecord) -> String {
    let date = record
        .term_base_date()
        .map(|d| d.to_string())
        .unwrap_or_default();
    let title = record
        .title
        .as_ref()
        .map(|t| normalize_name(&t.value).to_lowercase())
        .unwrap_or_default();
    let material = format!("{}|{}|{}", record.jurisdiction, date, title);
    format!("FAM-{:016x}", xxh3_64(material.as_bytes()))
}

/// Group merged records into consolidated families.
///
/// Families with a resolved WO number keep it even when the WO-level
/// record itself was never fetched (`wo_data = None`); only records with
/// no linkage at all become orphans. Output order is deterministic:
/// real-WO families by number ascending, then orphans by synthetic key.
/// Cliff impacts are filled in by a later phase.
pub fn consolidate(records: Vec<CanonicalPatentRecord>) -> Vec<ConsolidatedFamily> {
    let record_count = records.len();
    let mut partitions: FxHashMap<String, (bool, Vec<CanonicalPatentRecord>)> =
        FxHashMap::default();

    for record in records {
        let (key, orphan) = match record.family_id() {
            Some(wo) => (wo.to_string(), false),
            None => (synthetic_family_key(&record), true),
        };
        let entry = partitions.entry(key).or_insert_with(|| (orphan, Vec::new()));
        entry.1.push(record);
    }

    let mut families: Vec<ConsolidatedFamily> = partitions
        .into_iter()
        .map(|(key, (orphan, members))| build_family(key, orphan, members))
        .collect();

    families.sort_by(|a, b| (a.orphan, &a.wo_number).cmp(&(b.orphan, &b.wo_number)));

    info!(
        records = record_count,
        families = families.len(),
        orphans = families.iter().filter(|f| f.orphan).count(),
        "consolidated records into families"
    );

    families
}

fn build_family(
    wo_number: String,
    orphan: bool,
    members: Vec<CanonicalPatentRecord>,
) -> ConsolidatedFamily {
    let mut wo_data: Option<CanonicalPatentRecord> = None;
    let mut national_patents: BTreeMap<String, Vec<CanonicalPatentRecord>> = BTreeMap::new();

    for record in members {
        if record.publication_number.is_wo() {
            wo_data = Some(record);
        } else {
            national_patents
                .entry(record.jurisdiction.clone())
                .or_default()
                .push(record);
        }
    }

    // Publication date ascending, unknown dates last, ties by number.
    for records in national_patents.values_mut() {
        records.sort_by(|a, b| {
            let a_key = (
                a.publication_date.is_none(),
                a.publication_date.as_ref().map(|d| d.value),
            );
            let b_key = (
                b.publication_date.is_none(),
                b.publication_date.as_ref().map(|d| d.value),
            );
            a_key
                .cmp(&b_key)
                .then_with(|| a.canonical_number().cmp(b.canonical_number()))
        });
    }

    let statistics = family_statistics(wo_data.as_ref(), &national_patents);

    ConsolidatedFamily {
        wo_number,
        orphan,
        wo_data,
        national_patents,
        patent_cliff_impact: None,
        statistics,
    }
}

fn family_statistics(
    wo_data: Option<&CanonicalPatentRecord>,
    national_patents: &BTreeMap<String, Vec<CanonicalPatentRecord>>,
) -> FamilyStatistics {
    let patents_by_jurisdiction: BTreeMap<String, usize> = national_patents
        .iter()
        .map(|(jurisdiction, records)| (jurisdiction.clone(), records.len()))
        .collect();

    let mut sources: Vec<_> = national_patents
        .values()
        .flatten()
        .chain(wo_data)
        .flat_map(|r| r.source_set.iter().copied())
        .collect();
    sources.sort();
    sources.dedup();

    FamilyStatistics {
        total_national_patents: national_patents.values().map(Vec::len).sum(),
        jurisdiction_count: national_patents.len(),
        jurisdictions_with_protection: national_patents.keys().cloned().collect(),
        patents_by_jurisdiction,
        sources: sources.into_iter().map(|s| s.label().to_string()).collect(),
    }
}
