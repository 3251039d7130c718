//! Deduplication and field-level merge.
//!
//! Two records are the same patent iff their normalized publication numbers
//! match. The merge is associative and order-independent: every winner is a
//! minimum over the total order (source precedence rank, value), and every
//! displaced value lands in the losing source's `raw_fragments` as a set
//! union. Sources can therefore be folded in incrementally, in whatever
//! order they respond, and converge on an identical record.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use patfam_core::config::PrecedenceConfig;
use patfam_core::errors::{MergeError, RecordError};
use patfam_core::types::collections::FxHashMap;
use patfam_core::types::{CanonicalPatentRecord, DocumentLink, Source, Sourced};

pub struct Merger<'a> {
    precedence: &'a PrecedenceConfig,
}

impl<'a> Merger<'a> {
    pub fn new(precedence: &'a PrecedenceConfig) -> Self {
        Self { precedence }
    }

    /// Fold a batch of records into deduplicated form.
    ///
    /// Records that fail the identity check are dropped pairwise: the
    /// existing record is kept, the incoming one is reported. Output order
    /// is canonical-number ascending, independent of input order.
    pub fn merge_all(
        &self,
        records: Vec<CanonicalPatentRecord>,
    ) -> (Vec<CanonicalPatentRecord>, Vec<RecordError>) {
        let mut by_number: FxHashMap<String, CanonicalPatentRecord> = FxHashMap::default();
        let mut errors = Vec::new();

        for record in records {
            let key = record.canonical_number().to_string();
            match by_number.remove(&key) {
                None => {
                    by_number.insert(key, record);
                }
                Some(existing) => {
                    // Check identity before consuming either record, so the
                    // already-accepted one survives a conflict.
                    if let Some(err) = identity_conflict(&existing, &record) {
                        debug!(number = %key, error = %err, "dropping inconsistent record");
                        errors.push(RecordError::Merge(err));
                        by_number.insert(key, existing);
                        continue;
                    }
                    match self.merge(existing, record) {
                        Ok(merged) => {
                            by_number.insert(key, merged);
                        }
                        Err(err) => errors.push(RecordError::Merge(err)),
                    }
                }
            }
        }

        let mut merged: Vec<CanonicalPatentRecord> = by_number.into_values().collect();
        merged.sort_by(|a, b| a.canonical_number().cmp(b.canonical_number()));
        (merged, errors)
    }

    /// Merge two records describing the same patent.
    pub fn merge(
        &self,
        existing: CanonicalPatentRecord,
        incoming: CanonicalPatentRecord,
    ) -> Result<CanonicalPatentRecord, MergeError> {
        if let Some(err) = identity_conflict(&existing, &incoming) {
            return Err(err);
        }

        let mut merged = existing;

        // Fragments union first, so scalar conflicts below have a place to
        // record displaced values.
        for (source, fragment) in incoming.raw_fragments {
            let target = merged.raw_fragments.entry(source).or_default();
            for (key, value) in fragment {
                merge_fragment_value(target, key, value);
            }
        }
        merged.source_set.extend(incoming.source_set.iter().copied());

        // Kind codes distinguish publication events; keep the earliest.
        merged.publication_number.kind = match (
            merged.publication_number.kind.take(),
            incoming.publication_number.kind,
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        merged.title = self.pick(
            "title",
            merged.title.take(),
            incoming.title,
            &mut merged.raw_fragments,
        );
        merged.legal_status = self.pick(
            "legal_status",
            merged.legal_status.take(),
            incoming.legal_status,
            &mut merged.raw_fragments,
        );
        merged.filing_date = self.pick(
            "filing_date",
            merged.filing_date.take(),
            incoming.filing_date,
            &mut merged.raw_fragments,
        );
        merged.priority_date = self.pick(
            "priority_date",
            merged.priority_date.take(),
            incoming.priority_date,
            &mut merged.raw_fragments,
        );
        merged.grant_date = self.pick(
            "grant_date",
            merged.grant_date.take(),
            incoming.grant_date,
            &mut merged.raw_fragments,
        );
        merged.publication_date = self.pick(
            "publication_date",
            merged.publication_date.take(),
            incoming.publication_date,
            &mut merged.raw_fragments,
        );
        merged.term_extension_days = self.pick(
            "term_extension_days",
            merged.term_extension_days.take(),
            incoming.term_extension_days,
            &mut merged.raw_fragments,
        );
        merged.family = self.pick_family(
            merged.family.take(),
            incoming.family,
            &mut merged.raw_fragments,
        );

        merged.applicants =
            self.union_applicants(std::mem::take(&mut merged.applicants), incoming.applicants);
        merged.links = self.union_links(std::mem::take(&mut merged.links), incoming.links);

        Ok(merged)
    }

    /// Choose the winning scalar: minimum by (precedence rank, value).
    /// A displaced differing value is retained under the losing source's
    /// fragment as `alternative_<field>`.
    fn pick<T>(
        &self,
        field: &'static str,
        a: Option<Sourced<T>>,
        b: Option<Sourced<T>>,
        fragments: &mut BTreeMap<Source, Map<String, Value>>,
    ) -> Option<Sourced<T>>
    where
        T: Ord + Clone + serde::Serialize,
    {
        self.pick_with_loser_key(field, "alternative", a, b, fragments)
    }

    /// Family-linkage claims use a dedicated audit key.
    fn pick_family(
        &self,
        a: Option<Sourced<String>>,
        b: Option<Sourced<String>>,
        fragments: &mut BTreeMap<Source, Map<String, Value>>,
    ) -> Option<Sourced<String>> {
        self.pick_with_loser_key("family_linkage", "discarded", a, b, fragments)
    }

    fn pick_with_loser_key<T>(
        &self,
        field: &'static str,
        prefix: &'static str,
        a: Option<Sourced<T>>,
        b: Option<Sourced<T>>,
        fragments: &mut BTreeMap<Source, Map<String, Value>>,
    ) -> Option<Sourced<T>>
    where
        T: Ord + Clone + serde::Serialize,
    {
        match (a, b) {
            (None, None) => None,
            (Some(v), None) | (None, Some(v)) => Some(v),
            (Some(a), Some(b)) => {
                if a.value == b.value {
                    // Same value: attribute it to the stronger source.
                    let winner = if self.precedence.compare(a.source, b.source).is_le() {
                        a
                    } else {
                        b
                    };
                    return Some(winner);
                }
                let a_wins = (self.precedence.rank(a.source), &a.value)
                    <= (self.precedence.rank(b.source), &b.value);
                let (winner, loser) = if a_wins { (a, b) } else { (b, a) };
                if let Ok(value) = serde_json::to_value(&loser.value) {
                    let target = fragments.entry(loser.source).or_default();
                    merge_fragment_value(target, format!("{prefix}_{field}"), value);
                }
                Some(winner)
            }
        }
    }

    /// Union of applicants, deduplicated case-insensitively, ordered by
    /// (precedence rank of contributing source, name).
    fn union_applicants(
        &self,
        a: Vec<Sourced<String>>,
        b: Vec<Sourced<String>>,
    ) -> Vec<Sourced<String>> {
        let mut out: Vec<Sourced<String>> = Vec::with_capacity(a.len() + b.len());
        for candidate in a.into_iter().chain(b) {
            match out
                .iter_mut()
                .find(|n| n.value.eq_ignore_ascii_case(&candidate.value))
            {
                None => out.push(candidate),
                Some(existing) => {
                    let existing_key =
                        (self.precedence.rank(existing.source), existing.value.clone());
                    let candidate_key =
                        (self.precedence.rank(candidate.source), candidate.value.clone());
                    if candidate_key < existing_key {
                        *existing = candidate;
                    }
                }
            }
        }
        out.sort_by(|x, y| {
            (self.precedence.rank(x.source), &x.value)
                .cmp(&(self.precedence.rank(y.source), &y.value))
        });
        out
    }

    /// Union of document links, deduplicated by URL, ordered by
    /// (precedence rank, kind, url).
    fn union_links(&self, a: Vec<DocumentLink>, b: Vec<DocumentLink>) -> Vec<DocumentLink> {
        let mut out: Vec<DocumentLink> = Vec::with_capacity(a.len() + b.len());
        for candidate in a.into_iter().chain(b) {
            match out.iter_mut().find(|l| l.url == candidate.url) {
                None => out.push(candidate),
                Some(existing) => {
                    let existing_key =
                        (self.precedence.rank(existing.source), existing.kind.clone());
                    let candidate_key =
                        (self.precedence.rank(candidate.source), candidate.kind.clone());
                    if candidate_key < existing_key {
                        *existing = candidate;
                    }
                }
            }
        }
        out.sort_by(|x, y| {
            (self.precedence.rank(x.source), &x.kind, &x.url)
                .cmp(&(self.precedence.rank(y.source), &y.kind, &y.url))
        });
        out
    }
}

/// Identity check: matching normalized numbers must agree on jurisdiction.
/// Disagreement signals a normalization defect upstream.
fn identity_conflict(
    existing: &CanonicalPatentRecord,
    incoming: &CanonicalPatentRecord,
) -> Option<MergeError> {
    if existing.jurisdiction != incoming.jurisdiction {
        return Some(MergeError::InconsistentRecord {
            number: existing.publication_number.canonical.clone(),
            field: "jurisdiction",
            existing: existing.jurisdiction.clone(),
            incoming: incoming.jurisdiction.clone(),
        });
    }
    None
}

/// Merge one fragment value into a fragment map as a set union: equal
/// values collapse, differing values accumulate into a sorted array.
/// The result depends only on the set of values, not on arrival order.
fn merge_fragment_value(target: &mut Map<String, Value>, key: String, value: Value) {
    match target.get_mut(&key) {
        None => {
            target.insert(key, value);
        }
        Some(existing) if *existing == value => {}
        Some(existing) => {
            let mut items = match existing.take() {
                Value::Array(items) => items,
                other => vec![other],
            };
            let new_items = match value {
                Value::Array(items) => items,
                other => vec![other],
            };
            for item in new_items {
                if !items.contains(&item) {
                    items.push(item);
                }
            }
            items.sort_by_key(|v| v.to_string());
            *existing = Value::Array(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patfam_core::types::{PublicationNumber, RawPatentRecord};
    use serde_json::json;

    use crate::normalize::normalize;
    use crate::resolve::resolve_family;

    fn record(source: Source, fields: Value) -> CanonicalPatentRecord {
        let mut r = normalize(&RawPatentRecord::from_value(source, fields)).expect("normalizes");
        resolve_family(&mut r);
        r
    }

    fn merger_fixture() -> PrecedenceConfig {
        PrecedenceConfig::default()
    }

    #[test]
    fn higher_precedence_source_wins_scalars() {
        let precedence = merger_fixture();
        let merger = Merger::new(&precedence);

        let epo = record(
            Source::Epo,
            json!({"publication_number": "WO2015183882", "title": "EPO title"}),
        );
        let google = record(
            Source::GooglePatents,
            json!({"publication_number": "WO2015183882", "title": "Google title"}),
        );

        let merged = merger.merge(google.clone(), epo.clone()).unwrap();
        assert_eq!(merged.title.as_ref().unwrap().value, "EPO title");
        assert_eq!(merged.title.as_ref().unwrap().source, Source::Epo);

        // The displaced value is retained for audit.
        let fragment = merged.raw_fragments.get(&Source::GooglePatents).unwrap();
        assert_eq!(
            fragment.get("alternative_title"),
            Some(&json!("Google title"))
        );

        // Order independence.
        let merged_other_way = merger.merge(epo, google).unwrap();
        assert_eq!(merged, merged_other_way);
    }

    #[test]
    fn collections_union_without_duplicates() {
        let precedence = merger_fixture();
        let merger = Merger::new(&precedence);

        let a = record(
            Source::Inpi,
            json!({
                "patent_number": "BR112017012345",
                "applicants": ["Acme Pharma"],
                "link_national": "https://inpi.example/BR112017012345",
            }),
        );
        let b = record(
            Source::GooglePatents,
            json!({
                "patent_number": "BR112017012345",
                "applicants": ["ACME PHARMA", "Beta Labs"],
                "link_google_patents": "https://patents.google.com/patent/BR112017012345",
            }),
        );

        let merged = merger.merge(a, b).unwrap();
        assert_eq!(merged.applicants.len(), 2);
        // INPI outranks Google, so its spelling leads.
        assert_eq!(merged.applicants[0].value, "Acme Pharma");
        assert_eq!(merged.links.len(), 2);
        assert_eq!(
            merged.source_set.iter().copied().collect::<Vec<_>>(),
            vec![Source::Inpi, Source::GooglePatents]
        );
    }

    #[test]
    fn jurisdiction_mismatch_is_inconsistent() {
        let precedence = merger_fixture();
        let merger = Merger::new(&precedence);

        let a = record(Source::Epo, json!({"publication_number": "WO2015183882"}));
        let mut b = record(Source::Epo, json!({"publication_number": "WO2015183882"}));
        b.jurisdiction = "US".to_string();
        b.publication_number = PublicationNumber {
            jurisdiction: "US".to_string(),
            sequence: "2015183882".to_string(),
            kind: None,
            canonical: "WO2015183882".to_string(),
        };

        let err = merger.merge(a, b).unwrap_err();
        assert!(matches!(err, MergeError::InconsistentRecord { .. }));
    }

    #[test]
    fn family_claims_arbitrated_by_precedence() {
        let precedence = merger_fixture();
        let merger = Merger::new(&precedence);

        let epo = record(
            Source::Epo,
            json!({
                "publication_number": "BR112017012345",
                "wo_related": "WO2015183882",
            }),
        );
        let google = record(
            Source::GooglePatents,
            json!({
                "publication_number": "BR112017012345",
                "wo_related": "WO2099000001",
            }),
        );

        let merged = merger.merge(google, epo).unwrap();
        assert_eq!(merged.family_id(), Some("WO2015183882"));
        let fragment = merged.raw_fragments.get(&Source::GooglePatents).unwrap();
        assert_eq!(
            fragment.get("discarded_family_linkage"),
            Some(&json!("WO2099000001"))
        );
    }

    #[test]
    fn merge_all_keys_on_canonical_number() {
        let precedence = merger_fixture();
        let merger = Merger::new(&precedence);

        let records = vec![
            record(Source::Epo, json!({"publication_number": "WO 2015/183882 A1"})),
            record(Source::GooglePatents, json!({"publication_number": "wo2015183882"})),
            record(Source::Inpi, json!({"patent_number": "BR112017012345"})),
        ];

        let (merged, errors) = merger.merge_all(records);
        assert!(errors.is_empty());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].canonical_number(), "BR112017012345");
        assert_eq!(merged[1].canonical_number(), "WO2015183882");
        assert_eq!(merged[1].source_set.len(), 2);
    }
}
