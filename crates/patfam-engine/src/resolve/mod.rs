//! Family resolution — which WO number owns each record.

use serde_json::Value;

use patfam_core::types::{find_wo_number, CanonicalPatentRecord, Sourced};

/// Source-supplied linkage fields, scanned in order. The first WO-shaped
/// identifier found wins.
pub const LINKAGE_FIELDS: [&str; 7] = [
    "wo_number",
    "wo_publication",
    "wo_related",
    "wo_primary",
    "pct",
    "priority_numbers",
    "family_members",
];

/// Resolve the owning family for a freshly-normalized record.
///
/// A WO-kind record is its own family. Anything else is searched for a
/// WO-shaped identifier across its linkage fields; no match leaves the
/// record an orphan (`family = None`), to be keyed synthetically at
/// consolidation. Conflicting claims between sources are arbitrated later,
/// at merge time, by source precedence.
pub fn resolve_family(record: &mut CanonicalPatentRecord) {
    if record.publication_number.is_wo() {
        let source = match record.source_set.iter().next() {
            Some(s) => *s,
            None => return,
        };
        record.family = Some(Sourced::new(
            record.publication_number.canonical.clone(),
            source,
        ));
        return;
    }

    for (source, fragment) in &record.raw_fragments {
        for field in LINKAGE_FIELDS {
            if let Some(wo) = fragment.get(field).and_then(scan_for_wo) {
                record.family = Some(Sourced::new(wo, *source));
                return;
            }
        }
    }
}

/// Depth-first scan of a linkage value for the first WO-shaped identifier.
/// Linkage fields arrive as plain strings, arrays of strings, or arrays of
/// objects (priority claims, family-member entries).
fn scan_for_wo(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => find_wo_number(s),
        Value::Array(items) => items.iter().find_map(scan_for_wo),
        Value::Object(map) => map.values().find_map(scan_for_wo),
        _ => None,
    }
}
