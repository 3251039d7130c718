//! Record normalization — heterogeneous raw field bags to canonical records.
//!
//! Normalization is a pure function; record identity across the whole
//! pipeline depends on it, so it never guesses. A field is consumed only
//! when it maps cleanly onto a canonical field — everything else, including
//! values that failed to parse, stays verbatim in `raw_fragments[source]`.

use serde_json::{Map, Value};

use patfam_core::errors::NormalizeError;
use patfam_core::types::{
    CanonicalPatentRecord, DocumentLink, PartialDate, PublicationNumber, RawPatentRecord, Source,
    Sourced,
};

/// Field names that may carry the publication number, in lookup order.
const NUMBER_FIELDS: [&str; 4] = ["publication_number", "patent_number", "pub_number", "number"];

const TITLE_FIELDS: [&str; 1] = ["title"];
const LEGAL_STATUS_FIELDS: [&str; 2] = ["legal_status", "status"];
const FILING_FIELDS: [&str; 2] = ["filing_date", "application_date"];
const PRIORITY_FIELDS: [&str; 1] = ["priority_date"];
const GRANT_FIELDS: [&str; 1] = ["grant_date"];
const PUBLICATION_FIELDS: [&str; 1] = ["publication_date"];
const APPLICANT_FIELDS: [&str; 2] = ["applicants", "assignees"];
const EXTENSION_FIELDS: [&str; 2] = ["term_extension_days", "patent_term_extension"];

/// Link fields, mapped to the link kind they represent.
const LINK_FIELDS: [(&str, &str); 4] = [
    ("link_espacenet", "espacenet"),
    ("link_google_patents", "google_patents"),
    ("link_national", "national"),
    ("source_url", "source"),
];

/// Map one raw record into the canonical shape.
///
/// Fails only when no publication number is parseable; the caller drops
/// the record, logs it, and continues the request.
pub fn normalize(raw: &RawPatentRecord) -> Result<CanonicalPatentRecord, NormalizeError> {
    let source = raw.source;
    let number = extract_number(&raw.fields, source)?;

    let mut consumed: Vec<&str> = Vec::new();
    let mut record = CanonicalPatentRecord::new(number, source);

    if let Some((key, value)) = string_field(&raw.fields, &TITLE_FIELDS) {
        record.title = Some(Sourced::new(value, source));
        consumed.push(key);
    }
    if let Some((key, value)) = string_field(&raw.fields, &LEGAL_STATUS_FIELDS) {
        record.legal_status = Some(Sourced::new(value, source));
        consumed.push(key);
    }

    record.filing_date = date_field(&raw.fields, &FILING_FIELDS, source, &mut consumed);
    record.priority_date = date_field(&raw.fields, &PRIORITY_FIELDS, source, &mut consumed);
    record.grant_date = date_field(&raw.fields, &GRANT_FIELDS, source, &mut consumed);
    record.publication_date = date_field(&raw.fields, &PUBLICATION_FIELDS, source, &mut consumed);

    if let Some((key, days)) = integer_field(&raw.fields, &EXTENSION_FIELDS) {
        record.term_extension_days = Some(Sourced::new(days, source));
        consumed.push(key);
    }

    record.applicants = extract_applicants(&raw.fields, source, &mut consumed);
    record.links = extract_links(&raw.fields, source, &mut consumed);

    // The number field itself is consumed; all remaining fields are kept.
    for field in NUMBER_FIELDS {
        if raw
            .fields
            .get(field)
            .and_then(Value::as_str)
            .map(|s| PublicationNumber::parse(s).is_some())
            .unwrap_or(false)
        {
            consumed.push(field);
            break;
        }
    }

    let fragment: Map<String, Value> = raw
        .fields
        .iter()
        .filter(|(key, _)| !consumed.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if !fragment.is_empty() {
        record.raw_fragments.insert(source, fragment);
    }

    Ok(record)
}

fn extract_number(
    fields: &Map<String, Value>,
    source: Source,
) -> Result<PublicationNumber, NormalizeError> {
    let mut seen_value: Option<&str> = None;
    for field in NUMBER_FIELDS {
        if let Some(value) = fields.get(field).and_then(Value::as_str) {
            if value.trim().is_empty() {
                continue;
            }
            if let Some(number) = PublicationNumber::parse(value) {
                return Ok(number);
            }
            seen_value.get_or_insert(value);
        }
    }
    match seen_value {
        Some(value) => Err(NormalizeError::UnparseablePublicationNumber {
            src: source,
            value: value.to_string(),
        }),
        None => Err(NormalizeError::MissingPublicationNumber { src: source }),
    }
}

/// First non-empty string under any of the given keys.
fn string_field<'a>(
    fields: &Map<String, Value>,
    keys: &[&'a str],
) -> Option<(&'a str, String)> {
    for &key in keys {
        if let Some(value) = fields.get(key).and_then(Value::as_str) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some((key, trimmed.to_string()));
            }
        }
    }
    None
}

/// First parseable date under any of the given keys. Unparseable values
/// are left unconsumed so they survive in `raw_fragments`.
fn date_field(
    fields: &Map<String, Value>,
    keys: &[&'static str],
    source: Source,
    consumed: &mut Vec<&'static str>,
) -> Option<Sourced<PartialDate>> {
    for &key in keys {
        if let Some(value) = fields.get(key).and_then(Value::as_str) {
            if let Some(date) = PartialDate::parse(value) {
                consumed.push(key);
                return Some(Sourced::new(date, source));
            }
        }
    }
    None
}

fn integer_field<'a>(fields: &Map<String, Value>, keys: &[&'a str]) -> Option<(&'a str, i64)> {
    for &key in keys {
        match fields.get(key) {
            Some(Value::Number(n)) => {
                if let Some(days) = n.as_i64() {
                    return Some((key, days));
                }
            }
            Some(Value::String(s)) => {
                if let Ok(days) = s.trim().parse::<i64>() {
                    return Some((key, days));
                }
            }
            _ => {}
        }
    }
    None
}

/// Collapse internal whitespace and trim.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_applicants(
    fields: &Map<String, Value>,
    source: Source,
    consumed: &mut Vec<&'static str>,
) -> Vec<Sourced<String>> {
    let mut names: Vec<Sourced<String>> = Vec::new();
    for key in APPLICANT_FIELDS {
        let Some(value) = fields.get(key) else { continue };
        let candidates: Vec<String> = match value {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(normalize_name)
                .collect(),
            Value::String(s) => vec![normalize_name(s)],
            _ => continue,
        };
        consumed.push(key);
        for name in candidates {
            if name.is_empty() {
                continue;
            }
            let duplicate = names
                .iter()
                .any(|n| n.value.eq_ignore_ascii_case(&name));
            if !duplicate {
                names.push(Sourced::new(name, source));
            }
        }
    }
    names.sort_by(|a, b| a.value.cmp(&b.value));
    names
}

fn extract_links(
    fields: &Map<String, Value>,
    source: Source,
    consumed: &mut Vec<&'static str>,
) -> Vec<DocumentLink> {
    let mut links: Vec<DocumentLink> = Vec::new();

    for (field, kind) in LINK_FIELDS {
        if let Some(url) = fields.get(field).and_then(Value::as_str) {
            let url = url.trim();
            if !url.is_empty() {
                consumed.push(field);
                push_link(&mut links, DocumentLink::new(kind, url, source));
            }
        }
    }

    // Document lists (INPI attaches per-patent document tables).
    if let Some(Value::Array(items)) = fields.get("documents") {
        let mut any = false;
        for item in items {
            let Some(obj) = item.as_object() else { continue };
            let Some(url) = obj.get("url").and_then(Value::as_str) else {
                continue;
            };
            let kind = obj
                .get("type")
                .or_else(|| obj.get("kind"))
                .and_then(Value::as_str)
                .unwrap_or("document");
            push_link(&mut links, DocumentLink::new(kind, url.trim(), source));
            any = true;
        }
        if any {
            consumed.push("documents");
        }
    }

    links
}

fn push_link(links: &mut Vec<DocumentLink>, link: DocumentLink) {
    if !links.iter().any(|l| l.url == link.url) {
        links.push(link);
    }
}
