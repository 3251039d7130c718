//! Raw and canonical patent records.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::dates::PartialDate;
use super::pubnum::PublicationNumber;
use super::source::Source;

/// A record exactly as received from one upstream provider: a source tag
/// and an arbitrary field bag. Immutable and per-request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPatentRecord {
    pub source: Source,
    pub fields: Map<String, Value>,
}

impl RawPatentRecord {
    pub fn new(source: Source, fields: Map<String, Value>) -> Self {
        Self { source, fields }
    }

    /// Build from any JSON value; non-object values yield an empty bag.
    pub fn from_value(source: Source, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { source, fields }
    }
}

/// A field value together with the source that supplied it.
///
/// Merge picks winners by source precedence, so every scalar keeps its
/// provenance in memory. On the wire only the value is emitted; provenance
/// is recoverable from `source_set` and `raw_fragments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }
}

impl<T: Serialize> Serialize for Sourced<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// A link to a source document page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLink {
    pub kind: String,
    pub url: String,
    #[serde(skip)]
    pub source: Source,
}

impl DocumentLink {
    pub fn new(kind: impl Into<String>, url: impl Into<String>, source: Source) -> Self {
        Self {
            kind: kind.into(),
            url: url.into(),
            source,
        }
    }
}

/// The normalized record shape every raw record maps into.
///
/// Mutable while merging; finalized once consolidation assigns it to a
/// family. `raw_fragments` retains, per source, every original field that
/// did not map onto a canonical field, plus values displaced during merge
/// conflicts — merge never drops data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalPatentRecord {
    pub publication_number: PublicationNumber,
    pub jurisdiction: String,
    /// Resolved owning family (a WO number), with the claiming source.
    #[serde(rename = "family_id")]
    pub family: Option<Sourced<String>>,
    pub title: Option<Sourced<String>>,
    pub legal_status: Option<Sourced<String>>,
    pub filing_date: Option<Sourced<PartialDate>>,
    pub priority_date: Option<Sourced<PartialDate>>,
    pub grant_date: Option<Sourced<PartialDate>>,
    pub publication_date: Option<Sourced<PartialDate>>,
    /// Recorded term extension, in days, when a source supplies one.
    pub term_extension_days: Option<Sourced<i64>>,
    pub applicants: Vec<Sourced<String>>,
    pub links: Vec<DocumentLink>,
    pub source_set: BTreeSet<Source>,
    pub raw_fragments: BTreeMap<Source, Map<String, Value>>,
}

impl CanonicalPatentRecord {
    /// An empty record for the given number, attributed to one source.
    pub fn new(publication_number: PublicationNumber, source: Source) -> Self {
        let jurisdiction = publication_number.jurisdiction.clone();
        let mut source_set = BTreeSet::new();
        source_set.insert(source);
        Self {
            publication_number,
            jurisdiction,
            family: None,
            title: None,
            legal_status: None,
            filing_date: None,
            priority_date: None,
            grant_date: None,
            publication_date: None,
            term_extension_days: None,
            applicants: Vec::new(),
            links: Vec::new(),
            source_set,
            raw_fragments: BTreeMap::new(),
        }
    }

    /// Identity key for dedup/merge.
    pub fn canonical_number(&self) -> &str {
        &self.publication_number.canonical
    }

    /// The date expiration arithmetic starts from: priority first,
    /// filing as fallback.
    pub fn term_base_date(&self) -> Option<PartialDate> {
        self.priority_date
            .as_ref()
            .or(self.filing_date.as_ref())
            .map(|d| d.value)
    }

    pub fn family_id(&self) -> Option<&str> {
        self.family.as_ref().map(|f| f.value.as_str())
    }
}
