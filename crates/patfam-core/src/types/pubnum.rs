//! Publication number normalization.
//!
//! Every source formats numbers differently: `WO 2015/183882`,
//! `WO2015183882A1`, `BR 11 2017 012345-8`, `PI0923422-0`. Record identity
//! across the whole engine hangs on normalizing these to one canonical
//! form, so parsing lives here as a pure function and is fuzz-tested in
//! the engine crate.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical shape: alpha prefix, digit sequence, optional kind code.
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{1,2})([0-9]{4,})([A-Z][0-9]?)?$").expect("static regex"));

/// WO-shaped identifiers inside free text: `WO2013084138`,
/// `WO 2013 084138`, `WO/2013/084138`.
static WO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"WO[\s/]*([0-9]{4})[\s/]*([0-9]{6})").expect("static regex"));

/// Brazilian legacy filing prefixes published by INPI before the BR-format
/// switch. The prefix stays in the canonical string; the jurisdiction is BR.
const BR_LEGACY_PREFIXES: [&str; 3] = ["PI", "MU", "C"];

/// A normalized publication number.
///
/// `canonical` is uppercase with punctuation and whitespace removed and the
/// kind code stripped; it is the identity key for dedup/merge. Kind codes
/// (A1, B1, ...) distinguish publication events of the same document, so
/// they merge rather than split records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicationNumber {
    pub jurisdiction: String,
    pub sequence: String,
    pub kind: Option<String>,
    pub canonical: String,
}

impl PublicationNumber {
    /// Parse a source-formatted publication number.
    ///
    /// Returns `None` when no jurisdiction-prefixed number can be read out
    /// of the input.
    pub fn parse(raw: &str) -> Option<PublicationNumber> {
        let compact: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if compact.is_empty() {
            return None;
        }

        let caps = NUMBER_RE.captures(&compact)?;
        let prefix = caps.get(1).map(|m| m.as_str())?;
        let sequence = caps.get(2).map(|m| m.as_str())?.to_string();
        let kind = caps.get(3).map(|m| m.as_str().to_string());

        let jurisdiction = if BR_LEGACY_PREFIXES.contains(&prefix) {
            "BR".to_string()
        } else if prefix.len() == 2 {
            prefix.to_string()
        } else {
            return None;
        };

        Some(PublicationNumber {
            jurisdiction,
            canonical: format!("{prefix}{sequence}"),
            sequence,
            kind,
        })
    }

    pub fn is_wo(&self) -> bool {
        self.jurisdiction == "WO"
    }
}

impl fmt::Display for PublicationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Extract the first WO-shaped identifier from free text, normalized to
/// `WO` + 4-digit year + 6-digit serial.
pub fn find_wo_number(text: &str) -> Option<String> {
    WO_RE
        .captures(text)
        .map(|caps| format!("WO{}{}", &caps[1], &caps[2]))
}
