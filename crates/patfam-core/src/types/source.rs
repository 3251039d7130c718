//! Upstream patent data sources.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three upstream providers the engine consolidates across.
///
/// The derived `Ord` gives a stable storage order for maps keyed by source;
/// merge precedence is a separate, injectable concern
/// (`config::PrecedenceConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "EPO")]
    Epo,
    #[serde(rename = "INPI")]
    Inpi,
    #[serde(rename = "Google Patents")]
    GooglePatents,
}

impl Source {
    /// All known sources, in storage order.
    pub const ALL: [Source; 3] = [Source::Epo, Source::Inpi, Source::GooglePatents];

    /// Human-readable label, matching the wire representation.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Epo => "EPO",
            Source::Inpi => "INPI",
            Source::GooglePatents => "Google Patents",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_stable() {
        assert_eq!(serde_json::to_string(&Source::Epo).unwrap(), "\"EPO\"");
        assert_eq!(
            serde_json::to_string(&Source::GooglePatents).unwrap(),
            "\"Google Patents\""
        );
        let parsed: Source = serde_json::from_str("\"INPI\"").unwrap();
        assert_eq!(parsed, Source::Inpi);
    }
}
