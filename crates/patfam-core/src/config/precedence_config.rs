//! Source precedence configuration.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::Source;

/// Ordered source precedence used to arbitrate conflicting field values
/// and family-linkage claims.
///
/// EPO family data is the most authoritative, INPI next, Google Patents
/// last — but the order is injected configuration, not a hard-coded rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecedenceConfig {
    pub order: Vec<Source>,
}

impl Default for PrecedenceConfig {
    fn default() -> Self {
        Self {
            order: vec![Source::Epo, Source::Inpi, Source::GooglePatents],
        }
    }
}

impl PrecedenceConfig {
    /// Rank of a source: lower wins. Sources missing from the configured
    /// order rank after every listed one.
    pub fn rank(&self, source: Source) -> usize {
        self.order
            .iter()
            .position(|s| *s == source)
            .unwrap_or(self.order.len())
    }

    /// Compare two sources by precedence.
    pub fn compare(&self, a: Source, b: Source) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }
}
