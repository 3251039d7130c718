//! Statutory patent term configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Jurisdiction term rules for expiration arithmetic.
///
/// Term lengths and extension handling vary by jurisdiction and are
/// injected configuration pending product confirmation; the compiled
/// default is the 20-years-from-filing rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TermConfig {
    /// Statutory term in years when no jurisdiction override applies.
    pub default_years: Option<u32>,
    /// Per-jurisdiction overrides, keyed by two-letter code.
    pub years_by_jurisdiction: HashMap<String, u32>,
    /// Whether recorded term extensions are added to the statutory term.
    pub honor_extensions: Option<bool>,
}

impl TermConfig {
    /// Effective default statutory term, 20 years.
    pub fn effective_default_years(&self) -> u32 {
        self.default_years.unwrap_or(20)
    }

    /// Statutory term for a jurisdiction.
    pub fn years_for(&self, jurisdiction: &str) -> u32 {
        self.years_by_jurisdiction
            .get(jurisdiction)
            .copied()
            .unwrap_or_else(|| self.effective_default_years())
    }

    /// Whether term extensions apply. Default: true.
    pub fn effective_honor_extensions(&self) -> bool {
        self.honor_extensions.unwrap_or(true)
    }
}
