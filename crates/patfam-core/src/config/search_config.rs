//! Search request configuration.

use serde::{Deserialize, Serialize};

/// Jurisdictions the engine recognizes as target countries.
pub const COUNTRY_CODES: [(&str, &str); 16] = [
    ("BR", "Brazil"),
    ("US", "United States"),
    ("EP", "European Patent"),
    ("CN", "China"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("IN", "India"),
    ("MX", "Mexico"),
    ("AR", "Argentina"),
    ("CL", "Chile"),
    ("CO", "Colombia"),
    ("PE", "Peru"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("RU", "Russia"),
    ("ZA", "South Africa"),
];

/// Country name for a recognized code.
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Validation rules for incoming search requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Country codes accepted as targets; unknown codes are filtered out.
    pub allowed_countries: Vec<String>,
    /// Fallback targets when the caller supplies none that survive
    /// filtering.
    pub default_countries: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            allowed_countries: COUNTRY_CODES.iter().map(|(c, _)| c.to_string()).collect(),
            default_countries: vec!["BR".to_string()],
        }
    }
}

impl SearchConfig {
    /// Normalize caller-supplied targets: uppercase, filter unknown codes,
    /// fall back to the configured defaults when nothing survives.
    pub fn resolve_targets(&self, requested: &[String]) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();
        for code in requested {
            let code = code.trim().to_ascii_uppercase();
            if self.allowed_countries.iter().any(|a| *a == code)
                && !targets.contains(&code)
            {
                targets.push(code);
            }
        }
        if targets.is_empty() {
            self.default_countries.clone()
        } else {
            targets
        }
    }
}
