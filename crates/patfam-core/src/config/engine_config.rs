//! Top-level engine configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PrecedenceConfig, SearchConfig, TermConfig};
use crate::errors::ConfigError;
use crate::types::Source;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Caller overrides (applied via `apply_overrides`)
/// 2. Environment variables (`PATFAM_*`)
/// 3. Project config (`patfam.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub precedence: PrecedenceConfig,
    pub terms: TermConfig,
    pub search: SearchConfig,
}

/// Caller-supplied overrides that beat every file/env layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub precedence_order: Option<Vec<Source>>,
    pub term_default_years: Option<u32>,
    pub honor_extensions: Option<bool>,
}

impl EngineConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_path = root.join("patfam.toml");
        if project_path.exists() {
            let content = std::fs::read_to_string(&project_path).map_err(|_| {
                ConfigError::FileNotFound {
                    path: project_path.display().to_string(),
                }
            })?;
            let file_config: EngineConfig =
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: project_path.display().to_string(),
                    message: e.to_string(),
                })?;
            config = file_config;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(ov) = overrides {
            Self::apply_overrides(&mut config, ov);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
                path: "<string>".to_string(),
                message: e.to_string(),
            })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the resolved configuration.
    pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
        if config.precedence.order.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "precedence.order".to_string(),
                message: "must list at least one source".to_string(),
            });
        }
        let mut seen = Vec::new();
        for source in &config.precedence.order {
            if seen.contains(&source) {
                return Err(ConfigError::ValidationFailed {
                    field: "precedence.order".to_string(),
                    message: format!("duplicate source {source}"),
                });
            }
            seen.push(source);
        }
        let years = config.terms.effective_default_years();
        if !(1..=50).contains(&years) {
            return Err(ConfigError::ValidationFailed {
                field: "terms.default_years".to_string(),
                message: "must be between 1 and 50".to_string(),
            });
        }
        for (jurisdiction, years) in &config.terms.years_by_jurisdiction {
            if !(1..=50).contains(years) {
                return Err(ConfigError::ValidationFailed {
                    field: format!("terms.years_by_jurisdiction.{jurisdiction}"),
                    message: "must be between 1 and 50".to_string(),
                });
            }
        }
        if config.search.default_countries.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "search.default_countries".to_string(),
                message: "must list at least one country".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `PATFAM_TERM_DEFAULT_YEARS`, `PATFAM_HONOR_EXTENSIONS`.
    fn apply_env_overrides(config: &mut EngineConfig) {
        if let Ok(val) = std::env::var("PATFAM_TERM_DEFAULT_YEARS") {
            if let Ok(v) = val.parse::<u32>() {
                config.terms.default_years = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PATFAM_HONOR_EXTENSIONS") {
            if let Ok(v) = val.parse::<bool>() {
                config.terms.honor_extensions = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PATFAM_DEFAULT_COUNTRIES") {
            let countries: Vec<String> = val
                .split(',')
                .map(|c| c.trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .collect();
            if !countries.is_empty() {
                config.search.default_countries = countries;
            }
        }
    }

    /// Apply caller overrides (highest priority).
    fn apply_overrides(config: &mut EngineConfig, ov: &ConfigOverrides) {
        if let Some(ref order) = ov.precedence_order {
            config.precedence.order = order.clone();
        }
        if let Some(years) = ov.term_default_years {
            config.terms.default_years = Some(years);
        }
        if let Some(honor) = ov.honor_extensions {
            config.terms.honor_extensions = Some(honor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_toml_parses_sub_configs() {
        let config = EngineConfig::from_toml(
            r#"
[precedence]
order = ["INPI", "EPO", "Google Patents"]

[terms]
default_years = 20
honor_extensions = false

[terms.years_by_jurisdiction]
US = 17

[search]
default_countries = ["BR", "US"]
"#,
        )
        .unwrap();

        assert_eq!(config.precedence.rank(Source::Inpi), 0);
        assert_eq!(config.terms.years_for("US"), 17);
        assert!(!config.terms.effective_honor_extensions());
        assert_eq!(config.search.default_countries, vec!["BR", "US"]);
    }

    #[test]
    fn rejects_duplicate_precedence() {
        let err = EngineConfig::from_toml(
            r#"
[precedence]
order = ["EPO", "EPO"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    }

    #[test]
    fn rejects_out_of_range_term() {
        let err = EngineConfig::from_toml(
            r#"
[terms]
default_years = 99
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    }

    #[test]
    fn overrides_beat_defaults() {
        let mut config = EngineConfig::default();
        let ov = ConfigOverrides {
            precedence_order: Some(vec![Source::GooglePatents, Source::Epo, Source::Inpi]),
            term_default_years: Some(21),
            honor_extensions: Some(false),
        };
        EngineConfig::apply_overrides(&mut config, &ov);
        assert_eq!(config.precedence.rank(Source::GooglePatents), 0);
        assert_eq!(config.terms.effective_default_years(), 21);
        assert!(!config.terms.effective_honor_extensions());
    }
}
