//! Tests for layered configuration resolution.

use std::sync::Mutex;

use patfam_core::config::{ConfigOverrides, EngineConfig};
use patfam_core::errors::ConfigError;
use patfam_core::types::Source;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_patfam_env_vars() {
    for key in [
        "PATFAM_TERM_DEFAULT_YEARS",
        "PATFAM_HONOR_EXTENSIONS",
        "PATFAM_DEFAULT_COUNTRIES",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn load_without_files_yields_compiled_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_patfam_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    let config = EngineConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.precedence.rank(Source::Epo), 0);
    assert_eq!(config.terms.effective_default_years(), 20);
    assert!(config.terms.effective_honor_extensions());
    assert_eq!(config.search.default_countries, vec!["BR".to_string()]);
}

#[test]
fn project_file_overrides_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_patfam_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("patfam.toml"),
        r#"
[terms]
default_years = 15

[search]
default_countries = ["US"]
"#,
    )
    .unwrap();

    let config = EngineConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.terms.effective_default_years(), 15);
    assert_eq!(config.search.default_countries, vec!["US".to_string()]);
}

#[test]
fn env_overrides_project_file_and_caller_overrides_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_patfam_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("patfam.toml"),
        r#"
[terms]
default_years = 15
"#,
    )
    .unwrap();
    std::env::set_var("PATFAM_TERM_DEFAULT_YEARS", "18");

    let config = EngineConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.terms.effective_default_years(), 18);

    let overrides = ConfigOverrides {
        term_default_years: Some(25),
        ..Default::default()
    };
    let config = EngineConfig::load(dir.path(), Some(&overrides)).unwrap();
    assert_eq!(config.terms.effective_default_years(), 25);

    clear_patfam_env_vars();
}

#[test]
fn invalid_project_file_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_patfam_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("patfam.toml"), "not = [valid").unwrap();

    let err = EngineConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn env_country_list_is_parsed() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_patfam_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    std::env::set_var("PATFAM_DEFAULT_COUNTRIES", "us, jp");

    let config = EngineConfig::load(dir.path(), None).unwrap();
    assert_eq!(
        config.search.default_countries,
        vec!["US".to_string(), "JP".to_string()]
    );

    clear_patfam_env_vars();
}
