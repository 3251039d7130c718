//! Engine configuration: source precedence, term rules, search validation.

pub mod engine_config;
pub mod precedence_config;
pub mod search_config;
pub mod term_config;

pub use engine_config::{ConfigOverrides, EngineConfig};
pub use precedence_config::PrecedenceConfig;
pub use search_config::{country_name, SearchConfig, COUNTRY_CODES};
pub use term_config::TermConfig;
