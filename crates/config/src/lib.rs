//! # fieldcheck-config
//!
//! Rule files and environment handling that turn declarative configuration
//! into a ready-to-use [`fieldcheck_registry::ValidatorRegistry`].
//! This crate depends on `registry` and `shared` only.

/// Environment variable parsing.
pub mod env;
/// Rule file loading helpers (env + file + flag).
pub mod load;
/// Rule file schema types and validation.
pub mod rules;

pub use env::{
    ENV_LOG_FILTER, ENV_LOG_FORMAT, ENV_RULES_PATH, EnvParseError, LogFormat, RulesEnv,
};
pub use load::{
    load_registry, load_rules, load_rules_from_path, parse_rules_json, parse_rules_toml,
    resolve_rules_path, to_pretty_json, to_pretty_toml,
};
pub use rules::{CURRENT_RULES_VERSION, RulesConfig, RulesConfigError};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
