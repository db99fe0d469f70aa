//! Configuration management for the PACE server and completion gateway.
//!
//! Every loader accepts a lookup closure so callers (and tests) can supply
//! values without touching the process environment. The `from_env`
//! constructors are thin wrappers over [`std::env::var`].

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod provider;
mod server;

pub use error::{ConfigError, ConfigResult};
pub use provider::{
    AI_TEMPERATURE_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE, EnvSettings,
    MAX_OUTPUT_TOKENS, OPENAI_API_KEY_ENV, OPENAI_BASE_URL_ENV, OPENAI_MODEL_ENV,
    ProviderSettings, SettingsSource,
};
pub use server::{DEFAULT_PORT, ENVIRONMENT_ENV, PORT_ENV, STATIC_DIR_ENV, ServerConfig};

/// Reads a variable from the process environment, treating blank values as unset.
pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
