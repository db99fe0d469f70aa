//! Configuration error types.

use thiserror::Error;

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while interpreting configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The listening port could not be parsed.
    #[error("invalid port `{value}`: {reason}")]
    InvalidPort {
        /// Raw value supplied by the environment.
        value: String,
        /// Parser error message.
        reason: String,
    },

    /// The bind address could not be parsed.
    #[error("invalid bind address `{value}`: {reason}")]
    InvalidAddress {
        /// Raw `host:port` string.
        value: String,
        /// Parser error message.
        reason: String,
    },
}
