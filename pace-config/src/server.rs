//! HTTP server settings.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::{ConfigError, ConfigResult};

/// Environment variable holding the listening port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable naming the deployment environment.
pub const ENVIRONMENT_ENV: &str = "PACE_ENV";
/// Environment variable pointing at a directory of static assets.
pub const STATIC_DIR_ENV: &str = "PACE_STATIC_DIR";

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 3000;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Settings for the HTTP API process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    environment: String,
    static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when the port is not a valid `u16`.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(PORT_ENV) {
            config.port = raw
                .trim()
                .parse::<u16>()
                .map_err(|err| ConfigError::InvalidPort {
                    value: raw.clone(),
                    reason: err.to_string(),
                })?;
        }
        if let Some(environment) = lookup(ENVIRONMENT_ENV) {
            config.environment = environment;
        }
        config.static_dir = lookup(STATIC_DIR_ENV).map(PathBuf::from);

        Ok(config)
    }

    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when `PORT` is not a valid `u16`.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(crate::env_lookup)
    }

    /// Overrides the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the listening port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the static asset directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Returns the listening port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the deployment environment label.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Returns the static asset directory, if configured.
    #[must_use]
    pub fn static_dir(&self) -> Option<&PathBuf> {
        self.static_dir.as_ref()
    }

    /// Resolves the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] when `host:port` does not parse.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidAddress {
                value: raw.clone(),
                reason: err.to_string(),
            })
    }
}
