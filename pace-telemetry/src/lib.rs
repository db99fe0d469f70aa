//! Observability utilities for PACE services.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support {
    //! Structured tracing helpers.

    use thiserror::Error;
    use tracing_subscriber::EnvFilter;

    /// Default directives used when `RUST_LOG` is unset.
    pub const DEFAULT_DIRECTIVES: &str = "pace_server=info,tower_http=debug";

    /// Errors raised while installing the global subscriber.
    #[derive(Debug, Error)]
    pub enum TelemetryError {
        /// A global subscriber was already installed or the filter was rejected.
        #[error("failed to install tracing subscriber: {reason}")]
        Install {
            /// Underlying failure message.
            reason: String,
        },
    }

    /// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to
    /// `default_directives`.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Install`] when a global subscriber is already set.
    pub fn init(default_directives: &str) -> Result<(), TelemetryError> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .map_err(|err| TelemetryError::Install {
                reason: err.to_string(),
            })?;

        tracing::debug!(default_directives, "tracing subscriber installed");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn second_install_is_rejected() {
            init(DEFAULT_DIRECTIVES).expect("first install");
            let err = init(DEFAULT_DIRECTIVES).expect_err("global subscriber already set");
            assert!(matches!(err, TelemetryError::Install { .. }));
        }
    }
}

pub use tracing_support::{DEFAULT_DIRECTIVES, TelemetryError, init};
