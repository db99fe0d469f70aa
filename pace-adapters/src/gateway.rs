//! Completion gateway: rendered prompt in, completion text out.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use pace_config::{EnvSettings, ProviderSettings, SettingsSource};
use thiserror::Error;
use tracing::{debug, info};

use crate::http_client::{HyperClient, build_https_client};
use crate::openai::{OpenAiAdapter, OpenAiConfig};
use crate::traits::{AdapterError, InferenceRequest, ModelAdapter};

/// Result alias for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Classified completion failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No provider credential is configured.
    #[error("{reason}")]
    Configuration {
        /// Description of the missing or invalid setting.
        reason: String,
    },

    /// The prompt was rejected locally; the provider was not called.
    #[error("{reason}")]
    InvalidRequest {
        /// Why the prompt cannot be sent.
        reason: String,
    },

    /// The provider call failed or returned an error.
    #[error("{reason}")]
    Upstream {
        /// Provider or transport message.
        reason: String,
    },
}

impl From<AdapterError> for GatewayError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Configuration { reason } => Self::Configuration { reason },
            AdapterError::InvalidRequest { reason } => Self::InvalidRequest { reason },
            AdapterError::Transport { reason } | AdapterError::Response { reason } => {
                Self::Upstream { reason }
            }
        }
    }
}

/// Anything able to turn a rendered prompt into completion text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Requests a single completion for `prompt`.
    ///
    /// A blank prompt fails with [`GatewayError::InvalidRequest`] before any
    /// provider is contacted.
    async fn complete(&self, prompt: &str) -> GatewayResult<String>;
}

/// Gateway that forwards prompts to the configured OpenAI-compatible provider.
///
/// Settings are re-read from the [`SettingsSource`] on every call, and each
/// call makes exactly one provider attempt. The HTTP client is built once
/// and shared by every call.
#[derive(Clone)]
pub struct CompletionGateway {
    settings: Arc<dyn SettingsSource>,
    client: HyperClient,
}

impl fmt::Debug for CompletionGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionGateway").finish_non_exhaustive()
    }
}

impl CompletionGateway {
    /// Creates a gateway reading settings from `source`.
    #[must_use]
    pub fn new(source: impl SettingsSource + 'static) -> Self {
        Self {
            settings: Arc::new(source),
            client: build_https_client(),
        }
    }

    /// Creates a gateway reading settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(EnvSettings)
    }
}

#[async_trait]
impl CompletionService for CompletionGateway {
    async fn complete(&self, prompt: &str) -> GatewayResult<String> {
        let request = InferenceRequest::from_prompt(prompt)?;
        let settings = self.settings.provider_settings();
        let adapter = OpenAiAdapter::with_client(
            OpenAiConfig::from_settings(&settings)?,
            self.client.clone(),
        )?;

        info!(
            provider = adapter.metadata().provider(),
            model = adapter.metadata().model(),
            prompt_chars = prompt.chars().count(),
            "requesting completion"
        );
        send(&adapter, &settings, request).await
    }
}

/// Runs one completion against `adapter`, concatenating the streamed text.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a blank prompt, without
/// calling the adapter, and [`GatewayError::Upstream`] when the adapter fails.
pub async fn complete_with(
    adapter: &dyn ModelAdapter,
    settings: &ProviderSettings,
    prompt: &str,
) -> GatewayResult<String> {
    send(adapter, settings, InferenceRequest::from_prompt(prompt)?).await
}

async fn send(
    adapter: &dyn ModelAdapter,
    settings: &ProviderSettings,
    request: InferenceRequest,
) -> GatewayResult<String> {
    let request = request
        .with_temperature(settings.temperature())
        .with_max_output_tokens(settings.max_output_tokens());

    let mut stream = adapter.infer(request).await?;
    let mut completion = String::new();
    while let Some(fragment) = stream.next().await {
        completion.push_str(&fragment?);
    }

    debug!(
        model = adapter.metadata().model(),
        completion_chars = completion.chars().count(),
        "completion received"
    );
    Ok(completion)
}
