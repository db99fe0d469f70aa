//! Contract between the completion gateway and a provider.
//!
//! A provider receives one rendered prompt plus sampling knobs and answers
//! with a stream of text fragments. The gateway joins the fragments in order;
//! the stream ending marks the end of the completion.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

/// Result alias for provider calls.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Completion text fragments, in order.
pub type AdapterStream = Pin<Box<dyn Stream<Item = AdapterResult<String>> + Send>>;

/// How a provider call failed.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Credential or endpoint settings are missing or unusable.
    #[error("{reason}")]
    Configuration {
        /// What is missing or wrong.
        reason: String,
    },

    /// The prompt was rejected before anything was sent.
    #[error("{reason}")]
    InvalidRequest {
        /// Why the prompt cannot be sent.
        reason: String,
    },

    /// The provider could not be reached or the exchange broke off.
    #[error("{reason}")]
    Transport {
        /// Connection or timeout message.
        reason: String,
    },

    /// The provider answered with an error status or an unusable body.
    #[error("{reason}")]
    Response {
        /// Provider message or decode failure.
        reason: String,
    },
}

impl AdapterError {
    /// Builds an [`AdapterError::Configuration`].
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Builds an [`AdapterError::InvalidRequest`].
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Builds an [`AdapterError::Transport`].
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Builds an [`AdapterError::Response`].
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

/// Provider name and model, used for logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterMetadata {
    provider: &'static str,
    model: String,
}

impl AdapterMetadata {
    /// Describes `model` served by `provider`.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Short provider name, e.g. `openai`.
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Model identifier sent to the provider.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// A rendered prompt ready to send, with its sampling settings.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceRequest {
    prompt: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl InferenceRequest {
    /// Wraps a rendered prompt.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] when the prompt is blank.
    pub fn from_prompt(prompt: impl Into<String>) -> AdapterResult<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(AdapterError::invalid_request("Prompt is required"));
        }
        Ok(Self {
            prompt,
            temperature: None,
            max_output_tokens: None,
        })
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Caps the completion length.
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// The prompt text, exactly as rendered.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Sampling temperature, if set.
    #[must_use]
    pub const fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Completion length cap, if set.
    #[must_use]
    pub const fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }
}

/// A completion provider.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Provider and model in use.
    fn metadata(&self) -> &AdapterMetadata;

    /// Sends one prompt; each call is a single provider attempt.
    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream>;
}
