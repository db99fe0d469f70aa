//! Client side of the template and completion API.

use std::fmt;

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::{Method, Uri};
use pace_adapters::http_client::{
    BufferedResponse, HyperClient, build_https_client, json_request, send_buffered,
};
use pace_adapters::traits::AdapterError;
use pace_prompts::wire::{CompletionRequest, CompletionResponse, ErrorResponse, TemplateDraft};
use pace_prompts::{Template, TemplateId};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Result alias for API calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures observed by the editor when talking to the server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached or the exchange was cut short.
    #[error("network error: {reason}")]
    Network {
        /// Transport failure message.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, with upstream detail appended when present.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {reason}")]
    Decode {
        /// Parser error message.
        reason: String,
    },
}

impl From<AdapterError> for ClientError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Transport { reason }
            | AdapterError::Configuration { reason }
            | AdapterError::InvalidRequest { reason }
            | AdapterError::Response { reason } => Self::Network { reason },
        }
    }
}

/// Operations the editor needs from the server.
#[async_trait]
pub trait PaceApi: Send + Sync {
    /// Fetches every template.
    async fn list_templates(&self) -> ClientResult<Vec<Template>>;

    /// Creates a template.
    async fn create_template(&self, draft: &TemplateDraft) -> ClientResult<Template>;

    /// Deletes a template.
    async fn delete_template(&self, id: TemplateId) -> ClientResult<()>;

    /// Requests a completion for a rendered prompt.
    async fn complete(&self, prompt: &str) -> ClientResult<String>;
}

/// [`PaceApi`] over HTTP(S).
pub struct HttpPaceClient {
    client: HyperClient,
    base_url: String,
}

impl fmt::Debug for HttpPaceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPaceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpPaceClient {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] when the URL lacks an http(s) scheme.
    pub fn new(base_url: impl AsRef<str>) -> ClientResult<Self> {
        let mut base_url = base_url.as_ref().trim().to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Network {
                reason: format!("server URL `{base_url}` must start with http:// or https://"),
            });
        }
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client: build_https_client(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Uri> {
        format!("{}{path}", self.base_url)
            .parse::<Uri>()
            .map_err(|err| ClientError::Network {
                reason: format!("invalid endpoint `{path}`: {err}"),
            })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<Vec<u8>>,
    ) -> ClientResult<Bytes> {
        let uri = self.endpoint(path)?;
        debug!(%method, %uri, "calling PACE API");
        let request = json_request(method, uri, None, payload)?;
        let response = send_buffered(&self.client, request, None).await?;
        ensure_success(response)
    }
}

#[async_trait]
impl PaceApi for HttpPaceClient {
    async fn list_templates(&self) -> ClientResult<Vec<Template>> {
        let body = self.send(Method::GET, "api/templates", None).await?;
        decode(&body)
    }

    async fn create_template(&self, draft: &TemplateDraft) -> ClientResult<Template> {
        let payload = encode(draft)?;
        let body = self
            .send(Method::POST, "api/templates", Some(payload))
            .await?;
        decode(&body)
    }

    async fn delete_template(&self, id: TemplateId) -> ClientResult<()> {
        self.send(Method::DELETE, &format!("api/templates/{id}"), None)
            .await
            .map(|_| ())
    }

    async fn complete(&self, prompt: &str) -> ClientResult<String> {
        let payload = encode(&CompletionRequest {
            prompt: prompt.to_owned(),
        })?;
        let body = self.send(Method::POST, "api/complete", Some(payload)).await?;
        decode::<CompletionResponse>(&body).map(|response| response.completion)
    }
}

fn ensure_success(response: BufferedResponse) -> ClientResult<Bytes> {
    if response.status.is_success() {
        return Ok(response.body);
    }

    let message = match serde_json::from_slice::<ErrorResponse>(&response.body) {
        Ok(ErrorResponse {
            error,
            details: Some(details),
        }) => format!("{error} ({details})"),
        Ok(ErrorResponse { error, .. }) => error,
        Err(_) => format!("request failed with status {}", response.status),
    };

    Err(ClientError::Status {
        status: response.status.as_u16(),
        message,
    })
}

fn encode<T: serde::Serialize>(value: &T) -> ClientResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| ClientError::Decode {
        reason: err.to_string(),
    })
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
    serde_json::from_slice(body).map_err(|err| ClientError::Decode {
        reason: err.to_string(),
    })
}
