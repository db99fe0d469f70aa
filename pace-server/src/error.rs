//! API error type and its HTTP rendering.

use std::any::Any;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pace_adapters::GatewayError;
use pace_prompts::TemplateError;
use pace_prompts::wire::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

/// Message returned for any failure the API does not classify.
pub const GENERIC_FAILURE: &str = "Something went wrong!";
/// Message returned when the completion gateway fails.
pub const COMPLETION_FAILURE: &str = "Failed to process AI completion";
/// Message returned for unknown template ids.
pub const TEMPLATE_NOT_FOUND: &str = "Template not found";

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input had the wrong shape or content.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The completion gateway failed.
    #[error("completion failed: {0}")]
    Completion(#[from] GatewayError),

    /// Anything else. The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::Validation { reason } => Self::BadRequest(reason),
            TemplateError::NotFound { .. } | TemplateError::InvalidId { .. } => {
                Self::NotFound(TEMPLATE_NOT_FOUND.to_owned())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(message) => {
                warn!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            Self::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::new(message)),
            Self::Completion(GatewayError::InvalidRequest { reason }) => {
                warn!(%reason, "rejected completion request");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(reason))
            }
            Self::Completion(err) => {
                error!(error = %err, kind = gateway_kind(&err), "AI completion error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(COMPLETION_FAILURE).with_details(err.to_string()),
                )
            }
            Self::Internal(message) => {
                error!(%message, "unhandled server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(GENERIC_FAILURE),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn gateway_kind(err: &GatewayError) -> &'static str {
    match err {
        GatewayError::Configuration { .. } => "configuration",
        GatewayError::InvalidRequest { .. } => "invalid_request",
        GatewayError::Upstream { .. } => "upstream",
    }
}

/// Converts a handler panic into the generic 500 response.
pub(crate) fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else {
        "non-string panic payload".to_owned()
    };

    ApiError::Internal(format!("handler panicked: {message}")).into_response()
}

#[cfg(test)]
mod tests {
    use pace_prompts::TemplateId;

    use super::*;

    #[test]
    fn template_errors_map_to_client_statuses() {
        let response = ApiError::from(TemplateError::validation("template name is required"))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(TemplateError::NotFound {
            id: TemplateId::new(9),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn gateway_errors_map_to_server_error() {
        let err = GatewayError::Configuration {
            reason: "OpenAI API key not configured".into(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn locally_rejected_prompts_are_bad_requests() {
        let err = GatewayError::InvalidRequest {
            reason: "Prompt is required".into(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn panic_payload_is_not_echoed() {
        let response = handle_panic(Box::new("secret stack detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
