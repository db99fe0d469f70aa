//! HTTP API for prompt templates and completions.
//!
//! The router exposes the [`TemplateStore`] and a [`CompletionService`] under
//! `/api`, wraps every route in request tracing, permissive CORS, and a panic
//! guard, and optionally serves the editor's static assets for every other
//! path.

#![warn(missing_docs, clippy::pedantic)]

mod api_complete;
mod api_templates;
pub mod error;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use pace_adapters::CompletionService;
use pace_prompts::TemplateStore;
use pace_prompts::wire::ErrorResponse;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Shared handler state, constructed once at process start.
#[derive(Clone)]
pub struct AppState {
    templates: Arc<TemplateStore>,
    completions: Arc<dyn CompletionService>,
}

impl AppState {
    /// Wires the template store and completion service together.
    #[must_use]
    pub fn new(templates: Arc<TemplateStore>, completions: Arc<dyn CompletionService>) -> Self {
        Self {
            templates,
            completions,
        }
    }

    /// Returns the template store.
    #[must_use]
    pub fn templates(&self) -> &Arc<TemplateStore> {
        &self.templates
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("templates", &self.templates.len())
            .finish_non_exhaustive()
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/templates",
            get(api_templates::list_templates).post(api_templates::create_template),
        )
        .route("/templates/:id", delete(api_templates::delete_template))
        .route("/complete", post(api_complete::complete))
}

/// Builds the application router.
///
/// When `static_dir` is set, unmatched paths are served from it (including
/// `index.html` at `/`); otherwise they receive a JSON 404.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new().nest("/api", api_routes());
    with_middleware(router, static_dir).with_state(state)
}

fn with_middleware(router: Router<AppState>, static_dir: Option<&Path>) -> Router<AppState> {
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(not_found),
    };

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(CatchPanicLayer::custom(error::handle_panic)),
    )
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}
