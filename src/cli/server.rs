//! HTTP server exposing the randomized gallery listing

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::pagination::{PageFetcher, PageRequest};
use crate::store::{GenerationStore, Visibility};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Which generations the gallery lists
    pub visibility: Visibility,
    /// Allow cross-origin requests
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            visibility: Visibility::default(),
            cors: true,
        }
    }
}

/// App state shared across handlers
struct AppState<S> {
    fetcher: PageFetcher<S>,
    visibility: Visibility,
}

/// Query string for the gallery listing
#[derive(Debug, Deserialize)]
struct GalleryQuery {
    #[serde(default)]
    page: Option<String>,
}

/// Error envelope
#[derive(Debug, Serialize)]
struct ApiError {
    success: bool,
    error: String,
}

impl ApiError {
    fn response(status: StatusCode, msg: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                success: false,
                error: msg.into(),
            }),
        )
            .into_response()
    }
}

/// Build the router for a store
pub fn router<S>(fetcher: PageFetcher<S>, config: &ServerConfig) -> Router
where
    S: GenerationStore<Filter = Visibility>,
    S::Record: Serialize,
{
    let state = AppState {
        fetcher,
        visibility: config.visibility,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/gallery", get(list_gallery::<S>))
        .route("/gallery/:id", get(get_generation::<S>));

    let app = if config.cors {
        // public read-only listing, any origin
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server on `0.0.0.0:<port>`
pub async fn serve<S>(fetcher: PageFetcher<S>, config: ServerConfig) -> Result<()>
where
    S: GenerationStore<Filter = Visibility>,
    S::Record: Serialize,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(format!("Failed to bind to port {}: {e}", config.port)))?;

    tracing::info!(
        page_size = fetcher.page_size(),
        visibility = %config.visibility,
        "Starting HTTP server on http://{}",
        addr
    );
    serve_listener(listener, router(fetcher, &config)).await
}

/// Serve a router on an already bound listener
pub async fn serve_listener(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app)
        .await
        .map_err(|e| Error::server(format!("Server error: {e}")))
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// One randomized gallery page
async fn list_gallery<S>(
    State(state): State<Arc<AppState<S>>>,
    query: Option<Query<GalleryQuery>>,
) -> Response
where
    S: GenerationStore<Filter = Visibility>,
    S::Record: Serialize,
{
    let started = Instant::now();
    let raw = query.as_ref().and_then(|Query(q)| q.page.as_deref());
    let request = PageRequest::from_query(raw);
    tracing::info!(page = request.page, "Request for gallery page");

    match state.fetcher.fetch(request, &state.visibility).await {
        Ok(response) => {
            tracing::info!(
                page = response.page,
                count = response.len(),
                next = ?response.next,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Responded to gallery page request"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!(
                page = request.page,
                error = %e,
                "Failed to get generations for gallery page"
            );
            ApiError::response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get generations",
            )
        }
    }
}

/// A single generation by id
async fn get_generation<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: GenerationStore<Filter = Visibility>,
    S::Record: Serialize,
{
    match state.fetcher.store().get(&id).await {
        Ok(Some(generation)) => (StatusCode::OK, Json(generation)).into_response(),
        Ok(None) => ApiError::response(
            StatusCode::NOT_FOUND,
            format!("Generation not found: {id}"),
        ),
        Err(e) => {
            tracing::error!(id = %id, error = %e, "Failed to get generation");
            ApiError::response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get generation")
        }
    }
}
