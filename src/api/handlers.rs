use axum::{
    Json,
    extract::{Request, State, rejection::JsonRejection},
    http::Method,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::SearchError;
use crate::search;

use super::AppState;
use super::models::{SearchRequest, SearchResponse};

/// Entry document of a mounted frontend bundle.
pub struct SpaBundle {
    pub index_file: PathBuf,
}

pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, SearchError> {
    let start = Instant::now();
    let Json(request) = payload.map_err(|e| SearchError::Validation(e.body_text()))?;

    log::info!("search request for site: {}", request.site.trim());

    match search::search(state.provider.as_ref(), request).await {
        Ok(response) => {
            log::info!(
                "search answered in {}ms with {} citations",
                start.elapsed().as_millis(),
                response.citations.as_ref().map_or(0, Vec::len)
            );
            Ok(Json(response))
        }
        Err(e) => {
            log::error!("search failed, error: {:#}", e);
            Err(e)
        }
    }
}

/// Serves the bundle's `index.html` for client-side routes.
/// Paths under `api/` are never captured and answer 404.
pub async fn spa_fallback(bundle: Arc<SpaBundle>, request: Request) -> Response {
    let is_read = matches!(*request.method(), Method::GET | Method::HEAD);
    if !is_read || request.uri().path().trim_start_matches('/').starts_with("api/") {
        return SearchError::NotFound.into_response();
    }

    match ServeFile::new(&bundle.index_file).oneshot(request).await {
        Ok(response) => response.map(axum::body::Body::new),
        Err(never) => match never {},
    }
}

pub async fn not_found() -> SearchError {
    SearchError::NotFound
}

pub async fn method_not_allowed() -> SearchError {
    SearchError::MethodNotAllowed
}
