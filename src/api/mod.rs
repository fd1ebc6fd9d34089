use axum::{
    Router,
    extract::Request,
    handler::HandlerWithoutStateExt,
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::openai::AnswerProvider;

pub mod docs;
pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn AnswerProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn AnswerProvider>) -> Self {
        Self { provider }
    }
}

/// Builds the application router. The frontend bundle is only mounted when
/// `frontend_dir` exists at the time this is called.
pub fn create_router(state: AppState, frontend_dir: Option<&Path>) -> Router {
    // CORS configuration: any origin, echoed back so credentials are allowed
    let cors = CorsLayer::very_permissive();

    let router = Router::new()
        // API routes
        .route(
            "/api/search",
            post(handlers::search_handler).fallback(handlers::method_not_allowed),
        )
        .route("/openapi.json", get(docs::openapi_handler))
        .route("/docs", get(docs::docs_handler))
        .with_state(state);

    let router = if let Some(dir) = frontend_dir.filter(|dir| dir.is_dir()) {
        log::info!("serving frontend bundle from {}", dir.display());
        let bundle = Arc::new(handlers::SpaBundle {
            index_file: dir.join("index.html"),
        });

        router
            // Built assets live under /static so they never shadow /api
            .nest_service(
                "/static",
                ServeDir::new(dir)
                    .append_index_html_on_directories(false)
                    .not_found_service(handlers::not_found.into_service()),
            )
            .fallback(move |request: Request| handlers::spa_fallback(bundle.clone(), request))
    } else {
        log::info!("no frontend bundle found, serving API only");
        router.fallback(handlers::not_found)
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}
