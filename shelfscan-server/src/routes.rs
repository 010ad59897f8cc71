//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use shelfscan_core::CorsOrigins;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

fn cors_layer(origins: Option<&CorsOrigins>) -> CorsLayer {
    let origins = match origins {
        Some(CorsOrigins::Any) => AllowOrigin::any(),
        Some(CorsOrigins::List(origins)) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|s| s.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ),
        // Default: allow localhost origins for development
        None => AllowOrigin::list(DEV_ORIGINS.map(HeaderValue::from_static)),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
///
/// `cors_origins` of `None` allows the local development origins.
pub fn create_router(state: AppState, cors_origins: Option<&CorsOrigins>) -> Router {
    let api_routes = Router::new()
        // Catalog endpoints
        .route("/catalog", get(handlers::list_books))
        .route("/catalog/isbn", post(handlers::add_by_isbn))
        .route("/catalog/title", post(handlers::add_by_title))
        .route("/catalog/export", get(handlers::export_catalog))
        .route("/catalog/import", post(handlers::import_catalog))
        .route("/catalog/:id", delete(handlers::delete_book))
        // Label sheet
        .route("/labels", post(handlers::print_labels))
        // SSE endpoint
        .route("/sync", get(handlers::sync_events));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}
