//! API Routes
//!
//! Configures the Axum router with all property endpoints.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_metrics, create_property, delete_property, get_property, health_handler,
    list_properties, replace_property, update_property, AppState,
};
use crate::cache::cache_page;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /properties/` - List properties (response cached)
/// - `POST /properties/` - Create a property
/// - `GET /properties/metrics/` - Cache efficiency metrics
/// - `GET|PUT|PATCH|DELETE /properties/:id/` - Single property operations
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Response cache: wraps the collection route only
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let response_cache = middleware::from_fn_with_state(state.response_cache(), cache_page);

    Router::new()
        .route(
            "/properties/",
            get(list_properties)
                .post(create_property)
                .layer(response_cache),
        )
        .route("/properties/metrics/", get(cache_metrics))
        .route(
            "/properties/:id/",
            get(get_property)
                .put(replace_property)
                .patch(update_property)
                .delete(delete_property),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
