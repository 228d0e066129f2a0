use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog & interaction log
        .route("/products", get(handlers::get_products))
        .route("/viewers", get(handlers::get_viewers))
        .route("/snapshot/reload", post(handlers::reload_snapshot))
        // Active viewer profile
        .route(
            "/profile",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .route("/profile/events", post(handlers::enqueue_profile_event))
        // Recommendations
        .route("/recommendations", get(handlers::get_recommendations))
        .route("/recommendations/neighbors", get(handlers::get_neighbors))
        .route("/recommend", post(handlers::recommend))
}
