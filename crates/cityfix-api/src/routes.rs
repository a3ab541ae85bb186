//! API route definitions and middleware

use crate::{handlers, state::AppState};
use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, post},
};
use cityfix_core::config::ApiConfig;
use cityfix_core::types::ErrorResponse;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Build API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // View models
        .route("/api/views/:view", get(handlers::views::get_view))
        .route("/api/map", get(handlers::views::get_map))
        // Complaints and the submission flow
        .route(
            "/api/complaints",
            get(handlers::complaints::list_complaints).post(handlers::complaints::submit_complaint),
        )
        .route(
            "/api/complaints/reset",
            post(handlers::complaints::reset_submission),
        )
        .route(
            "/api/complaints/:id",
            get(handlers::complaints::get_complaint),
        )
        .route(
            "/api/submission",
            get(handlers::complaints::get_submission),
        )
        // Dashboard demo simulation
        .route(
            "/api/simulations",
            post(handlers::simulations::start_simulation),
        )
        .route(
            "/api/simulations/:id",
            get(handlers::simulations::get_simulation)
                .delete(handlers::simulations::dismiss_simulation),
        )
        .route("/", get(root_endpoint))
        .layer(CompressionLayer::new())
}

/// Build health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
}

/// CORS layer from configuration, `None` when disabled
pub fn cors_layer(api: &ApiConfig) -> Option<CorsLayer> {
    if !api.enable_cors {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if api.cors_origins.iter().any(|origin| origin == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Combine all routes into a single router
pub fn build_router(api: &ApiConfig) -> Router<Arc<AppState>> {
    let router = Router::new()
        .merge(api_routes())
        .merge(health_routes())
        .fallback(not_found_handler);

    match cors_layer(api) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Handle 404 Not Found errors
async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "The requested endpoint does not exist",
            "ROUTE_NOT_FOUND",
        )),
    )
}

/// Root endpoint for basic connectivity
async fn root_endpoint() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "CityFix Agent API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "endpoints": {
            "views": "/api/views/:view",
            "complaints": "/api/complaints",
            "submission": "/api/submission",
            "map": "/api/map",
            "simulations": "/api/simulations",
            "health": "/health"
        }
    }))
}
