//! `CityFix` API server library
//!
//! Serves the view models, complaint endpoints, submission flow and demo
//! simulation over HTTP.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::unused_async
)]

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::Router;
use cityfix_core::Config;
use cityfix_core::context_error::Result;
use std::sync::Arc;

/// Build the API router with all routes and middleware
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn build_router(config: Config) -> Result<Router> {
    let state = Arc::new(AppState::new(config)?);
    state.validate()?;
    Ok(router_with_state(state))
}

/// Build the API router around existing state
pub fn router_with_state(state: Arc<AppState>) -> Router {
    routes::build_router(&state.config.api).with_state(state)
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_router_answers_health_and_unknown_routes() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let router = build_router(Config::default()).unwrap();

        let response = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_build_router_rejects_invalid_config() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(build_router(config).is_err());
    }
}
