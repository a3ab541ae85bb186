//! Shared helpers for the API integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use cityfix_api::{AppState, router_with_state};
use cityfix_core::Config;
use cityfix_core::config::FallbackPolicy;
use cityfix_store::{ComplaintRepository, InMemoryComplaintStore};
use cityfix_triage::{ComplaintClassifier, KeywordClassifier};
use serde_json::Value;
use std::sync::{Arc, Once};
use tower::ServiceExt;

static INIT: Once = Once::new();

/// Initialize test logging once per test binary
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("cityfix=debug,tower_http=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Default configuration with delays short enough for real-time tests
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.triage.analysis_delay_ms = 10;
    config.triage.banner_ms = 60_000;
    config.simulation.step_delay_ms = 1;
    config
}

/// Seeded store and seeded classifier using `fallback`
pub fn test_state_with(fallback: FallbackPolicy) -> Arc<AppState> {
    init_test_logging();
    let mut config = test_config();
    config.triage.fallback = fallback;

    let store: Arc<dyn ComplaintRepository> = Arc::new(InMemoryComplaintStore::seeded());
    let classifier: Arc<dyn ComplaintClassifier> =
        Arc::new(KeywordClassifier::new(&config.triage).with_seed(42));
    Arc::new(AppState::with_components(config, store, classifier))
}

/// State for the default fallback policy
pub fn test_state() -> Arc<AppState> {
    test_state_with(FallbackPolicy::default())
}

/// Router around `state`
pub fn app(state: &Arc<AppState>) -> Router {
    router_with_state(Arc::clone(state))
}

/// Send a request and decode the JSON body (`Value::Null` when empty)
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    dispatch(app, request).await
}

/// POST a raw body with an optional content type
pub async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    dispatch(app, builder.body(Body::from(body)).unwrap()).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// GET helper
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

/// POST a JSON body
pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}
