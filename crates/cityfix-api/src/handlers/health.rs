//! Health check endpoints for monitoring and diagnostics

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use cityfix_triage::{ClassifierHealth, ClassifierStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Classifier status
    pub classifier: ClassifierHealth,
    /// Classification counters
    pub classifications: ClassifierStats,
    /// Stored complaints
    pub complaints: usize,
    /// System uptime in seconds
    pub uptime_seconds: u64,
}

/// Readiness check response (simpler than health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Service readiness status
    pub ready: bool,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Basic health check endpoint for monitoring systems
///
/// Returns HTTP 200 with classifier health, classification counters and the
/// number of stored complaints, or HTTP 503 if the classifier or store
/// cannot be reached.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2024-03-15T14:25:30Z",
///   "classifier": {
///     "healthy": true,
///     "status": "Keyword classifier ready",
///     "name": "keyword",
///     "fallback": "random",
///     "checked_at": "2024-03-15T14:25:30Z"
///   },
///   "classifications": {"total": 3, "keyword_matches": 3, "fallbacks": 0, "unclassified": 0, "by_department": {"Health": 3}},
///   "complaints": 11,
///   "uptime_seconds": 3600
/// }
/// ```
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let classifier = state.classifier.health_check().await.map_err(|e| {
        error!("Classifier health check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    if !classifier.healthy {
        error!("Classifier reports unhealthy: {}", classifier.status);
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let classifications = state.classifier.stats().await.map_err(|e| {
        error!("Classifier stats unavailable: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let complaints = state.store.count().await.map_err(|e| {
        error!("Complaint store health check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    debug!(complaints, "Health check completed");
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        classifier,
        classifications,
        complaints,
        uptime_seconds: state.uptime_seconds(),
    }))
}

/// Readiness check endpoint for Kubernetes-style health checks
///
/// Returns 200 OK if the service is ready to accept traffic
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    match state.store.count().await {
        Ok(_) => Ok(Json(ReadinessResponse {
            ready: true,
            timestamp: chrono::Utc::now(),
        })),
        Err(e) => {
            error!("Readiness check failed - complaint store not accessible: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
