//! Mapping of domain errors onto HTTP error responses

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};
use cityfix_core::types::ErrorResponse;
use cityfix_triage::TriageError;
use serde_json::json;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Error half of every handler's return type
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build an error response
pub fn api_error(status: StatusCode, message: impl Into<String>, code: &str) -> ApiError {
    (status, Json(ErrorResponse::new(message, code)))
}

/// 404 for a missing resource
pub fn not_found(message: impl Into<String>, code: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, message, code)
}

/// 400 carrying per-field validator messages
pub fn validation_failed(errors: &ValidationErrors) -> ApiError {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            ((*field).to_string(), json!(messages))
        })
        .collect();

    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_details(
            "Invalid request",
            "VALIDATION_ERROR",
            json!({ "fields": fields }),
        )),
    )
}

/// Malformed or incomplete JSON body, keeping the rejection's status
pub fn json_rejected(rejection: &JsonRejection) -> ApiError {
    warn!("Rejected request body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(ErrorResponse::with_details(
            "Invalid request body",
            "VALIDATION_ERROR",
            json!({ "reason": rejection.body_text() }),
        )),
    )
}

/// Map a core error
pub fn core_error(err: &cityfix_core::Error) -> ApiError {
    match err {
        cityfix_core::Error::Conflict { .. } => {
            api_error(StatusCode::CONFLICT, err.to_string(), "CONFLICT")
        }
        cityfix_core::Error::Parse { .. } => {
            api_error(StatusCode::BAD_REQUEST, err.to_string(), "INVALID_PARAMETER")
        }
        cityfix_core::Error::Configuration { .. } => {
            error!("Internal error: {}", err);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "INTERNAL_ERROR",
            )
        }
    }
}

/// Map a triage error
pub fn triage_error(err: &TriageError) -> ApiError {
    let status = match err {
        TriageError::EmptyField { .. } | TriageError::TooLong { .. } => StatusCode::BAD_REQUEST,
        TriageError::Busy | TriageError::SimulationRunning(_) => StatusCode::CONFLICT,
        TriageError::Unclassified => StatusCode::UNPROCESSABLE_ENTITY,
        TriageError::SimulationNotFound(_) => StatusCode::NOT_FOUND,
        TriageError::IdSpaceExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        TriageError::Store(inner) => return core_error(inner),
        TriageError::Interrupted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Triage failed: {}", err);
    } else {
        warn!("Triage rejected: {}", err);
    }

    let response = match err {
        TriageError::EmptyField { field } | TriageError::TooLong { field, .. } => {
            ErrorResponse::with_details(err.to_string(), err.code(), json!({ "field": field }))
        }
        _ => ErrorResponse::new(err.to_string(), err.code()),
    };

    (status, Json(response))
}
