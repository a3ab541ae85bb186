//! Complaint listing, retrieval and submission endpoints

use crate::error::{
    ApiError, api_error, core_error, json_rejected, not_found, triage_error, validation_failed,
};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use cityfix_core::types::ApiResponse;
use cityfix_core::utils::relative_time;
use cityfix_core::{Complaint, ComplaintId};
use cityfix_store::{ComplaintFilter, DepartmentFilter};
use cityfix_triage::{Submission, SubmissionSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Query parameters for listing complaints
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListComplaintsQuery {
    /// `All`, a department name or a filter label such as `Water`
    #[validate(length(max = 50))]
    pub department: Option<String>,
}

/// Complaint submission body
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitComplaintRequest {
    /// Free-text description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Free-text location
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
}

/// Complaint with the presentation fields a card needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintCard {
    /// The complaint
    #[serde(flatten)]
    pub complaint: Complaint,
    /// Age such as "3 hours ago"
    pub relative_time: String,
    /// Priority dot
    pub priority_indicator: &'static str,
    /// Department tag colour
    pub department_color: &'static str,
    /// Status colour
    pub status_color: &'static str,
}

impl ComplaintCard {
    /// Decorate a complaint relative to `now`
    #[must_use]
    pub fn new(complaint: Complaint, now: DateTime<Utc>) -> Self {
        Self {
            relative_time: relative_time(complaint.timestamp, now),
            priority_indicator: complaint.priority.indicator(),
            department_color: complaint.department.color(),
            status_color: complaint.status.legend_color(),
            complaint,
        }
    }
}

/// Response for listing complaints
#[derive(Debug, Serialize)]
pub struct ListComplaintsResponse {
    /// Matching complaints in insertion order
    pub complaints: Vec<ComplaintCard>,
    /// Number of complaints returned
    pub count: usize,
    /// Applied filter label
    pub filter: String,
}

/// Parse a department filter parameter
pub(crate) fn parse_department(raw: Option<&str>) -> Result<DepartmentFilter, ApiError> {
    raw.map_or(Ok(DepartmentFilter::All), str::parse::<DepartmentFilter>)
        .map_err(|e| core_error(&e))
}

/// Load complaints matching `filter` as cards
pub(crate) async fn load_cards(
    state: &AppState,
    filter: &ComplaintFilter,
) -> Result<Vec<ComplaintCard>, ApiError> {
    let now = Utc::now();
    let complaints = state.store.list(filter).await.map_err(|e| core_error(&e))?;
    Ok(complaints
        .into_iter()
        .map(|c| ComplaintCard::new(c, now))
        .collect())
}

/// List complaints, optionally filtered by department
pub async fn list_complaints(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListComplaintsQuery>,
) -> Result<Json<ApiResponse<ListComplaintsResponse>>, ApiError> {
    query.validate().map_err(|e| validation_failed(&e))?;

    let department = parse_department(query.department.as_deref())?;
    let complaints = load_cards(&state, &department.into()).await?;

    info!(filter = %department, count = complaints.len(), "Listed complaints");
    Ok(Json(ApiResponse::success(ListComplaintsResponse {
        count: complaints.len(),
        filter: department.to_string(),
        complaints,
    })))
}

/// Retrieve a single complaint
pub async fn get_complaint(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<ComplaintCard>>, ApiError> {
    let id: ComplaintId = raw_id.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid complaint id: {raw_id}"),
            "INVALID_COMPLAINT_ID",
        )
    })?;

    match state.store.get(&id).await {
        Ok(Some(complaint)) => Ok(Json(ApiResponse::success(ComplaintCard::new(
            complaint,
            Utc::now(),
        )))),
        Ok(None) => {
            info!("Complaint not found: {}", id);
            Err(not_found(
                format!("Complaint {id} not found"),
                "COMPLAINT_NOT_FOUND",
            ))
        }
        Err(e) => Err(core_error(&e)),
    }
}

/// Run the submission flow: validate, analyze, classify and store
///
/// Holds the request for the configured analysis delay and answers 201 with
/// the new complaint.
pub async fn submit_complaint(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitComplaintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Complaint>>), ApiError> {
    let Json(request) = payload.map_err(|e| json_rejected(&e))?;
    request.validate().map_err(|e| {
        warn!("Rejected complaint submission: {}", e);
        validation_failed(&e)
    })?;

    let complaint = state
        .submissions
        .submit(Submission::new(request.description, request.location))
        .await
        .map_err(|e| triage_error(&e))?;

    let message = format!(
        "Complaint {} routed to {}, expected resolution within {}",
        complaint.id, complaint.department, complaint.estimated_resolution
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(complaint, message)),
    ))
}

/// Current submission state, result and banner visibility
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<SubmissionSnapshot>> {
    Json(ApiResponse::success(state.submissions.snapshot()))
}

/// "Submit another": return the flow to idle
pub async fn reset_submission(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SubmissionSnapshot>>, ApiError> {
    let snapshot = state.submissions.reset().map_err(|e| triage_error(&e))?;
    Ok(Json(ApiResponse::success(snapshot)))
}
