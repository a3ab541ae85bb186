//! View models for the four screens
//!
//! Each view model carries everything a front end needs to render one
//! screen, including the navigation targets for its header.

use crate::error::{ApiError, not_found};
use crate::handlers::complaints::{ComplaintCard, load_cards, parse_department};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use cityfix_core::types::ApiResponse;
use cityfix_core::{ComplaintId, Department, Status, View};
use cityfix_store::{ComplaintFilter, DepartmentFilter};
use cityfix_triage::SubmissionSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Query parameters shared by the view endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// Dashboard department filter
    pub department: Option<String>,
    /// Map complaint to show in the detail panel
    pub selected: Option<String>,
}

/// Feature card on the landing page
#[derive(Debug, Clone, Serialize)]
pub struct FeatureCard {
    /// Card title
    pub title: &'static str,
    /// Card body
    pub description: &'static str,
}

/// Landing page
#[derive(Debug, Clone, Serialize)]
pub struct LandingView {
    /// Product name
    pub title: &'static str,
    /// Headline
    pub tagline: &'static str,
    /// Sub-headline
    pub subtitle: &'static str,
    /// Feature cards
    pub features: Vec<FeatureCard>,
}

/// Submission form
#[derive(Debug, Clone, Serialize)]
pub struct SubmitView {
    /// Description limit in characters
    pub max_description_len: usize,
    /// Fields that must be non-blank
    pub required_fields: [&'static str; 2],
    /// Current flow state
    pub submission: SubmissionSnapshot,
}

/// Fixed headline counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Total complaints
    pub total: u32,
    /// Pending complaints
    pub pending: u32,
    /// Escalated complaints
    pub escalated: u32,
    /// Resolved complaints
    pub resolved: u32,
}

impl DashboardSummary {
    /// The demo counters shown on the dashboard
    pub const DEMO: Self = Self {
        total: 150,
        pending: 45,
        escalated: 12,
        resolved: 33,
    };
}

/// Complaint dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Headline counters
    pub summary: DashboardSummary,
    /// Filter chip labels, `All` first
    pub filters: Vec<&'static str>,
    /// Selected filter label
    pub selected_filter: String,
    /// Complaints passing the filter
    pub complaints: Vec<ComplaintCard>,
}

/// Map legend entry
#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    /// Status
    pub status: Status,
    /// Marker colour
    pub color: &'static str,
}

/// Complaint map
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    /// Embedded map widget URL
    pub embed_url: String,
    /// Status legend
    pub legend: Vec<LegendEntry>,
    /// Complaints with coordinates
    pub complaints: Vec<ComplaintCard>,
    /// Detail panel content
    pub selected: Option<ComplaintCard>,
}

/// Content of a view
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewContent {
    /// Landing page
    Landing(LandingView),
    /// Submission form
    Submit(SubmitView),
    /// Dashboard
    Dashboard(DashboardView),
    /// Map
    Map(MapView),
}

/// A view with its navigation
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    /// Header links besides the brand link to landing
    pub nav: [View; 2],
    /// View content
    #[serde(flatten)]
    pub content: ViewContent,
}

/// Landing page content
pub fn landing_view() -> LandingView {
    LandingView {
        title: "CityFix Agent",
        tagline: "Autonomous AI for Responsive Civic Governance",
        subtitle: "India's first autonomous AI system managing civic complaints from submission to resolution",
        features: vec![
            FeatureCard {
                title: "Instant AI Classification",
                description: "Advanced AI analyzes and categorizes complaints in seconds, ensuring rapid response and accurate routing.",
            },
            FeatureCard {
                title: "Smart Auto-Routing",
                description: "Intelligent department assignment ensures complaints reach the right team immediately, minimizing delays.",
            },
            FeatureCard {
                title: "Complete Transparency",
                description: "Real-time status tracking and updates keep citizens informed at every step of the resolution process.",
            },
        ],
    }
}

fn submit_view(state: &AppState) -> SubmitView {
    SubmitView {
        max_description_len: state.submissions.max_description_len(),
        required_fields: ["description", "location"],
        submission: state.submissions.snapshot(),
    }
}

async fn dashboard_view(state: &AppState, query: &ViewQuery) -> Result<DashboardView, ApiError> {
    let department = parse_department(query.department.as_deref())?;
    let complaints = load_cards(state, &department.into()).await?;

    let filters = std::iter::once(DepartmentFilter::All.label())
        .chain(Department::ALL.into_iter().map(Department::filter_label))
        .collect();

    Ok(DashboardView {
        summary: DashboardSummary::DEMO,
        filters,
        selected_filter: department.to_string(),
        complaints,
    })
}

async fn map_view(state: &AppState, query: &ViewQuery) -> Result<MapView, ApiError> {
    let complaints = load_cards(state, &ComplaintFilter::default().located()).await?;

    let selected = match query.selected.as_deref() {
        None => None,
        Some(raw) => {
            let id: Option<ComplaintId> = raw.parse().ok();
            let found = complaints
                .iter()
                .find(|card| Some(&card.complaint.id) == id.as_ref())
                .cloned();
            if found.is_none() {
                return Err(not_found(
                    format!("Complaint {raw} is not on the map"),
                    "COMPLAINT_NOT_FOUND",
                ));
            }
            found
        }
    };

    let legend = [Status::Escalated, Status::Pending, Status::Resolved, Status::New]
        .into_iter()
        .map(|status| LegendEntry {
            status,
            color: status.legend_color(),
        })
        .collect();

    Ok(MapView {
        embed_url: state.config.map.embed_url.clone(),
        legend,
        complaints,
        selected,
    })
}

/// Build the view model for `view`
pub async fn build_view(
    state: &AppState,
    view: View,
    query: &ViewQuery,
) -> Result<ViewModel, ApiError> {
    let content = match view {
        View::Landing => ViewContent::Landing(landing_view()),
        View::Submit => ViewContent::Submit(submit_view(state)),
        View::Dashboard => ViewContent::Dashboard(dashboard_view(state, query).await?),
        View::Map => ViewContent::Map(map_view(state, query).await?),
    };

    Ok(ViewModel {
        nav: view.nav_targets(),
        content,
    })
}

/// View model by name; unknown names render the landing view
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ApiResponse<ViewModel>>, ApiError> {
    let view = View::from_name(&name);
    debug!(requested = %name, resolved = %view, "Rendering view");
    Ok(Json(ApiResponse::success(
        build_view(&state, view, &query).await?,
    )))
}

/// Map view model
pub async fn get_map(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ApiResponse<MapView>>, ApiError> {
    Ok(Json(ApiResponse::success(map_view(&state, &query).await?)))
}
