//! Complaint submission flow
//!
//! A single shared state machine: `idle -> analyzing -> complete`. A
//! submission is validated, held for the simulated analysis delay, classified,
//! given a fresh id and appended to the store. The analysis runs on its own
//! task, so a caller that goes away mid-analysis does not abort it.

use crate::classifier::ComplaintClassifier;
use crate::error::{TriageError, TriageResult};
use chrono::Utc;
use cityfix_core::config::TriageConfig;
use cityfix_core::types::NewComplaint;
use cityfix_core::utils::{char_len, is_blank};
use cityfix_core::{Complaint, ComplaintId};
use cityfix_store::ComplaintRepository;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::{Instant, sleep};
use tracing::{error, info, warn};

/// Where the submission form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    /// Waiting for input
    #[default]
    Idle,
    /// Simulated analysis in progress
    Analyzing,
    /// Result available
    Complete,
}

/// Citizen input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    /// Free-text description of the issue
    pub description: String,
    /// Free-text location
    pub location: String,
}

impl Submission {
    /// Create a submission
    pub fn new(description: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            location: location.into(),
        }
    }
}

/// Point-in-time view of the flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSnapshot {
    /// Current state
    pub state: SubmissionState,
    /// Last produced complaint, while complete
    pub result: Option<Complaint>,
    /// Whether the success banner is still showing
    pub banner_visible: bool,
}

#[derive(Debug, Default)]
struct FlowInner {
    state: SubmissionState,
    result: Option<Complaint>,
    completed_at: Option<Instant>,
}

/// Drives submissions through validation, analysis and storage
#[derive(Debug)]
pub struct SubmissionFlow {
    config: TriageConfig,
    classifier: Arc<dyn ComplaintClassifier>,
    store: Arc<dyn ComplaintRepository>,
    inner: Mutex<FlowInner>,
    ids: Mutex<StdRng>,
}

impl SubmissionFlow {
    /// Create an idle flow
    pub fn new(
        config: TriageConfig,
        classifier: Arc<dyn ComplaintClassifier>,
        store: Arc<dyn ComplaintRepository>,
    ) -> Self {
        Self {
            config,
            classifier,
            store,
            inner: Mutex::new(FlowInner::default()),
            ids: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use a fixed seed for id generation
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ids = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Maximum description length in characters
    pub const fn max_description_len(&self) -> usize {
        self.config.max_description_len
    }

    /// Current state
    pub fn state(&self) -> SubmissionState {
        self.inner.lock().state
    }

    /// Current state, result and banner visibility
    pub fn snapshot(&self) -> SubmissionSnapshot {
        let inner = self.inner.lock();
        let banner_visible = inner.state == SubmissionState::Complete
            && inner
                .completed_at
                .is_some_and(|at| at.elapsed() < self.config.banner_duration());

        SubmissionSnapshot {
            state: inner.state,
            result: inner.result.clone(),
            banner_visible,
        }
    }

    /// Check the form fields and return them trimmed
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::EmptyField`] for a blank description or location
    /// and [`TriageError::TooLong`] for an oversized description.
    pub fn validate(&self, submission: &Submission) -> TriageResult<(String, String)> {
        if is_blank(&submission.description) {
            return Err(TriageError::empty_field("description"));
        }
        if is_blank(&submission.location) {
            return Err(TriageError::empty_field("location"));
        }

        let description = submission.description.trim();
        let length = char_len(description);
        if length > self.config.max_description_len {
            return Err(TriageError::too_long(
                "description",
                self.config.max_description_len,
                length,
            ));
        }

        Ok((description.to_string(), submission.location.trim().to_string()))
    }

    /// Submit a complaint and wait for the analysis to finish
    ///
    /// Allowed from `idle` and `complete`; a previous result is discarded.
    /// Failed validation leaves the state untouched. Any failure after the
    /// analysis started returns the flow to `idle` without storing anything.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`TriageError::Busy`] while another
    /// submission is analyzing, [`TriageError::Unclassified`] when no
    /// department applies, or an id/store error.
    pub async fn submit(self: &Arc<Self>, submission: Submission) -> TriageResult<Complaint> {
        let (description, location) = self.validate(&submission)?;

        {
            let mut inner = self.inner.lock();
            if inner.state == SubmissionState::Analyzing {
                return Err(TriageError::Busy);
            }
            *inner = FlowInner {
                state: SubmissionState::Analyzing,
                ..FlowInner::default()
            };
        }
        info!(location = %location, "Analyzing complaint");

        let flow = Arc::clone(self);
        let task = tokio::spawn(async move {
            let outcome = flow.analyze(description, location).await;
            flow.finish(&outcome);
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Analysis task failed: {}", e);
                self.inner.lock().state = SubmissionState::Idle;
                Err(TriageError::interrupted(e.to_string()))
            }
        }
    }

    /// "Submit another": clear the result and return to `idle`
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Busy`] while a submission is analyzing.
    pub fn reset(&self) -> TriageResult<SubmissionSnapshot> {
        {
            let mut inner = self.inner.lock();
            if inner.state == SubmissionState::Analyzing {
                return Err(TriageError::Busy);
            }
            *inner = FlowInner::default();
        }
        Ok(self.snapshot())
    }

    async fn analyze(&self, description: String, location: String) -> TriageResult<Complaint> {
        sleep(self.config.analysis_delay()).await;

        let classification = self.classifier.classify(&description).await?;
        let id = self.next_id().await?;

        let complaint = Complaint::new(
            NewComplaint {
                id,
                text: description,
                location,
                department: classification.department,
                priority: classification.priority,
                confidence: classification.confidence,
                classification: classification.basis,
            },
            Utc::now(),
        );

        self.store.insert(complaint.clone()).await?;
        Ok(complaint)
    }

    async fn next_id(&self) -> TriageResult<ComplaintId> {
        for _ in 0..self.config.id_attempts {
            let number = self.ids.lock().gen_range(ComplaintId::MIN..=ComplaintId::MAX);
            let id = ComplaintId::from_number(number)?;
            if !self.store.contains(&id).await? {
                return Ok(id);
            }
        }

        Err(TriageError::IdSpaceExhausted {
            attempts: self.config.id_attempts,
        })
    }

    fn finish(&self, outcome: &TriageResult<Complaint>) {
        let mut inner = self.inner.lock();
        match outcome {
            Ok(complaint) => {
                info!(
                    id = %complaint.id,
                    department = %complaint.department,
                    priority = %complaint.priority,
                    "Complaint registered"
                );
                *inner = FlowInner {
                    state: SubmissionState::Complete,
                    result: Some(complaint.clone()),
                    completed_at: Some(Instant::now()),
                };
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                *inner = FlowInner::default();
            }
        }
    }
}
