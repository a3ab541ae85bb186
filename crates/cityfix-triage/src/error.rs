//! Error types for complaint triage

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for triage operations
pub type TriageResult<T> = Result<T, TriageError>;

/// Errors that can occur while triaging a complaint
#[derive(Error, Debug)]
pub enum TriageError {
    /// A required form field was empty or whitespace
    #[error("{field} is required")]
    EmptyField {
        /// Field name
        field: &'static str,
    },

    /// A form field exceeded its character limit
    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        /// Field name
        field: &'static str,
        /// Character limit
        max: usize,
        /// Submitted length
        actual: usize,
    },

    /// Another submission is still being analyzed
    #[error("A complaint is already being analyzed")]
    Busy,

    /// No department keyword matched and the fallback policy is `unclassified`
    #[error("Could not determine a department for this complaint")]
    Unclassified,

    /// Every drawn complaint id was already taken
    #[error("No unused complaint id found after {attempts} attempts")]
    IdSpaceExhausted {
        /// Attempts made
        attempts: u32,
    },

    /// Unknown simulation run
    #[error("Simulation run not found: {0}")]
    SimulationNotFound(Uuid),

    /// The simulation run has not finished yet
    #[error("Simulation run {0} is still in progress")]
    SimulationRunning(Uuid),

    /// Background analysis task ended abnormally
    #[error("Analysis task failed: {message}")]
    Interrupted {
        /// Failure description
        message: String,
    },

    /// Complaint store error
    #[error("Complaint store error: {0}")]
    Store(#[from] cityfix_core::Error),
}

impl TriageError {
    /// Create an empty field error
    pub const fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    /// Create a too long error
    pub const fn too_long(field: &'static str, max: usize, actual: usize) -> Self {
        Self::TooLong { field, max, actual }
    }

    /// Create an interrupted error
    pub fn interrupted(message: impl Into<String>) -> Self {
        Self::Interrupted {
            message: message.into(),
        }
    }

    /// Whether the error stems from the submitted form rather than the service
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyField { .. } | Self::TooLong { .. })
    }

    /// Stable machine-readable code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyField { .. } | Self::TooLong { .. } => "VALIDATION_ERROR",
            Self::Busy => "SUBMISSION_IN_PROGRESS",
            Self::Unclassified => "UNCLASSIFIED",
            Self::IdSpaceExhausted { .. } => "ID_SPACE_EXHAUSTED",
            Self::SimulationNotFound(_) => "SIMULATION_NOT_FOUND",
            Self::SimulationRunning(_) => "SIMULATION_RUNNING",
            Self::Interrupted { .. } => "ANALYSIS_FAILED",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<TriageError> for cityfix_core::context_error::ContextError {
    fn from(err: TriageError) -> Self {
        Self::with_context(err, "Complaint triage error")
    }
}
