//! Complaint triage for `CityFix`
//!
//! This crate holds the behaviour behind the submit and dashboard views:
//! keyword classification of complaint text, the submission state machine
//! that turns a form into a stored complaint, and the cosmetic dashboard
//! simulation.

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
    clippy::missing_errors_doc
)]

pub mod classifier;
pub mod error;
pub mod flow;
pub mod simulation;

pub use classifier::{
    Classification, ClassifierHealth, ClassifierStats, ComplaintClassifier, KeywordClassifier,
};
pub use error::{TriageError, TriageResult};
pub use flow::{Submission, SubmissionFlow, SubmissionSnapshot, SubmissionState};
pub use simulation::{
    SimulationPhase, SimulationRegistry, SimulationResults, SimulationSnapshot,
};
