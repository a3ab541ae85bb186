//! Application state management

use cityfix_core::{Config, context_error::Result};
use cityfix_store::{ComplaintRepository, InMemoryComplaintStore};
use cityfix_triage::{ComplaintClassifier, KeywordClassifier, SimulationRegistry, SubmissionFlow};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Complaint repository
    pub store: Arc<dyn ComplaintRepository>,
    /// Complaint classifier
    pub classifier: Arc<dyn ComplaintClassifier>,
    /// Submission state machine
    pub submissions: Arc<SubmissionFlow>,
    /// Dashboard demo runs
    pub simulations: Arc<SimulationRegistry>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create application state with a seeded in-memory store and the
    /// keyword classifier
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.check()?;

        let store: Arc<dyn ComplaintRepository> = Arc::new(InMemoryComplaintStore::seeded());
        let classifier: Arc<dyn ComplaintClassifier> =
            Arc::new(KeywordClassifier::new(&config.triage));

        Ok(Self::with_components(config, store, classifier))
    }

    /// Create application state around an existing store and classifier
    #[must_use]
    pub fn with_components(
        config: Config,
        store: Arc<dyn ComplaintRepository>,
        classifier: Arc<dyn ComplaintClassifier>,
    ) -> Self {
        let submissions = Arc::new(SubmissionFlow::new(
            config.triage.clone(),
            Arc::clone(&classifier),
            Arc::clone(&store),
        ));
        let simulations = Arc::new(SimulationRegistry::new(config.simulation.clone()));

        Self {
            config,
            store,
            classifier,
            submissions,
            simulations,
            started_at: Instant::now(),
        }
    }

    /// Check if the application is properly configured
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<()> {
        self.config.check()?;
        Ok(())
    }

    /// Seconds since the state was created
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_appstate_new_seeds_store() {
        let state = AppState::new(Config::default()).unwrap();

        assert!(state.store.count().await.unwrap() > 0);
        assert_eq!(state.classifier.name(), "keyword");
        assert!(state.simulations.is_empty());
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_appstate_rejects_invalid_config() {
        let mut config = Config::default();
        config.triage.confidence_min = 99;
        config.triage.confidence_max = 10;

        let err = AppState::new(config).unwrap_err();
        assert!(format!("{err}").contains("CityFix error"));
    }

    #[tokio::test]
    async fn test_appstate_with_components_shares_store() {
        let store: Arc<dyn ComplaintRepository> = Arc::new(InMemoryComplaintStore::new());
        let classifier: Arc<dyn ComplaintClassifier> = Arc::new(KeywordClassifier::default());
        let state = AppState::with_components(Config::default(), Arc::clone(&store), classifier);

        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.store, &cloned.store));
        assert_eq!(cloned.store.count().await.unwrap(), 0);
    }
}
