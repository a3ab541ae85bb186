//! Dashboard demo simulation
//!
//! A purely cosmetic progress run: progress climbs from 0 to 100 in fixed
//! steps, then a static results panel is revealed. Each run is a spawned task
//! publishing progress over a `watch` channel. Runs cannot be cancelled, but
//! the registry holds at most `max_runs` of them.

use crate::error::{TriageError, TriageResult};
use chrono::{DateTime, Utc};
use cityfix_core::config::SimulationConfig;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

/// Share of complaints per category in the results panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    /// Category label
    pub label: String,
    /// Number of complaints
    pub count: u32,
}

/// Static results shown once a run reaches 100%
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResults {
    /// Complaints processed
    pub processed: u32,
    /// Wall time claimed for processing, in seconds
    pub duration_seconds: u32,
    /// Classification accuracy percentage
    pub accuracy_percent: u8,
    /// Duplicate complaints detected and merged
    pub duplicates_merged: u32,
    /// Complaints auto-escalated to priority departments
    pub auto_escalated: u32,
    /// Per-category distribution
    pub distribution: Vec<DistributionEntry>,
}

impl SimulationResults {
    /// The fixed demo figures
    pub fn demo() -> Self {
        let distribution = [
            ("Waste", 31),
            ("Roads", 27),
            ("Water", 19),
            ("Electricity", 15),
            ("Health", 8),
        ]
        .into_iter()
        .map(|(label, count)| DistributionEntry {
            label: label.to_string(),
            count,
        })
        .collect();

        Self {
            processed: 100,
            duration_seconds: 8,
            accuracy_percent: 95,
            duplicates_merged: 38,
            auto_escalated: 12,
            distribution,
        }
    }

    /// Headline sentence for the results panel
    pub fn summary(&self) -> String {
        format!(
            "{} complaints processed in {} seconds",
            self.processed, self.duration_seconds
        )
    }
}

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationPhase {
    /// Progress below 100
    Running,
    /// Progress reached 100, results available
    Complete,
}

/// Point-in-time view of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Run id
    pub id: Uuid,
    /// Current phase
    pub phase: SimulationPhase,
    /// Progress percentage
    pub progress: u8,
    /// Results, only once complete
    pub results: Option<SimulationResults>,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SimulationRun {
    progress: watch::Receiver<u8>,
    started_at: DateTime<Utc>,
    seq: u64,
}

impl SimulationRun {
    fn is_complete(&self) -> bool {
        *self.progress.borrow() >= 100
    }

    fn snapshot(&self, id: Uuid) -> SimulationSnapshot {
        let progress = *self.progress.borrow();
        let complete = progress >= 100;
        SimulationSnapshot {
            id,
            phase: if complete {
                SimulationPhase::Complete
            } else {
                SimulationPhase::Running
            },
            progress,
            results: complete.then(SimulationResults::demo),
            started_at: self.started_at,
        }
    }
}

/// Tracks demo runs by id
#[derive(Debug)]
pub struct SimulationRegistry {
    config: SimulationConfig,
    runs: DashMap<Uuid, SimulationRun>,
    next_seq: AtomicU64,
}

impl SimulationRegistry {
    /// Create an empty registry
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            runs: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Start a run and return its id
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> Uuid {
        let id = Uuid::new_v4();
        let (tx, rx) = watch::channel(0u8);
        let step = self.config.step_percent.clamp(1, 100);
        let delay = self.config.step_delay();

        self.make_room();
        self.runs.insert(
            id,
            SimulationRun {
                progress: rx,
                started_at: Utc::now(),
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            },
        );
        info!(%id, "Starting demo simulation");

        tokio::spawn(async move {
            let mut progress = 0u8;
            while progress < 100 {
                sleep(delay).await;
                progress = progress.saturating_add(step).min(100);
                debug!(%id, progress, "Simulation progress");
                // Receivers live in the registry; a dismissed run has none.
                if tx.send(progress).is_err() {
                    break;
                }
            }
        });

        id
    }

    /// Evict runs until a new one fits: finished runs go first, oldest
    /// first within each group. An evicted running task stops at its next
    /// step once no receiver is left.
    fn make_room(&self) {
        let capacity = self.config.max_runs.max(1);
        while self.runs.len() >= capacity {
            let oldest = self
                .runs
                .iter()
                .min_by_key(|entry| (!entry.value().is_complete(), entry.value().seq))
                .map(|entry| *entry.key());
            let Some(id) = oldest else { break };
            self.runs.remove(&id);
            debug!(%id, "Evicted demo simulation");
        }
    }

    /// Current state of a run
    pub fn get(&self, id: Uuid) -> Option<SimulationSnapshot> {
        self.runs.get(&id).map(|run| run.snapshot(id))
    }

    /// Wait until a run completes
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::SimulationNotFound`] for an unknown id.
    pub async fn wait(&self, id: Uuid) -> TriageResult<SimulationSnapshot> {
        let run = self
            .runs
            .get(&id)
            .map(|run| run.value().clone())
            .ok_or(TriageError::SimulationNotFound(id))?;

        let mut progress = run.progress.clone();
        // The sender is only dropped after publishing 100, so an error here
        // still leaves the final value in the channel.
        let _ = progress.wait_for(|p| *p >= 100).await;
        Ok(run.snapshot(id))
    }

    /// Remove a completed run ("Close")
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::SimulationNotFound`] for an unknown id and
    /// [`TriageError::SimulationRunning`] while the run is still in progress.
    pub fn dismiss(&self, id: Uuid) -> TriageResult<SimulationSnapshot> {
        let snapshot = self.get(id).ok_or(TriageError::SimulationNotFound(id))?;
        if snapshot.phase == SimulationPhase::Running {
            return Err(TriageError::SimulationRunning(id));
        }
        self.runs.remove(&id);
        info!(%id, "Dismissed demo simulation");
        Ok(snapshot)
    }

    /// Number of tracked runs
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether no runs are tracked
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::time::Instant;

    fn registry() -> SimulationRegistry {
        SimulationRegistry::new(SimulationConfig::default())
    }

    #[test]
    fn test_demo_results() {
        let results = SimulationResults::demo();

        assert_eq!(results.summary(), "100 complaints processed in 8 seconds");
        assert_eq!(results.accuracy_percent, 95);
        assert_eq!(results.duplicates_merged, 38);
        assert_eq!(results.auto_escalated, 12);

        let labels: Vec<_> = results
            .distribution
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Waste", 31),
                ("Roads", 27),
                ("Water", 19),
                ("Electricity", 15),
                ("Health", 8)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_starts_at_zero_without_results() {
        let registry = registry();
        let id = registry.start();

        let snapshot = registry.get(id).unwrap();
        assert_eq!(snapshot.progress, 0);
        assert_eq!(snapshot.phase, SimulationPhase::Running);
        assert!(snapshot.results.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_after_twenty_steps() {
        let registry = registry();
        let started = Instant::now();
        let id = registry.start();

        let snapshot = registry.wait(id).await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(20 * 80), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(21 * 80), "{elapsed:?}");
        assert_eq!(snapshot.progress, 100);
        assert_eq!(snapshot.phase, SimulationPhase::Complete);
        assert_eq!(snapshot.results, Some(SimulationResults::demo()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotonic_and_results_only_at_end() {
        let registry = registry();
        let id = registry.start();
        let mut last = 0;

        loop {
            tokio::time::sleep(Duration::from_millis(40)).await;
            let snapshot = registry.get(id).unwrap();
            assert!(snapshot.progress >= last);
            assert_eq!(snapshot.results.is_some(), snapshot.progress == 100);
            last = snapshot.progress;
            if snapshot.phase == SimulationPhase::Complete {
                break;
            }
        }
        assert_eq!(last, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_uneven_step_is_capped_at_hundred() {
        let registry = SimulationRegistry::new(SimulationConfig {
            step_percent: 30,
            step_delay_ms: 10,
            ..SimulationConfig::default()
        });
        let id = registry.start();

        let snapshot = registry.wait(id).await.unwrap();
        assert_eq!(snapshot.progress, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss() {
        let registry = registry();
        let id = registry.start();

        assert!(matches!(
            registry.dismiss(id),
            Err(TriageError::SimulationRunning(_))
        ));

        registry.wait(id).await.unwrap();
        let dismissed = registry.dismiss(id).unwrap();
        assert_eq!(dismissed.phase, SimulationPhase::Complete);
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());

        assert!(matches!(
            registry.dismiss(id),
            Err(TriageError::SimulationNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_run() {
        let registry = registry();
        let id = Uuid::new_v4();

        assert!(registry.get(id).is_none());
        assert!(matches!(
            registry.wait(id).await,
            Err(TriageError::SimulationNotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_runs_are_independent() {
        let registry = registry();
        let first = registry.start();
        tokio::time::sleep(Duration::from_millis(400)).await;
        let second = registry.start();

        assert_eq!(registry.len(), 2);
        registry.wait(first).await.unwrap();
        assert!(registry.get(second).unwrap().progress < 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_registry_evicts_finished_runs_first() {
        let registry = SimulationRegistry::new(SimulationConfig {
            step_delay_ms: 10,
            max_runs: 2,
            ..SimulationConfig::default()
        });

        let finished = registry.start();
        registry.wait(finished).await.unwrap();
        let running = registry.start();
        let newest = registry.start();

        assert_eq!(registry.len(), 2);
        assert!(registry.get(finished).is_none());
        assert!(registry.get(running).is_some());
        assert!(registry.get(newest).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_registry_never_grows_past_capacity() {
        let registry = SimulationRegistry::new(SimulationConfig {
            max_runs: 3,
            ..SimulationConfig::default()
        });

        let ids: Vec<_> = (0..10).map(|_| registry.start()).collect();

        assert_eq!(registry.len(), 3);
        assert!(registry.get(ids[0]).is_none());
        for id in &ids[7..] {
            assert!(registry.get(*id).is_some());
        }
    }
}
