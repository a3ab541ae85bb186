//! Complaint classification
//!
//! [`ComplaintClassifier`] is the seam the submission flow talks to.
//! [`KeywordClassifier`] routes by first-match keyword lookup and assigns
//! priority from urgency words. Its randomness (fallback department, priority
//! coin flip, confidence) comes from a seedable RNG.

use crate::error::{TriageError, TriageResult};
use async_trait::async_trait;
use cityfix_core::config::{FallbackPolicy, TriageConfig};
use cityfix_core::types::ClassificationBasis;
use cityfix_core::{Department, Priority};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Department keyword groups, checked in order
pub const DEPARTMENT_KEYWORDS: [(Department, &[&str]); 6] = [
    (
        Department::WasteManagement,
        &["garbage", "waste", "trash", "dump", "sewage"],
    ),
    (
        Department::Infrastructure,
        &["road", "pothole", "traffic", "footpath", "manhole", "bridge"],
    ),
    (Department::WaterSupply, &["water", "supply", "pipe", "leak"]),
    (
        Department::Electricity,
        &["electricity", "power", "light", "transformer"],
    ),
    (
        Department::Health,
        &["health", "hospital", "medical", "hygiene", "sanitation"],
    ),
    (Department::PublicSafety, &["safety", "crime", "stray", "dog"]),
];

/// Words that force `High` priority
pub const URGENT_KEYWORDS: [&str; 8] = [
    "immediate",
    "urgent",
    "emergency",
    "dangerous",
    "accident",
    "injury",
    "critical",
    "hazard",
];

/// Words that force `Medium` priority when nothing urgent is present
pub const CONCERN_KEYWORDS: [&str; 5] = ["concern", "issue", "problem", "need", "affect"];

/// First department whose keyword occurs in `text`, with the keyword
///
/// Matching is substring-based on the lower-cased text.
#[must_use]
pub fn match_department(text: &str) -> Option<(Department, &'static str)> {
    let lowered = text.to_lowercase();
    DEPARTMENT_KEYWORDS.iter().find_map(|(department, keywords)| {
        keywords
            .iter()
            .find(|keyword| lowered.contains(*keyword))
            .map(|keyword| (*department, *keyword))
    })
}

/// Priority implied by urgency words, if any
#[must_use]
pub fn priority_signal(text: &str) -> Option<Priority> {
    let lowered = text.to_lowercase();
    if URGENT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Some(Priority::High)
    } else if CONCERN_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Some(Priority::Medium)
    } else {
        None
    }
}

/// Outcome of classifying a description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Routed department
    pub department: Department,
    /// Urgency tier
    pub priority: Priority,
    /// Confidence percentage
    pub confidence: u8,
    /// How the department was chosen
    pub basis: ClassificationBasis,
}

/// Classifier health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierHealth {
    /// Whether the classifier can serve requests
    pub healthy: bool,

    /// Status message
    pub status: String,

    /// Classifier name
    pub name: String,

    /// Fallback policy in effect
    pub fallback: FallbackPolicy,

    /// Last health check timestamp
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Running classification counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierStats {
    /// Descriptions classified, including unclassified ones
    pub total: u64,

    /// Classifications decided by a keyword
    pub keyword_matches: u64,

    /// Classifications decided by the random fallback
    pub fallbacks: u64,

    /// Descriptions left unclassified
    pub unclassified: u64,

    /// Classifications per department
    pub by_department: BTreeMap<Department, u64>,
}

/// Pluggable complaint classifier
#[async_trait]
pub trait ComplaintClassifier: Send + Sync + std::fmt::Debug {
    /// Route a description to a department and assign priority and confidence
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Unclassified`] when no department can be chosen.
    async fn classify(&self, text: &str) -> TriageResult<Classification>;

    /// Check if the classifier is healthy and ready
    async fn health_check(&self) -> TriageResult<ClassifierHealth>;

    /// Get classification statistics
    async fn stats(&self) -> TriageResult<ClassifierStats>;

    /// Get classifier name
    fn name(&self) -> &str;
}

/// Rule-based classifier over fixed keyword groups
#[derive(Debug)]
pub struct KeywordClassifier {
    fallback: FallbackPolicy,
    confidence_min: u8,
    confidence_max: u8,
    rng: Mutex<StdRng>,
    stats: Mutex<ClassifierStats>,
}

impl KeywordClassifier {
    /// Create a classifier from triage configuration, seeded from entropy
    pub fn new(config: &TriageConfig) -> Self {
        Self {
            fallback: config.fallback,
            confidence_min: config.confidence_min.min(config.confidence_max),
            confidence_max: config.confidence_max,
            rng: Mutex::new(StdRng::from_entropy()),
            stats: Mutex::new(ClassifierStats::default()),
        }
    }

    /// Use a fixed seed so results are reproducible
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Override the fallback policy
    #[must_use]
    pub const fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Classify synchronously
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Unclassified`] when no keyword matches and the
    /// fallback policy is `unclassified`.
    pub fn classify_text(&self, text: &str) -> TriageResult<Classification> {
        let matched = match_department(text);
        let signal = priority_signal(text);

        let outcome = {
            let mut rng = self.rng.lock();
            let routed = match (matched, self.fallback) {
                (Some((department, keyword)), _) => Some((
                    department,
                    ClassificationBasis::Keyword {
                        keyword: keyword.to_string(),
                    },
                )),
                (None, FallbackPolicy::Random) => {
                    let idx = rng.gen_range(0..Department::ALL.len());
                    Some((Department::ALL[idx], ClassificationBasis::Fallback))
                }
                (None, FallbackPolicy::Unclassified) => None,
            };

            routed.map(|(department, basis)| Classification {
                department,
                priority: signal.unwrap_or_else(|| {
                    if rng.gen_bool(0.5) {
                        Priority::High
                    } else {
                        Priority::Medium
                    }
                }),
                confidence: rng.gen_range(self.confidence_min..=self.confidence_max),
                basis,
            })
        };

        self.record(outcome.as_ref());

        if let Some(classification) = outcome {
            debug!(
                department = %classification.department,
                priority = %classification.priority,
                confidence = classification.confidence,
                "Classified complaint"
            );
            Ok(classification)
        } else {
            warn!("No department keyword matched, leaving complaint unclassified");
            Err(TriageError::Unclassified)
        }
    }

    fn record(&self, outcome: Option<&Classification>) {
        let mut stats = self.stats.lock();
        stats.total += 1;
        match outcome {
            Some(classification) => {
                match classification.basis {
                    ClassificationBasis::Keyword { .. } => stats.keyword_matches += 1,
                    ClassificationBasis::Fallback => stats.fallbacks += 1,
                }
                *stats
                    .by_department
                    .entry(classification.department)
                    .or_default() += 1;
            }
            None => stats.unclassified += 1,
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(&TriageConfig::default())
    }
}

#[async_trait]
impl ComplaintClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> TriageResult<Classification> {
        self.classify_text(text)
    }

    async fn health_check(&self) -> TriageResult<ClassifierHealth> {
        Ok(ClassifierHealth {
            healthy: true,
            status: "Keyword classifier ready".to_string(),
            name: self.name().to_string(),
            fallback: self.fallback,
            checked_at: chrono::Utc::now(),
        })
    }

    async fn stats(&self) -> TriageResult<ClassifierStats> {
        Ok(self.stats.lock().clone())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
