//! Complaint repository for `CityFix`
//!
//! The dashboard and map read complaints through [`ComplaintRepository`], and
//! the submission flow appends to it. [`InMemoryComplaintStore`] is the only
//! implementation: it lives for the lifetime of the process and starts out
//! seeded with the sample complaints from [`seed`].

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod filter;
pub mod seed;

pub use filter::{ComplaintFilter, DepartmentFilter};

use async_trait::async_trait;
use cityfix_core::{Complaint, ComplaintId, Error, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

/// Read/append access to complaint records
///
/// Complaints are immutable once stored; there is no update or delete.
#[async_trait]
pub trait ComplaintRepository: Send + Sync + std::fmt::Debug {
    /// Complaints matching `filter`, in insertion order
    async fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>>;

    /// A single complaint by id
    async fn get(&self, id: &ComplaintId) -> Result<Option<Complaint>>;

    /// Whether a complaint with this id exists
    async fn contains(&self, id: &ComplaintId) -> Result<bool>;

    /// Append a complaint
    ///
    /// Fails with [`Error::Conflict`] when the id is taken.
    async fn insert(&self, complaint: Complaint) -> Result<()>;

    /// Number of stored complaints
    async fn count(&self) -> Result<usize>;
}

/// Process-local complaint store
#[derive(Debug, Default)]
pub struct InMemoryComplaintStore {
    complaints: RwLock<IndexMap<ComplaintId, Complaint>>,
}

impl InMemoryComplaintStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the given complaints
    ///
    /// Later duplicates of an id are dropped.
    #[must_use]
    pub fn with_complaints(complaints: impl IntoIterator<Item = Complaint>) -> Self {
        let mut map = IndexMap::new();
        for complaint in complaints {
            map.entry(complaint.id.clone()).or_insert(complaint);
        }
        Self {
            complaints: RwLock::new(map),
        }
    }

    /// Store preloaded with the sample complaints, timestamped relative to now
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_complaints(seed::sample_complaints(chrono::Utc::now()))
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintStore {
    async fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        let complaints = self.complaints.read();
        Ok(complaints
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &ComplaintId) -> Result<Option<Complaint>> {
        Ok(self.complaints.read().get(id).cloned())
    }

    async fn contains(&self, id: &ComplaintId) -> Result<bool> {
        Ok(self.complaints.read().contains_key(id))
    }

    async fn insert(&self, complaint: Complaint) -> Result<()> {
        let mut complaints = self.complaints.write();
        if complaints.contains_key(&complaint.id) {
            return Err(Error::Conflict {
                resource: format!("complaint {}", complaint.id),
            });
        }
        debug!(id = %complaint.id, department = %complaint.department, "storing complaint");
        complaints.insert(complaint.id.clone(), complaint);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.complaints.read().len())
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use cityfix_core::types::{ClassificationBasis, NewComplaint};
    use cityfix_core::{Department, Priority};
    use pretty_assertions::assert_eq;

    fn complaint(number: u16, department: Department) -> Complaint {
        Complaint::new(
            NewComplaint {
                id: ComplaintId::from_number(number).unwrap(),
                text: format!("complaint {number}"),
                location: "Kanpur".to_string(),
                department,
                priority: Priority::Medium,
                confidence: 90,
                classification: ClassificationBasis::Fallback,
            },
            chrono::Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryComplaintStore::new();
        let c = complaint(101, Department::Health);

        store.insert(c.clone()).await.unwrap();

        assert_eq!(store.get(&c.id).await.unwrap(), Some(c.clone()));
        assert!(store.contains(&c.id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = InMemoryComplaintStore::new();
        store.insert(complaint(101, Department::Health)).await.unwrap();

        let err = store
            .insert(complaint(101, Department::Electricity))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Conflict { .. }));
        let kept = store
            .get(&ComplaintId::from_number(101).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.department, Department::Health);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order_and_filters() {
        let store = InMemoryComplaintStore::with_complaints([
            complaint(300, Department::WaterSupply),
            complaint(100, Department::Health),
            complaint(200, Department::WaterSupply),
        ]);

        let all = store.list(&ComplaintFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["CFX-300", "CFX-100", "CFX-200"]);

        let water = store
            .list(&ComplaintFilter::department(Department::WaterSupply))
            .await
            .unwrap();
        assert_eq!(water.len(), 2);
        assert!(water.iter().all(|c| c.department == Department::WaterSupply));
    }

    #[tokio::test]
    async fn test_missing_complaint_is_none() {
        let store = InMemoryComplaintStore::new();
        let id = ComplaintId::from_number(555).unwrap();
        assert_eq!(store.get(&id).await.unwrap(), None);
        assert!(!store.contains(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_seeded_store_is_not_empty() {
        let store = InMemoryComplaintStore::seeded();
        assert_eq!(store.count().await.unwrap(), seed::sample_complaints(chrono::Utc::now()).len());
    }
}
