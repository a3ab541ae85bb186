//! Sample complaints the store starts with

use chrono::{DateTime, Duration, Utc};
use cityfix_core::types::{ClassificationBasis, NewComplaint};
use cityfix_core::{Complaint, ComplaintId, Department, Priority, Status};

struct Sample {
    number: u16,
    text: &'static str,
    location: &'static str,
    department: Department,
    status: Status,
    priority: Priority,
    age_minutes: i64,
    confidence: u8,
    keyword: &'static str,
    coordinates: Option<(f64, f64)>,
}

const SAMPLES: [Sample; 8] = [
    Sample {
        number: 101,
        text: "Garbage has not been collected for a week and the bins are overflowing onto the street",
        location: "Hazratganj, Lucknow",
        department: Department::WasteManagement,
        status: Status::Escalated,
        priority: Priority::High,
        age_minutes: 45,
        confidence: 94,
        keyword: "garbage",
        coordinates: Some((26.8500, 80.9462)),
    },
    Sample {
        number: 214,
        text: "Large pothole near the bus stop is causing traffic jams every morning",
        location: "Gomti Nagar, Lucknow",
        department: Department::Infrastructure,
        status: Status::Pending,
        priority: Priority::Medium,
        age_minutes: 3 * 60,
        confidence: 91,
        keyword: "pothole",
        coordinates: Some((26.8560, 81.0051)),
    },
    Sample {
        number: 327,
        text: "Water pipe leak has flooded the lane since yesterday",
        location: "Aliganj, Lucknow",
        department: Department::WaterSupply,
        status: Status::Pending,
        priority: Priority::High,
        age_minutes: 20 * 60,
        confidence: 89,
        keyword: "water",
        coordinates: Some((26.8926, 80.9409)),
    },
    Sample {
        number: 438,
        text: "Street light outside the school has been off for three nights",
        location: "Civil Lines, Kanpur",
        department: Department::Electricity,
        status: Status::Resolved,
        priority: Priority::Low,
        age_minutes: 2 * 24 * 60,
        confidence: 96,
        keyword: "light",
        coordinates: Some((26.4691, 80.3500)),
    },
    Sample {
        number: 552,
        text: "Poor hygiene at the community health centre, waiting area is filthy",
        location: "Swaroop Nagar, Kanpur",
        department: Department::Health,
        status: Status::New,
        priority: Priority::Medium,
        age_minutes: 90,
        confidence: 88,
        keyword: "health",
        coordinates: Some((26.4842, 80.3210)),
    },
    Sample {
        number: 619,
        text: "Pack of stray dogs chasing children near the park",
        location: "Indira Nagar, Lucknow",
        department: Department::PublicSafety,
        status: Status::Escalated,
        priority: Priority::High,
        age_minutes: 5 * 60,
        confidence: 93,
        keyword: "stray",
        coordinates: Some((26.8821, 80.9960)),
    },
    Sample {
        number: 745,
        text: "Open manhole on the footpath, no barricade around it",
        location: "Kidwai Nagar, Kanpur",
        department: Department::Infrastructure,
        status: Status::New,
        priority: Priority::High,
        age_minutes: 25,
        confidence: 95,
        keyword: "footpath",
        coordinates: None,
    },
    Sample {
        number: 863,
        text: "Sewage overflowing into the drain behind the market",
        location: "Aminabad, Lucknow",
        department: Department::WasteManagement,
        status: Status::Resolved,
        priority: Priority::Medium,
        age_minutes: 4 * 24 * 60,
        confidence: 90,
        keyword: "sewage",
        coordinates: None,
    },
];

/// Sample complaints across every department, timestamped relative to `now`
///
/// Most carry map coordinates; a couple do not, so the map view has
/// something to leave out.
#[must_use]
pub fn sample_complaints(now: DateTime<Utc>) -> Vec<Complaint> {
    SAMPLES
        .iter()
        .filter_map(|sample| {
            let id = ComplaintId::from_number(sample.number).ok()?;
            let complaint = Complaint::new(
                NewComplaint {
                    id,
                    text: sample.text.to_string(),
                    location: sample.location.to_string(),
                    department: sample.department,
                    priority: sample.priority,
                    confidence: sample.confidence,
                    classification: ClassificationBasis::Keyword {
                        keyword: sample.keyword.to_string(),
                    },
                },
                now - Duration::minutes(sample.age_minutes),
            )
            .with_status(sample.status);

            Some(match sample.coordinates {
                Some((lat, lng)) => complaint.with_coordinates(lat, lng),
                None => complaint,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use validator::Validate;

    #[test]
    fn test_samples_are_valid_and_unique() {
        let now = Utc::now();
        let complaints = sample_complaints(now);

        assert_eq!(complaints.len(), SAMPLES.len());
        let ids: HashSet<_> = complaints.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), complaints.len());

        for complaint in &complaints {
            assert!(complaint.validate().is_ok(), "{} invalid", complaint.id);
            assert!(complaint.timestamp <= now);
            assert_eq!(
                complaint.estimated_resolution,
                complaint.priority.estimated_resolution()
            );
        }
    }

    #[test]
    fn test_samples_cover_every_department() {
        let complaints = sample_complaints(Utc::now());
        for department in Department::ALL {
            assert!(complaints.iter().any(|c| c.department == department));
        }
    }

    #[test]
    fn test_some_samples_lack_coordinates() {
        let complaints = sample_complaints(Utc::now());
        assert!(complaints.iter().any(|c| c.coordinates.is_some()));
        assert!(complaints.iter().any(|c| c.coordinates.is_none()));
    }
}
