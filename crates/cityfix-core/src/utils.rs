//! Utility functions for `CityFix`

use chrono::{DateTime, Utc};

/// Human-readable age of a timestamp relative to `now`
///
/// Under an hour reads in minutes, under a day in hours, otherwise in days.
/// Each unit is floored. Timestamps in the future read as "0 minutes ago".
#[must_use]
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes().max(0);
    let hours = elapsed.num_hours().max(0);

    if hours < 1 {
        format!("{minutes} minutes ago")
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else {
        format!("{} days ago", hours / 24)
    }
}

/// Whether a form field carries anything besides whitespace
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Length of a string in characters, as counted by the submission form
#[must_use]
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}
