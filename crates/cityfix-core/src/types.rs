//! Core data types for `CityFix`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Municipal department a complaint is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    /// Garbage, dumping and sewage
    #[serde(rename = "Waste Management")]
    WasteManagement,
    /// Roads, footpaths, bridges
    Infrastructure,
    /// Water supply and pipelines
    #[serde(rename = "Water Supply")]
    WaterSupply,
    /// Power supply and street lighting
    Electricity,
    /// Public health and sanitation
    Health,
    /// Crime, stray animals and other safety hazards
    #[serde(rename = "Public Safety")]
    PublicSafety,
}

impl Department {
    /// Every department, in routing order
    pub const ALL: [Self; 6] = [
        Self::WasteManagement,
        Self::Infrastructure,
        Self::WaterSupply,
        Self::Electricity,
        Self::Health,
        Self::PublicSafety,
    ];

    /// Display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WasteManagement => "Waste Management",
            Self::Infrastructure => "Infrastructure",
            Self::WaterSupply => "Water Supply",
            Self::Electricity => "Electricity",
            Self::Health => "Health",
            Self::PublicSafety => "Public Safety",
        }
    }

    /// Short label used on dashboard filter chips
    #[must_use]
    pub const fn filter_label(self) -> &'static str {
        match self {
            Self::WasteManagement => "Waste",
            Self::WaterSupply => "Water",
            other => other.as_str(),
        }
    }

    /// Colour family used for the department tag
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::WasteManagement => "green",
            Self::Infrastructure => "orange",
            Self::WaterSupply => "blue",
            Self::Electricity => "yellow",
            Self::Health => "red",
            Self::PublicSafety => "purple",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = crate::Error;

    /// Accepts the display name or the filter label, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| {
                d.as_str().eq_ignore_ascii_case(needle) || d.filter_label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| crate::Error::Parse {
                kind: "department",
                input: s.to_string(),
            })
    }
}

/// Lifecycle status of a complaint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Just submitted
    #[default]
    New,
    /// Waiting on the department
    Pending,
    /// Raised to a priority department
    Escalated,
    /// Closed
    Resolved,
}

impl Status {
    /// Every status
    pub const ALL: [Self; 4] = [Self::Escalated, Self::Pending, Self::Resolved, Self::New];

    /// Display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Pending => "Pending",
            Self::Escalated => "Escalated",
            Self::Resolved => "Resolved",
        }
    }

    /// Map legend colour
    #[must_use]
    pub const fn legend_color(self) -> &'static str {
        match self {
            Self::Escalated => "red",
            Self::Pending => "yellow",
            Self::Resolved => "green",
            Self::New => "blue",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Resolve within 12 hours
    High,
    /// Resolve within 24 hours
    Medium,
    /// Resolve within 48 hours
    Low,
}

impl Priority {
    /// Resolution estimate shown to the citizen
    #[must_use]
    pub const fn estimated_resolution(self) -> &'static str {
        match self {
            Self::High => "12 hours",
            Self::Medium => "24 hours",
            Self::Low => "48 hours",
        }
    }

    /// Coloured dot shown next to the complaint
    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
        }
    }

    /// Display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint identifier of the form `CFX-###`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintId(String);

impl ComplaintId {
    /// Prefix shared by every complaint id
    pub const PREFIX: &'static str = "CFX-";

    /// Smallest number a generated id carries
    pub const MIN: u16 = 100;

    /// Largest number a generated id carries
    pub const MAX: u16 = 999;

    /// Build an id from its numeric part
    ///
    /// # Errors
    ///
    /// Returns a parse error when `number` is not three digits.
    pub fn from_number(number: u16) -> crate::Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&number) {
            Ok(Self(format!("{}{number:03}", Self::PREFIX)))
        } else {
            Err(crate::Error::Parse {
                kind: "complaint id",
                input: number.to_string(),
            })
        }
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ComplaintId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(Self::PREFIX).filter(|rest| {
            rest.len() == 3 && rest.bytes().all(|b| b.is_ascii_digit())
        });
        match digits {
            Some(_) => Ok(Self(s.to_string())),
            None => Err(crate::Error::Parse {
                kind: "complaint id",
                input: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ComplaintId {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComplaintId> for String {
    fn from(id: ComplaintId) -> Self {
        id.0
    }
}

/// Geographic position of a complaint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// How a complaint's department was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum ClassificationBasis {
    /// A department keyword matched
    Keyword {
        /// The keyword that matched
        keyword: String,
    },
    /// No keyword matched and the department was drawn at random
    Fallback,
}

/// Citizen-submitted civic issue record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Complaint identifier
    pub id: ComplaintId,

    /// Free-form description
    #[validate(length(min = 1, max = 400))]
    pub text: String,

    /// Free-form location
    #[validate(length(min = 1))]
    pub location: String,

    /// Department the complaint is routed to
    pub department: Department,

    /// Lifecycle status
    pub status: Status,

    /// Urgency tier
    pub priority: Priority,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Classifier confidence as a percentage
    #[validate(range(max = 100))]
    pub confidence: u8,

    /// Resolution estimate derived from priority
    pub estimated_resolution: String,

    /// Position on the map, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    /// How the department was chosen
    pub classification: ClassificationBasis,
}

/// Fields a newly classified complaint is built from
#[derive(Debug, Clone)]
pub struct NewComplaint {
    /// Complaint identifier
    pub id: ComplaintId,
    /// Description
    pub text: String,
    /// Location
    pub location: String,
    /// Routed department
    pub department: Department,
    /// Urgency tier
    pub priority: Priority,
    /// Confidence percentage
    pub confidence: u8,
    /// How the department was chosen
    pub classification: ClassificationBasis,
}

impl Complaint {
    /// Create a complaint with status `New`, deriving the resolution estimate
    #[must_use]
    pub fn new(new: NewComplaint, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            text: new.text,
            location: new.location,
            department: new.department,
            status: Status::New,
            priority: new.priority,
            timestamp,
            confidence: new.confidence,
            estimated_resolution: new.priority.estimated_resolution().to_string(),
            coordinates: None,
            classification: new.classification,
        }
    }

    /// Set the status
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Attach map coordinates
    #[must_use]
    pub const fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates { lat, lng });
        self
    }
}

/// API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,

    /// Success status
    pub success: bool,

    /// Optional message
    pub message: Option<String>,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            data,
            success: true,
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a successful response with message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            success: true,
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Error code
    pub code: String,

    /// Success status (always false for errors)
    pub success: bool,

    /// Error timestamp
    pub timestamp: DateTime<Utc>,

    /// Optional additional details
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Create an error response with details
    pub fn with_details(
        error: impl Into<String>,
        code: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(error, code)
        }
    }
}
