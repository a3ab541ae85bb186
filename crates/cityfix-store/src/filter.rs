//! Complaint list filters

use cityfix_core::{Complaint, Department, Error};
use std::fmt;
use std::str::FromStr;

/// Department selection on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepartmentFilter {
    /// Every department
    #[default]
    All,
    /// A single department
    Only(Department),
}

impl DepartmentFilter {
    /// Whether `department` passes the filter
    #[must_use]
    pub fn matches(self, department: Department) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == department,
        }
    }

    /// Chip label shown for this filter
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(department) => department.filter_label(),
        }
    }
}

impl fmt::Display for DepartmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DepartmentFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Only)
    }
}

/// Criteria for [`crate::ComplaintRepository::list`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Department selection
    pub department: DepartmentFilter,
    /// Only complaints that carry map coordinates
    pub located_only: bool,
}

impl ComplaintFilter {
    /// Filter on a single department
    #[must_use]
    pub const fn department(department: Department) -> Self {
        Self {
            department: DepartmentFilter::Only(department),
            located_only: false,
        }
    }

    /// Restrict to complaints with coordinates
    #[must_use]
    pub const fn located(mut self) -> Self {
        self.located_only = true;
        self
    }

    /// Whether `complaint` passes every criterion
    #[must_use]
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.department.matches(complaint.department)
            && (!self.located_only || complaint.coordinates.is_some())
    }
}

impl From<DepartmentFilter> for ComplaintFilter {
    fn from(department: DepartmentFilter) -> Self {
        Self {
            department,
            located_only: false,
        }
    }
}
