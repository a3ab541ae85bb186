//! View names and the router that switches between them

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four screens of the product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Product introduction
    #[default]
    Landing,
    /// Complaint submission form
    Submit,
    /// Complaint dashboard
    Dashboard,
    /// Complaint map
    Map,
}

impl View {
    /// Every view
    pub const ALL: [Self; 4] = [Self::Landing, Self::Submit, Self::Dashboard, Self::Map];

    /// Route name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Submit => "submit",
            Self::Dashboard => "dashboard",
            Self::Map => "map",
        }
    }

    /// Resolve a route name; anything unrecognised is the landing view
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// Views reachable from this view's navigation bar, besides the brand
    /// link back to landing
    #[must_use]
    pub const fn nav_targets(self) -> [Self; 2] {
        match self {
            Self::Landing => [Self::Submit, Self::Dashboard],
            Self::Submit => [Self::Dashboard, Self::Map],
            Self::Dashboard => [Self::Submit, Self::Map],
            Self::Map => [Self::Submit, Self::Dashboard],
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the current view and swaps it on navigation
#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    current: View,
}

impl ViewRouter {
    /// Router starting on the landing view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The view being shown
    #[must_use]
    pub const fn current(&self) -> View {
        self.current
    }

    /// Switch to `view`
    pub fn navigate(&mut self, view: View) -> View {
        self.current = view;
        self.current
    }

    /// Switch by route name, falling back to landing
    pub fn navigate_by_name(&mut self, name: &str) -> View {
        self.navigate(View::from_name(name))
    }
}
