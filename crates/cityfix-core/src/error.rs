//! Error types for `CityFix`

use std::{error::Error as StdError, fmt};

/// Main error type for `CityFix`
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Resource already exists
    Conflict {
        /// Resource that collided
        resource: String,
    },

    /// Value could not be parsed into a domain type
    Parse {
        /// What was being parsed
        kind: &'static str,
        /// The offending input
        input: String,
    },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Conflict { resource } => write!(f, "Resource already exists: {resource}"),
            Self::Parse { kind, input } => write!(f, "Invalid {kind}: {input:?}"),
        }
    }
}

impl StdError for Error {}
