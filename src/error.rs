//! Error taxonomy for the planner.
//!
//! Only Submit validation produces user-facing errors. Rejected edits are
//! reported through [`crate::state::Rejection`] instead.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation failure raised by [`crate::state::submit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("a start location is required")]
    MissingStart,
    #[error("trip start and end dates are required")]
    MissingDates,
    #[error("trip end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("a {days}-day trip is longer than the {max}-night limit")]
    TripTooLong { days: i64, max: u32 },
    #[error("could not find coordinates for: {}", .0.join(", "))]
    UnresolvedPlaces(Vec<String>),
}

/// Failure of the drive-leg collaborator.
#[derive(Debug, Error)]
pub enum LegError {
    #[error("drive-leg request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("drive-leg response malformed: {0}")]
    Malformed(String),
}

/// Failure to restore a persisted plan bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unsupported bundle version {0}")]
    UnsupportedVersion(u32),
    #[error("inconsistent bundle: {0}")]
    Inconsistent(String),
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}
