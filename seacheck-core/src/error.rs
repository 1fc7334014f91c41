//! Error types surfaced by the registry, comparison and providers.
//!
//! Every expected failure is a value: nothing in the registry panics on a bad
//! fetch, an unknown id or an empty comparison.

use thiserror::Error;

use crate::model::LocationId;

/// The condition provider could not produce a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure, timeout or non-success status.
    #[error("condition provider unreachable: {message}")]
    Unreachable { message: String },

    /// The provider answered, but the payload was unusable.
    #[error("malformed condition data: {message}")]
    Malformed { message: String },
}

impl FetchError {
    pub fn unreachable<S: Into<String>>(message: S) -> Self {
        Self::Unreachable { message: message.into() }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::Malformed { message: message.into() }
    }

    /// Transport failures may clear up on their own; a payload the provider
    /// got wrong once will come back wrong.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Unreachable { .. })
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        "Failed to get weather data for this location. Please try again.".to_string()
    }
}

/// An operation referenced an id that is not (or no longer) in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no tracked location with id {0}")]
pub struct NotFoundError(pub LocationId);

impl NotFoundError {
    #[must_use]
    pub fn user_message(&self) -> String {
        "That location is no longer tracked.".to_string()
    }
}

/// A comparison needs at least two classified locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("comparison needs at least 2 locations with conditions, got {available}")]
pub struct InsufficientDataError {
    pub available: usize,
}

impl InsufficientDataError {
    #[must_use]
    pub fn user_message(&self) -> String {
        "Add at least 2 locations to compare".to_string()
    }
}

/// Failure of a single-location refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

impl RefreshError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RefreshError::Fetch(err) => err.user_message(),
            RefreshError::NotFound(err) => err.user_message(),
        }
    }
}

/// A latitude/longitude pair outside the valid range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    #[error("expected \"<lat>,<lon>\", got {0:?}")]
    Format(String),
}
