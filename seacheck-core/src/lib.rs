//! Core library for the `seacheck` CLI.
//!
//! This crate defines:
//! - The location registry and its refresh policy
//! - Safety classification of sea conditions and location comparison
//! - View notifications for map markers and the location list
//! - Configuration and the condition provider abstraction
//! - Coastal radio stations for distress calls
//!
//! It is used by `seacheck-cli`, but the [`Session`] front can drive any other
//! front end that can turn its input into [`Command`]s.

pub mod classifier;
pub mod comparison;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod registry;
pub mod session;
pub mod stations;
pub mod view;

#[cfg(test)]
mod testing;

pub use classifier::{SafetyThresholds, classify};
pub use comparison::{Comparison, ComparisonRow, Recommendation, compare};
pub use config::{Config, ProviderConfig};
pub use error::{CoordinateError, FetchError, InsufficientDataError, NotFoundError, RefreshError};
pub use geolocation::{DistressAlert, LocationFix, Origin, OriginSource};
pub use model::{ConditionSnapshot, Coordinate, Location, LocationId, Reading, SafetyTier};
pub use provider::{ConditionProvider, provider_from_config};
pub use registry::{LocationRegistry, RefreshOutcome, RefreshReport};
pub use session::{Command, Notice, NoticeLevel, Session, SessionEvent};
pub use stations::{CoastalStation, StationDistance, haversine_km, nearest_stations};
pub use view::{ListPanel, MarkerBackend, MarkerSync, ViewEvent, ViewSync};
