//! Device position input and the distress alert built from it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Coordinate;

/// What the device reported when asked for its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationFix {
    Resolved(Coordinate),
    /// The user refused the permission prompt.
    Denied,
    /// The device has no positioning support.
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginSource {
    Device,
    Fallback,
}

/// Where the map is centered and where "here" is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Origin {
    pub coordinate: Coordinate,
    pub source: OriginSource,
}

impl Origin {
    /// A denied or missing fix never leaves the origin unset.
    pub fn resolve(fix: LocationFix, fallback: Coordinate) -> Self {
        match fix {
            LocationFix::Resolved(coordinate) => Self { coordinate, source: OriginSource::Device },
            LocationFix::Denied | LocationFix::Unsupported => {
                Self { coordinate: fallback, source: OriginSource::Fallback }
            }
        }
    }

    pub fn is_device(&self) -> bool {
        self.source == OriginSource::Device
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistressAlert {
    pub coordinate: Coordinate,
    pub issued_at: DateTime<Utc>,
}

impl DistressAlert {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate, issued_at: Utc::now() }
    }

    #[must_use]
    pub fn maps_link(&self) -> String {
        format!(
            "https://maps.google.com/?q={:.6},{:.6}",
            self.coordinate.latitude(),
            self.coordinate.longitude()
        )
    }

    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "EMERGENCY ALERT\n\nFisherman requesting assistance!\n\nLocation: {:.6}\nTime: {}\n\nGoogle Maps: {}",
            self.coordinate,
            self.issued_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.maps_link(),
        )
    }
}
