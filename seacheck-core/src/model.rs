use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoordinateError, FetchError};

/// Opaque identifier of a tracked location. Issued by the registry from a
/// monotonic sequence, so an id is never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(u64);

impl LocationId {
    pub(crate) const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Position in the issuing sequence, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loc-{}", self.0)
    }
}

impl FromStr for LocationId {
    type Err = std::num::ParseIntError;

    /// Accepts both `loc-3` and a bare `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix("loc-").unwrap_or(s.trim());
        digits.parse().map(Self)
    }
}

#[derive(Debug, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

/// A validated WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// For literals known to be in range.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        write!(f, "{:.*}, {:.*}", precision, self.latitude, precision, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateError::Format(s.to_string()))?;

        let lat: f64 = lat.trim().parse().map_err(|_| CoordinateError::Format(s.to_string()))?;
        let lon: f64 = lon.trim().parse().map_err(|_| CoordinateError::Format(s.to_string()))?;

        Coordinate::new(lat, lon)
    }
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    wind_speed_kmh: f64,
    wave_height_m: Option<f64>,
    sea_temp_c: Option<f64>,
}

/// Point-in-time sea conditions at one coordinate.
///
/// Wave height and sea temperature are `None` when the provider has no value
/// (typically inland points). `None` is never the same thing as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct ConditionSnapshot {
    wind_speed_kmh: f64,
    wave_height_m: Option<f64>,
    sea_temp_c: Option<f64>,
}

impl ConditionSnapshot {
    /// Out-of-range readings are reported as a malformed provider response.
    pub fn new(
        wind_speed_kmh: f64,
        wave_height_m: Option<f64>,
        sea_temp_c: Option<f64>,
    ) -> Result<Self, FetchError> {
        if !wind_speed_kmh.is_finite() || wind_speed_kmh < 0.0 {
            return Err(FetchError::malformed(format!("wind speed {wind_speed_kmh} km/h")));
        }
        if let Some(wave) = wave_height_m
            && (!wave.is_finite() || wave < 0.0)
        {
            return Err(FetchError::malformed(format!("wave height {wave} m")));
        }
        if let Some(temp) = sea_temp_c
            && !temp.is_finite()
        {
            return Err(FetchError::malformed(format!("sea temperature {temp} °C")));
        }

        Ok(Self { wind_speed_kmh, wave_height_m, sea_temp_c })
    }

    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed_kmh
    }

    pub fn wave_height_m(&self) -> Option<f64> {
        self.wave_height_m
    }

    pub fn sea_temp_c(&self) -> Option<f64> {
        self.sea_temp_c
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.1} km/h", self.wind_speed_kmh)
    }

    #[must_use]
    pub fn format_wave(&self) -> String {
        format_optional(self.wave_height_m, "m")
    }

    #[must_use]
    pub fn format_sea_temp(&self) -> String {
        format_optional(self.sea_temp_c, "°C")
    }
}

impl TryFrom<RawSnapshot> for ConditionSnapshot {
    type Error = FetchError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        ConditionSnapshot::new(raw.wind_speed_kmh, raw.wave_height_m, raw.sea_temp_c)
    }
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1} {unit}"),
        None => "N/A".to_string(),
    }
}

/// Safety verdict for a snapshot. Ordered by severity: `Danger > Caution > Safe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyTier {
    Safe,
    Caution,
    Danger,
}

impl SafetyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "SAFE",
            SafetyTier::Caution => "CAUTION",
            SafetyTier::Danger => "DANGER",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "Good conditions for fishing.",
            SafetyTier::Caution => "Exercise extreme caution if fishing.",
            SafetyTier::Danger => "Do not go fishing. Dangerous conditions.",
        }
    }

    /// Short glyph for map markers and terminal rows.
    pub fn glyph(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "✅",
            SafetyTier::Caution => "⚠️",
            SafetyTier::Danger => "🚨",
        }
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The latest successful fetch for a location. Snapshot and tier travel
/// together so a tier can never outlive the snapshot it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub snapshot: ConditionSnapshot,
    pub tier: SafetyTier,
    pub fetched_at: DateTime<Utc>,
}

/// A tracked point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    coordinate: Coordinate,
    name: String,
    reading: Option<Reading>,
}

impl Location {
    pub(crate) fn new(id: LocationId, coordinate: Coordinate, name: String) -> Self {
        Self { id, coordinate, name, reading: None }
    }

    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    pub fn snapshot(&self) -> Option<&ConditionSnapshot> {
        self.reading.as_ref().map(|r| &r.snapshot)
    }

    pub fn tier(&self) -> Option<SafetyTier> {
        self.reading.as_ref().map(|r| r.tier)
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.reading.as_ref().map(|r| r.fetched_at)
    }

    pub(crate) fn set_reading(&mut self, reading: Reading) {
        self.reading = Some(reading);
    }
}
