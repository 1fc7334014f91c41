//! Wind/wave threshold rule that turns a snapshot into a [`SafetyTier`].
//!
//! The defaults follow maritime advisory practice: 37 km/h is the wind speed
//! at which squally-weather warnings go out to fishermen, and 2.5 m is the
//! rough-sea alert level for significant wave height.

use serde::{Deserialize, Serialize};

use crate::model::{ConditionSnapshot, SafetyTier};

/// Fraction of a limit above which conditions are already worth a caution.
pub const CAUTION_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyThresholds {
    #[serde(default = "default_wind_limit")]
    pub wind_limit_kmh: f64,
    #[serde(default = "default_wave_limit")]
    pub wave_limit_m: f64,
}

fn default_wind_limit() -> f64 {
    37.0
}

fn default_wave_limit() -> f64 {
    2.5
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self { wind_limit_kmh: default_wind_limit(), wave_limit_m: default_wave_limit() }
    }
}

impl SafetyThresholds {
    /// Classify raw readings. Never panics.
    ///
    /// An unknown wave height never contributes to the verdict; the tier then
    /// rests on wind alone. A NaN wave height counts as unknown. A NaN wind
    /// speed is unreadable wind and classifies as [`SafetyTier::Danger`].
    pub fn classify(&self, wind_speed_kmh: f64, wave_height_m: Option<f64>) -> SafetyTier {
        if wind_speed_kmh.is_nan() {
            return SafetyTier::Danger;
        }

        let wave_height_m = wave_height_m.filter(|wave| !wave.is_nan());
        let wave_exceeds = |limit: f64| wave_height_m.is_some_and(|wave| wave > limit);

        if wind_speed_kmh > self.wind_limit_kmh || wave_exceeds(self.wave_limit_m) {
            SafetyTier::Danger
        } else if wind_speed_kmh > self.wind_limit_kmh * CAUTION_RATIO
            || wave_exceeds(self.wave_limit_m * CAUTION_RATIO)
        {
            SafetyTier::Caution
        } else {
            SafetyTier::Safe
        }
    }

    pub fn classify_snapshot(&self, snapshot: &ConditionSnapshot) -> SafetyTier {
        self.classify(snapshot.wind_speed_kmh(), snapshot.wave_height_m())
    }
}

/// Classify with the default thresholds.
pub fn classify(wind_speed_kmh: f64, wave_height_m: Option<f64>) -> SafetyTier {
    SafetyThresholds::default().classify(wind_speed_kmh, wave_height_m)
}
