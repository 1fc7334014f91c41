use serde::Serialize;

use crate::{
    error::InsufficientDataError,
    model::{Location, LocationId, SafetyTier},
};

/// One line of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub id: LocationId,
    pub name: String,
    pub tier: Option<SafetyTier>,
    pub wind_speed_kmh: Option<f64>,
    pub wave_height_m: Option<f64>,
    pub sea_temp_c: Option<f64>,
}

impl ComparisonRow {
    fn from_location(location: &Location) -> Self {
        let snapshot = location.snapshot();
        Self {
            id: location.id(),
            name: location.name().to_string(),
            tier: location.tier(),
            wind_speed_kmh: snapshot.map(|s| s.wind_speed_kmh()),
            wave_height_m: snapshot.and_then(|s| s.wave_height_m()),
            sea_temp_c: snapshot.and_then(|s| s.sea_temp_c()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: LocationId,
    pub name: String,
    pub tier: SafetyTier,
}

impl Recommendation {
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} appears to have the best conditions for fishing.", self.name)
    }
}

/// Table in registry order plus the safest pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub recommendation: Recommendation,
}

/// Compare `locations` as given. The table is not re-sorted.
///
/// The recommendation walks the list left to right and only switches to a
/// later location when its tier is strictly safer, so among equally safe
/// locations the first one wins. Locations still waiting for conditions are
/// listed but cannot be recommended.
pub fn compare(locations: &[Location]) -> Result<Comparison, InsufficientDataError> {
    let classified: Vec<(&Location, SafetyTier)> =
        locations.iter().filter_map(|l| l.tier().map(|t| (l, t))).collect();

    if locations.len() < 2 || classified.len() < 2 {
        return Err(InsufficientDataError { available: classified.len() });
    }

    let (best, tier) = classified
        .into_iter()
        .reduce(|best, challenger| if challenger.1 < best.1 { challenger } else { best })
        .ok_or(InsufficientDataError { available: 0 })?;

    Ok(Comparison {
        rows: locations.iter().map(ComparisonRow::from_location).collect(),
        recommendation: Recommendation { id: best.id(), name: best.name().to_string(), tier },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classifier::SafetyThresholds,
        registry::LocationRegistry,
        testing::{ScriptedProvider, point, snapshot},
    };

    /// wind speeds mapping to SAFE / CAUTION / DANGER under default limits
    fn wind_for(tier: SafetyTier) -> f64 {
        match tier {
            SafetyTier::Safe => 10.0,
            SafetyTier::Caution => 30.0,
            SafetyTier::Danger => 45.0,
        }
    }

    async fn locations_with(tiers: &[SafetyTier]) -> Vec<Location> {
        let provider =
            ScriptedProvider::new(tiers.iter().map(|t| Ok(snapshot(wind_for(*t), Some(0.5)))));
        let mut reg = LocationRegistry::new(provider, SafetyThresholds::default());
        for (i, _) in tiers.iter().enumerate() {
            reg.add_from_point(point(10.0, 70.0 + i as f64), None).await.unwrap();
        }
        reg.locations().to_vec()
    }

    #[tokio::test]
    async fn first_safe_wins_over_later_safe() {
        use SafetyTier::*;
        let locs = locations_with(&[Caution, Safe, Safe]).await;

        let cmp = compare(&locs).unwrap();

        assert_eq!(cmp.recommendation.id, locs[1].id());
        assert_eq!(cmp.recommendation.tier, Safe);
    }

    #[tokio::test]
    async fn equal_tiers_keep_the_first() {
        use SafetyTier::*;
        let locs = locations_with(&[Danger, Danger, Danger]).await;
        assert_eq!(compare(&locs).unwrap().recommendation.id, locs[0].id());
    }

    #[tokio::test]
    async fn caution_beats_danger() {
        use SafetyTier::*;
        let locs = locations_with(&[Danger, Caution, Danger, Caution]).await;
        assert_eq!(compare(&locs).unwrap().recommendation.id, locs[1].id());
    }

    #[tokio::test]
    async fn rows_keep_registry_order() {
        use SafetyTier::*;
        let locs = locations_with(&[Danger, Safe, Caution]).await;

        let cmp = compare(&locs).unwrap();

        let tiers: Vec<_> = cmp.rows.iter().map(|r| r.tier).collect();
        assert_eq!(tiers, vec![Some(Danger), Some(Safe), Some(Caution)]);
        assert_eq!(cmp.rows[0].wind_speed_kmh, Some(45.0));
        assert_eq!(cmp.rows[0].wave_height_m, Some(0.5));
        assert!(cmp.recommendation.message().contains("Location 2"));
    }

    #[tokio::test]
    async fn one_location_is_insufficient() {
        let locs = locations_with(&[SafetyTier::Safe]).await;
        assert_eq!(compare(&locs), Err(InsufficientDataError { available: 1 }));
    }

    #[test]
    fn no_locations_is_insufficient() {
        assert_eq!(compare(&[]), Err(InsufficientDataError { available: 0 }));
    }
}
