//! The ordered set of tracked locations.
//!
//! Each provider fetch is the only suspension point. The async operations are
//! built from a synchronous prepare/complete pair so that a caller driving the
//! fetch itself can interleave other commands while it is in flight; the
//! complete step re-checks by id, so a removed location is never revived.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    classifier::SafetyThresholds,
    error::{FetchError, NotFoundError, RefreshError},
    model::{ConditionSnapshot, Coordinate, Location, LocationId, Reading},
    provider::ConditionProvider,
    view::ViewEvent,
};

/// A point waiting for its first fetch. Nothing is stored until it completes.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAdd {
    pub coordinate: Coordinate,
    pub name: Option<String>,
}

/// A refresh in flight for an existing location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRefresh {
    pub id: LocationId,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// The location was removed while the fetch was in flight.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRefresh {
    pub id: LocationId,
    #[serde(serialize_with = "serialize_display")]
    pub error: RefreshError,
}

fn serialize_display<S: serde::Serializer>(err: &RefreshError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// Result of a refresh-all pass. Failures are listed in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub succeeded: usize,
    pub failed: Vec<FailedRefresh>,
}

impl RefreshReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn failed_ids(&self) -> Vec<LocationId> {
        self.failed.iter().map(|f| f.id).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct LocationRegistry<P> {
    provider: P,
    thresholds: SafetyThresholds,
    locations: Vec<Location>,
    last_id: u64,
    events: Vec<ViewEvent>,
}

impl<P: ConditionProvider> LocationRegistry<P> {
    pub fn new(provider: P, thresholds: SafetyThresholds) -> Self {
        Self { provider, thresholds, locations: Vec::new(), last_id: 0, events: Vec::new() }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn thresholds(&self) -> SafetyThresholds {
        self.thresholds
    }

    /// Tracked locations, first-added first.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id() == id)
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// View notifications produced since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fetch conditions for `coordinate` and start tracking it.
    pub async fn add_from_point(
        &mut self,
        coordinate: Coordinate,
        name: Option<String>,
    ) -> Result<LocationId, FetchError> {
        let pending = self.prepare_add(coordinate, name);
        let result = self.provider.fetch(coordinate).await;
        self.complete_add(pending, result)
    }

    pub fn prepare_add(&self, coordinate: Coordinate, name: Option<String>) -> PendingAdd {
        debug!(lat = coordinate.latitude(), lon = coordinate.longitude(), "fetch pending for new point");
        PendingAdd { coordinate, name }
    }

    pub fn complete_add(
        &mut self,
        pending: PendingAdd,
        result: Result<ConditionSnapshot, FetchError>,
    ) -> Result<LocationId, FetchError> {
        let snapshot = result.inspect_err(|err| {
            warn!(
                lat = pending.coordinate.latitude(),
                lon = pending.coordinate.longitude(),
                %err,
                "fetch failed, point not added"
            );
        })?;

        self.last_id += 1;
        let id = LocationId::new(self.last_id);
        let name = pending.name.unwrap_or_else(|| format!("Location {}", id.sequence()));

        let mut location = Location::new(id, pending.coordinate, name);
        let reading = self.reading_for(snapshot);
        let tier = reading.tier;
        location.set_reading(reading);

        info!(%id, name = location.name(), %tier, "location added");

        self.events.push(ViewEvent::Added {
            id,
            name: location.name().to_string(),
            coordinate: location.coordinate(),
            tier,
            snapshot,
        });
        self.locations.push(location);

        Ok(id)
    }

    /// Stop tracking `id`. Succeeds at most once per id.
    pub fn remove(&mut self, id: LocationId) -> Result<Location, NotFoundError> {
        let index = self.index_of(id).ok_or(NotFoundError(id))?;
        let removed = self.locations.remove(index);

        info!(%id, name = removed.name(), "location removed");
        self.events.push(ViewEvent::Removed { id });

        Ok(removed)
    }

    /// Drop every location. Returns how many were removed; an empty registry
    /// is left untouched and produces no notification.
    pub fn clear(&mut self) -> usize {
        let count = self.locations.len();
        if count == 0 {
            return 0;
        }

        self.locations.clear();
        info!(count, "registry cleared");
        self.events.push(ViewEvent::Cleared);

        count
    }

    /// Re-fetch one location in place. On fetch failure the previous reading
    /// stays as the last known good value.
    pub async fn refresh_one(&mut self, id: LocationId) -> Result<(), RefreshError> {
        let pending = self.begin_refresh(id)?;
        let result = self.provider.fetch(pending.coordinate).await;

        match self.complete_refresh(pending, result)? {
            RefreshOutcome::Applied => Ok(()),
            RefreshOutcome::Discarded => Err(NotFoundError(id).into()),
        }
    }

    pub fn begin_refresh(&self, id: LocationId) -> Result<PendingRefresh, NotFoundError> {
        let location = self.get(id).ok_or(NotFoundError(id))?;
        debug!(%id, "refresh pending");
        Ok(PendingRefresh { id, coordinate: location.coordinate() })
    }

    pub fn complete_refresh(
        &mut self,
        pending: PendingRefresh,
        result: Result<ConditionSnapshot, FetchError>,
    ) -> Result<RefreshOutcome, RefreshError> {
        let id = pending.id;
        let Some(index) = self.index_of(id) else {
            debug!(%id, "late refresh result for removed location discarded");
            return Ok(RefreshOutcome::Discarded);
        };

        let snapshot = result.inspect_err(|err| {
            warn!(%id, %err, retryable = err.is_retryable(), "refresh failed, keeping last known conditions");
        })?;

        let reading = self.reading_for(snapshot);
        let tier = reading.tier;
        self.locations[index].set_reading(reading);

        debug!(%id, %tier, "location refreshed");
        self.events.push(ViewEvent::Updated { id, tier, snapshot });

        Ok(RefreshOutcome::Applied)
    }

    /// Refresh every location one after another. A failing fetch is recorded
    /// and the pass carries on with the next location.
    pub async fn refresh_all(&mut self) -> RefreshReport {
        let ids: Vec<LocationId> = self.locations.iter().map(Location::id).collect();
        let mut report = RefreshReport::default();

        for id in ids {
            match self.refresh_one(id).await {
                Ok(()) => report.succeeded += 1,
                Err(error) => report.failed.push(FailedRefresh { id, error }),
            }
        }

        info!(succeeded = report.succeeded, failed = report.failed_count(), "refresh pass finished");
        report
    }

    fn index_of(&self, id: LocationId) -> Option<usize> {
        self.locations.iter().position(|l| l.id() == id)
    }

    fn reading_for(&self, snapshot: ConditionSnapshot) -> Reading {
        Reading {
            tier: self.thresholds.classify_snapshot(&snapshot),
            snapshot,
            fetched_at: Utc::now(),
        }
    }
}
