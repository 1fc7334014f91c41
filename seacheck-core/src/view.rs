//! One-way notifications from the registry to whatever draws it.
//!
//! The registry only knows domain data. Renderers keep their own handles
//! (map markers, list rows) keyed by [`LocationId`] and update them from
//! [`ViewEvent`]s; nothing here ever calls back into the registry.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{ConditionSnapshot, Coordinate, LocationId, SafetyTier};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewEvent {
    Added {
        id: LocationId,
        name: String,
        coordinate: Coordinate,
        tier: SafetyTier,
        snapshot: ConditionSnapshot,
    },
    Updated {
        id: LocationId,
        tier: SafetyTier,
        snapshot: ConditionSnapshot,
    },
    Removed {
        id: LocationId,
    },
    Cleared,
}

impl ViewEvent {
    pub fn id(&self) -> Option<LocationId> {
        match self {
            ViewEvent::Added { id, .. } | ViewEvent::Updated { id, .. } | ViewEvent::Removed { id } => {
                Some(*id)
            }
            ViewEvent::Cleared => None,
        }
    }
}

/// Receiver of registry changes.
pub trait ViewSync {
    fn apply(&mut self, event: &ViewEvent);
}

/// A drawing surface that can place, restyle and drop markers.
pub trait MarkerBackend {
    type Handle;

    fn attach(&mut self, coordinate: Coordinate, tier: SafetyTier, name: &str) -> Self::Handle;
    fn restyle(&mut self, handle: &mut Self::Handle, tier: SafetyTier, snapshot: &ConditionSnapshot);
    fn detach(&mut self, handle: Self::Handle);
}

/// Keeps one backend marker per tracked location.
pub struct MarkerSync<B: MarkerBackend> {
    backend: B,
    markers: HashMap<LocationId, B::Handle>,
}

impl<B: MarkerBackend> MarkerSync<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, markers: HashMap::new() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn marker(&self, id: LocationId) -> Option<&B::Handle> {
        self.markers.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

impl<B: MarkerBackend> ViewSync for MarkerSync<B> {
    fn apply(&mut self, event: &ViewEvent) {
        match event {
            ViewEvent::Added { id, name, coordinate, tier, .. } => {
                let handle = self.backend.attach(*coordinate, *tier, name);
                if let Some(stale) = self.markers.insert(*id, handle) {
                    self.backend.detach(stale);
                }
            }
            ViewEvent::Updated { id, tier, snapshot } => {
                if let Some(handle) = self.markers.get_mut(id) {
                    self.backend.restyle(handle, *tier, snapshot);
                }
            }
            ViewEvent::Removed { id } => {
                if let Some(handle) = self.markers.remove(id) {
                    self.backend.detach(handle);
                }
            }
            ViewEvent::Cleared => {
                for (_, handle) in self.markers.drain() {
                    self.backend.detach(handle);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub id: LocationId,
    pub name: String,
    pub coordinate: Coordinate,
    pub tier: SafetyTier,
    pub snapshot: ConditionSnapshot,
}

impl ListRow {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {} [{}] at {:.3} | wind {} | waves {} | sea {}",
            self.tier.glyph(),
            self.name,
            self.tier,
            self.coordinate,
            self.snapshot.format_wind(),
            self.snapshot.format_wave(),
            self.snapshot.format_sea_temp(),
        )
    }
}

/// The location list, in registry order.
#[derive(Debug, Clone, Default)]
pub struct ListPanel {
    rows: Vec<ListRow>,
}

impl ListPanel {
    pub const EMPTY_HINT: &'static str =
        "Click on the map to add locations and see weather data here";

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return vec![Self::EMPTY_HINT.to_string()];
        }
        self.rows.iter().map(ListRow::summary).collect()
    }
}

impl ViewSync for ListPanel {
    fn apply(&mut self, event: &ViewEvent) {
        match event {
            ViewEvent::Added { id, name, coordinate, tier, snapshot } => self.rows.push(ListRow {
                id: *id,
                name: name.clone(),
                coordinate: *coordinate,
                tier: *tier,
                snapshot: *snapshot,
            }),
            ViewEvent::Updated { id, tier, snapshot } => {
                if let Some(row) = self.rows.iter_mut().find(|r| r.id == *id) {
                    row.tier = *tier;
                    row.snapshot = *snapshot;
                }
            }
            ViewEvent::Removed { id } => self.rows.retain(|r| r.id != *id),
            ViewEvent::Cleared => self.rows.clear(),
        }
    }
}
