//! Command/event front of the registry.
//!
//! A [`Session`] is the explicit context the caller owns: it holds the
//! registry, the map origin and the attached views. Input triggers become
//! [`Command`]s; everything that happened comes back as [`SessionEvent`]s.

use serde::Serialize;
use tracing::debug;

use crate::{
    comparison::{Comparison, compare},
    geolocation::{DistressAlert, LocationFix, Origin},
    model::{Coordinate, LocationId},
    provider::ConditionProvider,
    registry::{LocationRegistry, RefreshReport},
    view::{ViewEvent, ViewSync},
};

pub const CURRENT_LOCATION_NAME: &str = "Current Location";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddPoint { coordinate: Coordinate, name: Option<String> },
    Remove(LocationId),
    Clear,
    Refresh(LocationId),
    RefreshAll,
    Compare,
    Locate(LocationFix),
    Distress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info<S: Into<String>>(message: S) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    /// Errors stay until dismissed; info notices fade on their own.
    pub fn is_dismissible(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Centered(Origin),
    View(ViewEvent),
    Refreshed(RefreshReport),
    Compared(Comparison),
    Distress(DistressAlert),
    Notice(Notice),
}

pub struct Session<P> {
    registry: LocationRegistry<P>,
    default_center: Coordinate,
    origin: Option<Origin>,
    views: Vec<Box<dyn ViewSync + Send>>,
}

impl<P: ConditionProvider> Session<P> {
    pub fn new(registry: LocationRegistry<P>, default_center: Coordinate) -> Self {
        Self { registry, default_center, origin: None, views: Vec::new() }
    }

    pub fn attach(&mut self, view: Box<dyn ViewSync + Send>) {
        self.views.push(view);
    }

    pub fn registry(&self) -> &LocationRegistry<P> {
        &self.registry
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    pub async fn handle(&mut self, command: Command) -> Vec<SessionEvent> {
        debug!(?command, "handling command");

        let mut lead = Vec::new();
        let mut trail = Vec::new();

        match command {
            Command::AddPoint { coordinate, name } => {
                trail.push(self.add_point(coordinate, name).await);
            }
            Command::Remove(id) => {
                let notice = match self.registry.remove(id) {
                    Ok(removed) => Notice::info(format!("{} removed", removed.name())),
                    Err(err) => Notice::error(err.user_message()),
                };
                trail.push(SessionEvent::Notice(notice));
            }
            Command::Clear => {
                let notice = match self.registry.clear() {
                    0 => Notice::info("No locations to clear"),
                    _ => Notice::info("All locations cleared"),
                };
                trail.push(SessionEvent::Notice(notice));
            }
            Command::Refresh(id) => {
                let notice = match self.registry.refresh_one(id).await {
                    Ok(()) => {
                        let name = self.registry.get(id).map(|l| l.name().to_string());
                        Notice::info(format!("{} refreshed", name.unwrap_or_else(|| id.to_string())))
                    }
                    Err(err) => Notice::error(err.user_message()),
                };
                trail.push(SessionEvent::Notice(notice));
            }
            Command::RefreshAll => {
                if self.registry.is_empty() {
                    trail.push(SessionEvent::Notice(Notice::info("No data to refresh")));
                } else {
                    let report = self.registry.refresh_all().await;
                    let notice = if report.is_clean() {
                        Notice::info("All weather data refreshed!")
                    } else {
                        Notice::error(format!(
                            "Failed to refresh {} of {} locations",
                            report.failed_count(),
                            report.attempted()
                        ))
                    };
                    trail.push(SessionEvent::Refreshed(report));
                    trail.push(SessionEvent::Notice(notice));
                }
            }
            Command::Compare => {
                let event = match compare(self.registry.locations()) {
                    Ok(comparison) => SessionEvent::Compared(comparison),
                    Err(err) => SessionEvent::Notice(Notice::error(err.user_message())),
                };
                trail.push(event);
            }
            Command::Locate(fix) => {
                let origin = Origin::resolve(fix, self.default_center);
                self.origin = Some(origin);
                lead.push(SessionEvent::Centered(origin));

                match fix {
                    LocationFix::Resolved(coordinate) => {
                        trail.push(
                            self.add_point(coordinate, Some(CURRENT_LOCATION_NAME.to_string())).await,
                        );
                    }
                    LocationFix::Denied => trail.push(SessionEvent::Notice(Notice::error(
                        "Location access denied. Enable GPS for personalized weather data.",
                    ))),
                    LocationFix::Unsupported => trail.push(SessionEvent::Notice(Notice::error(
                        "Geolocation not supported on this device.",
                    ))),
                }
            }
            Command::Distress => {
                let event = match self.origin {
                    Some(origin) if origin.is_device() => {
                        SessionEvent::Distress(DistressAlert::new(origin.coordinate))
                    }
                    _ => SessionEvent::Notice(Notice::error(
                        "Location unavailable. Please enable GPS and refresh.",
                    )),
                };
                trail.push(event);
            }
        }

        let view_events = self.registry.take_events();
        for event in &view_events {
            for view in &mut self.views {
                view.apply(event);
            }
        }

        lead.extend(view_events.into_iter().map(SessionEvent::View));
        lead.extend(trail);
        lead
    }

    async fn add_point(&mut self, coordinate: Coordinate, name: Option<String>) -> SessionEvent {
        let notice = match self.registry.add_from_point(coordinate, name).await {
            Ok(id) => {
                let name = self.registry.get(id).map(|l| l.name().to_string()).unwrap_or_default();
                Notice::info(format!("Weather data loaded for {name}"))
            }
            Err(err) => Notice::error(err.user_message()),
        };
        SessionEvent::Notice(notice)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        classifier::SafetyThresholds,
        error::FetchError,
        geolocation::OriginSource,
        model::SafetyTier,
        testing::{ScriptedProvider, point, snapshot},
    };

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<ViewEvent>>>);

    impl ViewSync for Recorder {
        fn apply(&mut self, event: &ViewEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn session(
        results: Vec<Result<crate::ConditionSnapshot, FetchError>>,
    ) -> (Session<ScriptedProvider>, Recorder) {
        let registry =
            LocationRegistry::new(ScriptedProvider::new(results), SafetyThresholds::default());
        let mut session = Session::new(registry, point(15.0, 75.0));
        let recorder = Recorder::default();
        session.attach(Box::new(recorder.clone()));
        (session, recorder)
    }

    fn notices(events: &[SessionEvent]) -> Vec<&Notice> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn add_point_emits_view_event_then_notice() {
        let (mut s, rec) = session(vec![Ok(snapshot(10.0, Some(0.4)))]);

        let events = s.handle(Command::AddPoint { coordinate: point(14.0, 74.0), name: None }).await;

        assert!(matches!(events[0], SessionEvent::View(ViewEvent::Added { tier: SafetyTier::Safe, .. })));
        assert_eq!(notices(&events)[0].message, "Weather data loaded for Location 1");
        assert_eq!(rec.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_a_dismissible_notice() {
        let (mut s, rec) = session(vec![Err(FetchError::unreachable("offline"))]);

        let events = s.handle(Command::AddPoint { coordinate: point(14.0, 74.0), name: None }).await;

        assert_eq!(events.len(), 1);
        assert!(notices(&events)[0].is_dismissible());
        assert!(s.registry().is_empty());
        assert!(rec.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_twice_reports_once() {
        let (mut s, rec) = session(vec![Ok(snapshot(10.0, None))]);
        s.handle(Command::AddPoint { coordinate: point(14.0, 74.0), name: Some("Bay".into()) }).await;
        let id = s.registry().locations()[0].id();

        let first = s.handle(Command::Remove(id)).await;
        let second = s.handle(Command::Remove(id)).await;

        assert_eq!(notices(&first)[0].message, "Bay removed");
        assert_eq!(notices(&second)[0].level, NoticeLevel::Error);
        let removed = rec.0.lock().unwrap().iter().filter(|e| matches!(e, ViewEvent::Removed { .. })).count();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn clear_on_empty_is_a_noop() {
        let (mut s, rec) = session(vec![]);
        let events = s.handle(Command::Clear).await;

        assert_eq!(notices(&events)[0].message, "No locations to clear");
        assert!(rec.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn compare_needs_two_locations() {
        let (mut s, _) = session(vec![Ok(snapshot(10.0, None))]);
        s.handle(Command::AddPoint { coordinate: point(14.0, 74.0), name: None }).await;
        let before = s.registry().locations().to_vec();

        let events = s.handle(Command::Compare).await;

        assert_eq!(notices(&events)[0].message, "Add at least 2 locations to compare");
        assert_eq!(s.registry().locations(), before.as_slice());
    }

    #[tokio::test]
    async fn refresh_all_reports_partial_failure() {
        let (mut s, _) = session(vec![
            Ok(snapshot(10.0, None)),
            Ok(snapshot(10.0, None)),
            Err(FetchError::unreachable("timeout")),
            Ok(snapshot(12.0, None)),
        ]);
        s.handle(Command::AddPoint { coordinate: point(14.0, 74.0), name: None }).await;
        s.handle(Command::AddPoint { coordinate: point(13.0, 74.0), name: None }).await;

        let events = s.handle(Command::RefreshAll).await;

        let report = events
            .iter()
            .find_map(|e| match e {
                SessionEvent::Refreshed(r) => Some(r.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed_ids(), vec![s.registry().locations()[0].id()]);
        assert_eq!(notices(&events)[0].message, "Failed to refresh 1 of 2 locations");
    }

    #[tokio::test]
    async fn denied_location_centers_on_default() {
        let (mut s, _) = session(vec![]);

        let events = s.handle(Command::Locate(LocationFix::Denied)).await;

        assert!(matches!(
            events[0],
            SessionEvent::Centered(Origin { source: OriginSource::Fallback, .. })
        ));
        assert_eq!(s.origin().unwrap().coordinate, point(15.0, 75.0));
        assert!(s.registry().is_empty());
        assert!(s.registry().provider().calls().is_empty());
    }

    #[tokio::test]
    async fn resolved_location_is_tracked_as_current() {
        let (mut s, _) = session(vec![Ok(snapshot(10.0, Some(1.0)))]);

        s.handle(Command::Locate(LocationFix::Resolved(point(9.9, 76.2)))).await;

        assert_eq!(s.registry().locations()[0].name(), CURRENT_LOCATION_NAME);
        assert!(s.origin().unwrap().is_device());
    }

    #[tokio::test]
    async fn distress_requires_device_position() {
        let (mut s, _) = session(vec![Ok(snapshot(10.0, None))]);

        let events = s.handle(Command::Distress).await;
        assert_eq!(notices(&events)[0].level, NoticeLevel::Error);

        s.handle(Command::Locate(LocationFix::Denied)).await;
        let events = s.handle(Command::Distress).await;
        assert_eq!(notices(&events)[0].level, NoticeLevel::Error);

        s.handle(Command::Locate(LocationFix::Resolved(point(9.9, 76.2)))).await;
        let events = s.handle(Command::Distress).await;
        assert!(matches!(events[0], SessionEvent::Distress(DistressAlert { .. })));
    }
}
