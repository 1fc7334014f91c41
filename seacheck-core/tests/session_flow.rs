//! End-to-end use of the public API: a session driven by commands, with a
//! list panel attached as the only view.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use seacheck_core::{
    Command, ConditionProvider, ConditionSnapshot, Coordinate, FetchError, ListPanel,
    LocationFix, LocationRegistry, SafetyThresholds, SafetyTier, Session, SessionEvent, ViewEvent,
    ViewSync,
};

/// Wind follows latitude so tiers are easy to pick; waves are unknown west of
/// the prime meridian.
#[derive(Debug, Default)]
struct LatitudeWind {
    outage: AtomicBool,
}

#[async_trait]
impl ConditionProvider for LatitudeWind {
    async fn fetch(&self, at: Coordinate) -> Result<ConditionSnapshot, FetchError> {
        if self.outage.load(Ordering::SeqCst) {
            return Err(FetchError::unreachable("provider down"));
        }
        let wave = (at.longitude() >= 0.0).then_some(0.5);
        ConditionSnapshot::new(at.latitude().abs(), wave, None)
    }
}

#[derive(Clone, Default)]
struct SharedPanel(Arc<Mutex<ListPanel>>);

impl ViewSync for SharedPanel {
    fn apply(&mut self, event: &ViewEvent) {
        self.0.lock().unwrap().apply(event);
    }
}

fn at(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

fn new_session() -> (Session<LatitudeWind>, SharedPanel) {
    let registry = LocationRegistry::new(LatitudeWind::default(), SafetyThresholds::default());
    let mut session = Session::new(registry, at(15.0, 75.0));
    let panel = SharedPanel::default();
    session.attach(Box::new(panel.clone()));
    (session, panel)
}

#[tokio::test]
async fn mark_compare_refresh_and_clear() {
    let (mut session, panel) = new_session();

    session.handle(Command::Locate(LocationFix::Resolved(at(20.0, 73.0)))).await;
    session.handle(Command::AddPoint { coordinate: at(10.0, 72.0), name: Some("Reef".into()) }).await;
    session.handle(Command::AddPoint { coordinate: at(5.0, -20.0), name: None }).await;

    let tiers: Vec<_> = session.registry().locations().iter().map(|l| l.tier()).collect();
    assert_eq!(tiers, vec![Some(SafetyTier::Safe); 3]);
    assert_eq!(panel.0.lock().unwrap().rows().len(), 3);
    assert!(panel.0.lock().unwrap().render_lines()[2].contains("waves N/A"));

    let events = session.handle(Command::Compare).await;
    let comparison = events
        .iter()
        .find_map(|e| match e {
            SessionEvent::Compared(c) => Some(c.clone()),
            _ => None,
        })
        .expect("comparison");
    assert_eq!(comparison.rows.len(), 3);
    assert_eq!(comparison.recommendation.name, "Current Location");

    session.registry().provider().outage.store(true, Ordering::SeqCst);
    let events = session.handle(Command::RefreshAll).await;
    let report = events
        .iter()
        .find_map(|e| match e {
            SessionEvent::Refreshed(r) => Some(r.clone()),
            _ => None,
        })
        .expect("refresh report");
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed_count(), 3);
    assert!(session.registry().locations().iter().all(|l| l.snapshot().is_some()));

    session.handle(Command::Clear).await;
    assert!(session.registry().is_empty());
    assert!(panel.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_id_commands_are_recoverable() {
    let (mut session, _) = new_session();
    let ghost = "loc-99".parse().unwrap();

    for command in [Command::Remove(ghost), Command::Refresh(ghost)] {
        let events = session.handle(command).await;
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Notice(n)] if n.is_dismissible()
        ));
    }
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn danger_location_is_never_recommended_over_safe_one() {
    let (mut session, _) = new_session();

    session.handle(Command::AddPoint { coordinate: at(45.0, 10.0), name: Some("Gale".into()) }).await;
    session.handle(Command::AddPoint { coordinate: at(30.0, 10.0), name: Some("Breezy".into()) }).await;
    session.handle(Command::AddPoint { coordinate: at(12.0, 10.0), name: Some("Calm".into()) }).await;

    let events = session.handle(Command::Compare).await;
    let Some(SessionEvent::Compared(cmp)) = events.into_iter().next() else {
        panic!("expected a comparison");
    };
    assert_eq!(cmp.recommendation.name, "Calm");
    assert_eq!(cmp.rows[0].tier, Some(SafetyTier::Danger));
    assert_eq!(cmp.rows[1].tier, Some(SafetyTier::Caution));
}
