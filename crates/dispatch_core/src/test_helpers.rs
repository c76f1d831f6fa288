//! Shared fixtures for unit and integration tests. Compiled behind the
//! `test-helpers` feature so integration tests and benches can reuse them.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::{Schedule, World};

use crate::clock::{CurrentEvent, Event, EventKind, EventSubject, SimulationClock};
use crate::controller::RideSessionController;
use crate::error::RideError;
use crate::geo::Coordinate;
use crate::location::{LocationSource, LocationSourceResource, SimulatedLocationSource};
use crate::notify::NotificationSink;
use crate::routing::{RouteLeg, RouteService, RouteServiceResource};
use crate::scenario::ScenarioParams;

/// The plaza; also where the default test device sits.
pub const TEST_ORIGIN: Coordinate = Coordinate::new(-7.4912, -38.9772);
pub const TEST_DESTINATION: Coordinate = Coordinate::new(-7.4800, -38.9700);

/// Runs `schedule` once with a synthesized current event at the clock's
/// present time. The scheduled queue is left untouched, so events the systems
/// enqueue can be asserted on afterwards.
pub fn run_current_event(
    world: &mut World,
    schedule: &mut Schedule,
    kind: EventKind,
    subject: Option<EventSubject>,
) {
    let timestamp = world.resource::<SimulationClock>().now();
    world.insert_resource(CurrentEvent(Event {
        timestamp,
        seq: 0,
        kind,
        subject,
    }));
    schedule.run(world);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Notification sink that records every message for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(NoticeLevel, String)>>>,
}

impl RecordingNotifier {
    /// Handle to the recorded messages; stays valid after the notifier is
    /// boxed into the world.
    pub fn handle(&self) -> Arc<Mutex<Vec<(NoticeLevel, String)>>> {
        Arc::clone(&self.messages)
    }

    fn record(&self, level: NoticeLevel, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock")
            .push((level, message.to_string()));
    }
}

impl NotificationSink for RecordingNotifier {
    fn info(&self, message: &str) {
        self.record(NoticeLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.record(NoticeLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.record(NoticeLevel::Error, message);
    }
}

/// Route collaborator with a scripted answer: every request succeeds with a
/// three-point polyline of the given length, or always fails.
#[derive(Debug)]
pub struct FixedRouteService {
    distance_meters: Option<f64>,
}

impl FixedRouteService {
    pub fn with_distance(distance_meters: f64) -> Self {
        Self {
            distance_meters: Some(distance_meters),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            distance_meters: None,
        }
    }
}

impl RouteService for FixedRouteService {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Option<RouteLeg> {
        let distance_meters = self.distance_meters?;
        let midpoint = Coordinate::new(
            (origin.latitude + destination.latitude) / 2.0,
            (origin.longitude + destination.longitude) / 2.0,
        );
        Some(RouteLeg {
            polyline: vec![origin, midpoint, destination],
            distance_meters,
            duration_label: "6 min".to_string(),
        })
    }
}

/// Location source backed by a shared handle so tests can feed the device
/// after the controller is built.
pub struct SharedLocationSource(pub Arc<Mutex<SimulatedLocationSource>>);

impl LocationSource for SharedLocationSource {
    fn current_position(&mut self) -> Result<Coordinate, RideError> {
        self.0.lock().expect("device lock").current_position()
    }

    fn drain_watch(&mut self) -> Vec<Coordinate> {
        self.0.lock().expect("device lock").drain_watch()
    }
}

/// Replaces the controller's location source with a shared simulated device
/// and returns the handle.
pub fn shared_device(
    controller: &mut RideSessionController,
    start: Coordinate,
) -> Arc<Mutex<SimulatedLocationSource>> {
    let handle = Arc::new(Mutex::new(SimulatedLocationSource::fixed(start)));
    controller
        .world
        .insert_resource(LocationSourceResource(Box::new(SharedLocationSource(
            Arc::clone(&handle),
        ))));
    handle
}

/// Replaces the controller's notification sink with a recording one and
/// returns the message handle.
pub fn recording_notifier(
    controller: &mut RideSessionController,
) -> Arc<Mutex<Vec<(NoticeLevel, String)>>> {
    let notifier = RecordingNotifier::default();
    let handle = notifier.handle();
    controller
        .world
        .insert_resource(crate::notify::NotificationSinkResource(Box::new(notifier)));
    handle
}

/// Controller wired for tests: device at [`TEST_ORIGIN`], jitter off, and a
/// route collaborator that always answers with `distance_meters`.
pub fn test_controller(distance_meters: f64) -> RideSessionController {
    let mut params = ScenarioParams::default();
    params.jitter.enabled = false;
    params.device_position = TEST_ORIGIN;
    let mut controller = RideSessionController::new(params);
    controller
        .world
        .insert_resource(RouteServiceResource(Box::new(
            FixedRouteService::with_distance(distance_meters),
        )));
    controller
}
