//! Scenario parameters and world construction for one passenger session.

use bevy_ecs::prelude::{Resource, World};
use serde::{Deserialize, Serialize};

use crate::animator::PathAnimator;
use crate::clock::SimulationClock;
use crate::drivers::{default_driver_seeds, spawn_driver_pool, DriverSeed};
use crate::fare::FareConfig;
use crate::geo::Coordinate;
use crate::geocode::{GeocoderResource, SimulatedGeocoder};
use crate::location::{LocationSourceResource, SimulatedLocationSource};
use crate::notify::{LogNotifier, NotificationSinkResource};
use crate::routing::{CachingRouteService, RouteServiceResource, SimulatedRouteService};
use crate::session::RideSession;

/// Default map center (the city plaza).
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(-7.491_248, -38.977_231);

/// Ambient wander of idle drivers between rides.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct JitterParams {
    pub enabled: bool,
    pub interval_ms: u64,
    /// Maximum offset per nudge, per axis, in degrees.
    pub magnitude_degrees: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl Default for JitterParams {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 4000,
            magnitude_degrees: 0.0004,
            seed: 42,
        }
    }
}

/// Tunable parameters for one dispatch session.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Simulated round-trip latency of the route collaborator (ms).
    pub quote_latency_ms: u64,
    pub jitter: JitterParams,
    pub fare: FareConfig,
    /// Driver pool; defaults to the three-moped fixture pool.
    pub drivers: Vec<DriverSeed>,
    /// Device position at session start.
    pub device_position: Coordinate,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            quote_latency_ms: 250,
            jitter: JitterParams::default(),
            fare: FareConfig::default(),
            drivers: default_driver_seeds(),
            device_position: DEFAULT_CENTER,
        }
    }
}

/// Builds a world holding every resource the session systems need, wired to
/// the simulated collaborator set, with the driver pool spawned.
pub fn build_session_world(params: &ScenarioParams) -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(RideSession::default());
    world.insert_resource(PathAnimator::default());
    world.insert_resource(params.fare);
    world.insert_resource(params.jitter);
    world.insert_resource(RouteServiceResource(Box::new(CachingRouteService::new(
        Box::new(SimulatedRouteService),
    ))));
    world.insert_resource(GeocoderResource(Box::new(
        SimulatedGeocoder::with_default_places(),
    )));
    world.insert_resource(LocationSourceResource(Box::new(
        SimulatedLocationSource::fixed(params.device_position),
    )));
    world.insert_resource(NotificationSinkResource(Box::new(LogNotifier)));
    spawn_driver_pool(&mut world, &params.drivers);
    world.insert_resource(params.clone());
    world
}
