//! The ride session aggregate: one passenger, at most one active ride.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::drivers::DriverId;
use crate::geo::Coordinate;
use crate::routing::RouteQuote;

/// Discrete lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RidePhase {
    #[default]
    Idle,
    Quoting,
    Quoted,
    Confirmed,
    EnRouteToPickup,
    PassengerPickedUp,
    EnRouteToDestination,
    Completed,
}

impl RidePhase {
    /// Origin/destination edits are rejected from Confirmed onward; the UI
    /// disables the inputs and the controller enforces it independently.
    pub fn inputs_locked(&self) -> bool {
        !matches!(self, RidePhase::Idle | RidePhase::Quoting | RidePhase::Quoted)
    }
}

#[derive(Debug, Default, Resource)]
pub struct RideSession {
    pub phase: RidePhase,
    pub origin: Option<Coordinate>,
    pub origin_address: Option<String>,
    pub destination: Option<Coordinate>,
    pub destination_address: Option<String>,
    /// Present only in phases Quoted..EnRouteToDestination.
    pub quote: Option<RouteQuote>,
    /// Present only in phases Confirmed..EnRouteToDestination.
    pub matched_driver: Option<DriverId>,
    /// Live simulated vehicle position, present from Confirmed through
    /// Completed.
    pub vehicle_position: Option<Coordinate>,
    /// Marker rotation; keeps its last value across zero-delta steps.
    pub vehicle_heading: f64,
    /// Positions appended on every animation tick; reset per leg.
    pub traveled_trail: Vec<Coordinate>,
    /// Vertex-based fraction of the active leg consumed, in `[0, 100]`.
    pub progress_percent: f64,
    /// Bumped whenever origin or destination changes or the ride ends; async
    /// responses stamped with an older value are discarded as stale.
    pub generation: u64,
}

impl RideSession {
    /// Returns to Idle, discarding everything tied to the ride. The origin is
    /// kept; callers re-acquire it from the device when they want a fresh fix.
    pub fn reset_to_idle(&mut self) {
        self.phase = RidePhase::Idle;
        self.destination = None;
        self.destination_address = None;
        self.quote = None;
        self.matched_driver = None;
        self.vehicle_position = None;
        self.vehicle_heading = 0.0;
        self.traveled_trail.clear();
        self.progress_percent = 0.0;
        self.generation += 1;
    }

    pub fn snapshot(&self) -> RideSnapshot {
        RideSnapshot {
            phase: self.phase,
            origin: self.origin,
            origin_address: self.origin_address.clone(),
            destination: self.destination,
            destination_address: self.destination_address.clone(),
            quote: self.quote.clone(),
            matched_driver: self.matched_driver,
            vehicle_position: self.vehicle_position,
            vehicle_heading: self.vehicle_heading,
            traveled_trail: self.traveled_trail.clone(),
            progress_percent: self.progress_percent,
        }
    }
}

/// Immutable view of the session for view layers.
#[derive(Debug, Clone, Serialize)]
pub struct RideSnapshot {
    pub phase: RidePhase,
    pub origin: Option<Coordinate>,
    pub origin_address: Option<String>,
    pub destination: Option<Coordinate>,
    pub destination_address: Option<String>,
    pub quote: Option<RouteQuote>,
    pub matched_driver: Option<DriverId>,
    pub vehicle_position: Option<Coordinate>,
    pub vehicle_heading: f64,
    pub traveled_trail: Vec<Coordinate>,
    pub progress_percent: f64,
}
