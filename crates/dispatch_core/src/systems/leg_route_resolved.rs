//! LegRouteResolved system: receives the path for a pickup or drop-off leg
//! and starts the animator over it.

use bevy_ecs::prelude::{Res, ResMut};

use crate::animator::PathAnimator;
use crate::clock::{CurrentEvent, EventKind, EventSubject, LegKind, SimulationClock, TICK_MS};
use crate::routing::RouteServiceResource;
use crate::session::{RidePhase, RideSession};

pub fn leg_route_resolved_system(
    event: Res<CurrentEvent>,
    route_service: Res<RouteServiceResource>,
    mut clock: ResMut<SimulationClock>,
    mut session: ResMut<RideSession>,
    mut animator: ResMut<PathAnimator>,
) {
    if event.0.kind != EventKind::LegRouteResolved {
        return;
    }
    let Some(EventSubject::Leg { kind, generation }) = event.0.subject else {
        return;
    };
    if generation != session.generation {
        log::debug!("discarding stale leg route (generation {generation})");
        return;
    }

    let endpoints = match kind {
        LegKind::Pickup => session.vehicle_position.zip(session.origin),
        LegKind::Dropoff => session.origin.zip(session.destination),
    };
    let Some((from, to)) = endpoints else {
        return;
    };

    // A collaborator miss must not strand the ride; fall back to the bare leg.
    let path = route_service
        .0
        .route(from, to)
        .map(|leg| leg.polyline)
        .filter(|polyline| polyline.len() >= 2)
        .unwrap_or_else(|| vec![from, to]);

    session.phase = match kind {
        LegKind::Pickup => RidePhase::EnRouteToPickup,
        LegKind::Dropoff => RidePhase::EnRouteToDestination,
    };
    session.vehicle_position = Some(path[0]);
    session.progress_percent = 0.0;

    match animator.start(path, kind) {
        Ok(run) => {
            clock.schedule_in(TICK_MS, EventKind::AnimationTick, Some(EventSubject::Run(run)));
        }
        Err(_) => {
            // Already-arrived leg: complete immediately, zero ticks.
            clock.schedule_in(
                0,
                EventKind::LegArrived,
                Some(EventSubject::Run(animator.run_id())),
            );
        }
    }
}
