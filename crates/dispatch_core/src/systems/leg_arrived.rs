//! LegArrived system: phase transitions at the end of each animated leg.
//!
//! Pickup arrival hands straight off to the drop-off leg by requesting its
//! route; drop-off arrival completes the ride.

use bevy_ecs::prelude::{Res, ResMut};

use crate::animator::PathAnimator;
use crate::clock::{CurrentEvent, EventKind, EventSubject, LegKind, SimulationClock};
use crate::notify::NotificationSinkResource;
use crate::scenario::ScenarioParams;
use crate::session::{RidePhase, RideSession};

pub fn leg_arrived_system(
    event: Res<CurrentEvent>,
    params: Res<ScenarioParams>,
    notifier: Res<NotificationSinkResource>,
    mut clock: ResMut<SimulationClock>,
    mut session: ResMut<RideSession>,
    animator: Res<PathAnimator>,
) {
    if event.0.kind != EventKind::LegArrived {
        return;
    }
    let Some(EventSubject::Run(run)) = event.0.subject else {
        return;
    };
    if run != animator.run_id() {
        log::debug!("discarding stale arrival (run {run})");
        return;
    }

    match animator.leg() {
        LegKind::Pickup => {
            if session.phase != RidePhase::EnRouteToPickup {
                return;
            }
            session.phase = RidePhase::PassengerPickedUp;
            session.progress_percent = 0.0;
            // The trail drawn so far belongs to the approach; the drop-off
            // leg starts with a clean one.
            session.traveled_trail.clear();
            notifier.0.success("Passenger picked up.");
            clock.schedule_in(
                params.quote_latency_ms,
                EventKind::LegRouteResolved,
                Some(EventSubject::Leg {
                    kind: LegKind::Dropoff,
                    generation: session.generation,
                }),
            );
        }
        LegKind::Dropoff => {
            if session.phase != RidePhase::EnRouteToDestination {
                return;
            }
            session.phase = RidePhase::Completed;
            session.progress_percent = 100.0;
            session.quote = None;
            session.matched_driver = None;
            notifier.0.success("Ride finished.");
        }
    }
}
