//! AnimationTick system: advances the vehicle one step along the active leg
//! and mirrors the new position onto the matched driver entity.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::animator::{PathAnimator, TickOutcome};
use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock, TICK_MS};
use crate::drivers::{DriverPosition, DriverProfile};
use crate::geo::Coordinate;
use crate::session::RideSession;

pub fn animation_tick_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut session: ResMut<RideSession>,
    mut animator: ResMut<PathAnimator>,
    mut drivers: Query<(&DriverProfile, &mut DriverPosition)>,
) {
    if event.0.kind != EventKind::AnimationTick {
        return;
    }
    let Some(EventSubject::Run(run)) = event.0.subject else {
        return;
    };
    if run != animator.run_id() {
        log::debug!("discarding stale animation tick (run {run})");
        return;
    }
    let Some(outcome) = animator.advance() else {
        return;
    };

    let (position, heading, arrived) = match outcome {
        TickOutcome::Moved {
            position,
            heading_degrees,
            progress_percent,
        } => {
            session.progress_percent = progress_percent;
            (position, heading_degrees, false)
        }
        TickOutcome::Arrived {
            position,
            heading_degrees,
        } => {
            session.progress_percent = 100.0;
            (position, heading_degrees, true)
        }
    };

    session.vehicle_position = Some(position);
    session.vehicle_heading = heading;
    push_trail(&mut session, position);

    if let Some(matched) = session.matched_driver {
        for (profile, mut driver_position) in drivers.iter_mut() {
            if profile.id == matched {
                driver_position.0 = position;
            }
        }
    }

    if arrived {
        clock.schedule_in(0, EventKind::LegArrived, Some(EventSubject::Run(run)));
    } else {
        clock.schedule_in(TICK_MS, EventKind::AnimationTick, Some(EventSubject::Run(run)));
    }
}

// The trail is what the map draws behind the vehicle; skip exact repeats so
// it stays proportional to actual movement.
fn push_trail(session: &mut RideSession, position: Coordinate) {
    if session.traveled_trail.last() != Some(&position) {
        session.traveled_trail.push(position);
    }
}
