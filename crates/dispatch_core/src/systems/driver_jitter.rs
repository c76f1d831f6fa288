//! DriverJitter system: small periodic nudges to idle drivers so the map
//! does not look frozen between rides. The matched driver is left alone; its
//! position is owned by the animator while a leg is running.

use bevy_ecs::prelude::{Query, Res, ResMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::drivers::{DriverPosition, DriverProfile};
use crate::scenario::JitterParams;
use crate::session::RideSession;

pub fn driver_jitter_system(
    event: Res<CurrentEvent>,
    jitter: Res<JitterParams>,
    session: Res<RideSession>,
    mut clock: ResMut<SimulationClock>,
    mut drivers: Query<(&DriverProfile, &mut DriverPosition)>,
) {
    if event.0.kind != EventKind::DriverJitter {
        return;
    }
    if !jitter.enabled {
        return;
    }

    // Deterministic per event: same seed and same tick time, same nudges.
    let mut rng = StdRng::seed_from_u64(jitter.seed.wrapping_add(clock.now()));
    let magnitude = jitter.magnitude_degrees;
    for (profile, mut position) in drivers.iter_mut() {
        if session.matched_driver == Some(profile.id) {
            continue;
        }
        position.0.latitude += rng.gen_range(-magnitude..=magnitude);
        position.0.longitude += rng.gen_range(-magnitude..=magnitude);
    }

    clock.schedule_in(jitter.interval_ms, EventKind::DriverJitter, None);
}
