//! Session controller: the intent surface a view layer drives.
//!
//! The controller owns the world and the schedule. Intents (set a
//! destination, confirm a ride, end it) mutate the session synchronously and
//! schedule the asynchronous follow-ups on the clock; `step` pumps one
//! scheduled event through the systems.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::animator::PathAnimator;
use crate::clock::{CurrentEvent, Event, EventKind, EventSubject, LegKind, SimulationClock};
use crate::drivers::{self, DriverId, DriverProfile};
use crate::error::RideError;
use crate::geo::Coordinate;
use crate::geocode::GeocoderResource;
use crate::location::LocationSourceResource;
use crate::notify::NotificationSinkResource;
use crate::scenario::{build_session_world, ScenarioParams};
use crate::selection;
use crate::session::{RidePhase, RideSession, RideSnapshot};
use crate::systems::animation_tick::animation_tick_system;
use crate::systems::driver_jitter::driver_jitter_system;
use crate::systems::leg_arrived::leg_arrived_system;
use crate::systems::leg_route_resolved::leg_route_resolved_system;
use crate::systems::quote_resolved::quote_resolved_system;

// Condition functions for each event kind
fn is_quote_resolved(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::QuoteResolved)
        .unwrap_or(false)
}

fn is_leg_route_resolved(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::LegRouteResolved)
        .unwrap_or(false)
}

fn is_animation_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::AnimationTick)
        .unwrap_or(false)
}

fn is_leg_arrived(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::LegArrived)
        .unwrap_or(false)
}

fn is_driver_jitter(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DriverJitter)
        .unwrap_or(false)
}

/// Builds the schedule with one system per event kind, each gated on the
/// current event.
pub fn session_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        quote_resolved_system.run_if(is_quote_resolved),
        leg_route_resolved_system.run_if(is_leg_route_resolved),
        animation_tick_system.run_if(is_animation_tick),
        leg_arrived_system.run_if(is_leg_arrived),
        driver_jitter_system.run_if(is_driver_jitter),
    ));
    schedule
}

pub struct RideSessionController {
    pub world: World,
    pub schedule: Schedule,
}

impl RideSessionController {
    pub fn new(params: ScenarioParams) -> Self {
        let mut world = build_session_world(&params);
        if params.jitter.enabled {
            world
                .resource_mut::<SimulationClock>()
                .schedule_in(params.jitter.interval_ms, EventKind::DriverJitter, None);
        }
        let mut controller = Self {
            world,
            schedule: session_schedule(),
        };
        controller.use_device_location();
        controller
    }

    // ---- intents -----------------------------------------------------

    /// Reads the device position and makes it the origin. A denied or failed
    /// read leaves the origin untouched and tells the passenger. Ignored once
    /// the ride is confirmed.
    pub fn use_device_location(&mut self) {
        if self.world.resource::<RideSession>().phase.inputs_locked() {
            log::debug!("origin edit ignored; ride in progress");
            return;
        }
        let fix = self
            .world
            .resource_mut::<LocationSourceResource>()
            .0
            .current_position();
        match fix {
            Ok(position) => self.apply_origin(position),
            Err(error) => {
                log::debug!("device location unavailable: {error}");
                self.notify_error("Could not get your location; please enter the origin manually.");
            }
        }
    }

    /// Sets the origin from a map pick. Ignored once the ride is confirmed.
    pub fn set_origin(&mut self, position: Coordinate) {
        if self.world.resource::<RideSession>().phase.inputs_locked() {
            log::debug!("origin edit ignored; ride in progress");
            return;
        }
        self.apply_origin(position);
    }

    /// Sets the origin from a typed address via the geocoding collaborator.
    pub fn set_origin_address(&mut self, address: &str) {
        if self.world.resource::<RideSession>().phase.inputs_locked() {
            log::debug!("origin edit ignored; ride in progress");
            return;
        }
        let position = self.world.resource::<GeocoderResource>().0.forward(address);
        match position {
            Some(position) => self.apply_origin(position),
            None => self.notify_error("Address not found."),
        }
    }

    /// Sets the destination from a map pick. Ignored once the ride is
    /// confirmed. Quoting starts immediately when the origin is known.
    pub fn set_destination(&mut self, position: Coordinate) {
        if self.world.resource::<RideSession>().phase.inputs_locked() {
            log::debug!("destination edit ignored; ride in progress");
            return;
        }
        let address = self.world.resource::<GeocoderResource>().0.reverse(position);
        {
            let mut session = self.world.resource_mut::<RideSession>();
            session.destination = Some(position);
            session.destination_address = address;
            session.quote = None;
            session.traveled_trail.clear();
            session.progress_percent = 0.0;
        }
        if self.world.resource::<RideSession>().origin.is_some() {
            self.begin_quote();
        }
    }

    /// Sets the destination from a typed address.
    pub fn set_destination_address(&mut self, address: &str) {
        if self.world.resource::<RideSession>().phase.inputs_locked() {
            log::debug!("destination edit ignored; ride in progress");
            return;
        }
        let position = self.world.resource::<GeocoderResource>().0.forward(address);
        match position {
            Some(position) => self.set_destination(position),
            None => self.notify_error("Address not found."),
        }
    }

    /// Confirms the quoted ride, dispatching `preferred` when given and the
    /// nearest driver otherwise.
    pub fn confirm_ride(&mut self, preferred: Option<DriverId>) -> Result<(), RideError> {
        if self.world.resource::<RideSession>().phase != RidePhase::Quoted {
            log::debug!("confirm ignored; no quote to confirm");
            return Ok(());
        }
        let pool = drivers::roster(&mut self.world);
        if pool.is_empty() {
            self.notify_error("No drivers available right now.");
            return Ok(());
        }
        let Some(origin) = self.world.resource::<RideSession>().origin else {
            return Ok(());
        };
        let chosen = match preferred {
            Some(id) => match selection::explicit(id, &pool) {
                Ok(id) => id,
                Err(error) => {
                    log::error!("driver selection failed: {error}");
                    return Err(error);
                }
            },
            // The pool is non-empty, so a nearest driver always exists.
            None => match selection::nearest(origin, &pool) {
                Some(id) => id,
                None => return Ok(()),
            },
        };
        let start = pool
            .iter()
            .find(|(id, _)| *id == chosen)
            .map(|(_, position)| *position);

        let generation = {
            let mut session = self.world.resource_mut::<RideSession>();
            session.phase = RidePhase::Confirmed;
            session.matched_driver = Some(chosen);
            session.vehicle_position = start;
            session.traveled_trail.clear();
            session.progress_percent = 0.0;
            session.generation
        };
        self.notify_info("Moped on the way to pick you up...");

        let latency = self.world.resource::<ScenarioParams>().quote_latency_ms;
        self.world.resource_mut::<SimulationClock>().schedule_in(
            latency,
            EventKind::LegRouteResolved,
            Some(EventSubject::Leg {
                kind: LegKind::Pickup,
                generation,
            }),
        );
        Ok(())
    }

    /// Ends the ride (or abandons the quote) and returns to Idle, then
    /// re-reads the device position for a fresh origin.
    pub fn end_ride(&mut self) {
        if self.world.resource::<RideSession>().phase == RidePhase::Idle {
            return;
        }
        self.world.resource_mut::<PathAnimator>().cancel();
        self.world.resource_mut::<RideSession>().reset_to_idle();
        self.use_device_location();
    }

    /// Drains queued device position updates, applying only the most recent
    /// one, and only while origin edits are still allowed.
    pub fn pump_location_watch(&mut self) {
        let latest = self
            .world
            .resource_mut::<LocationSourceResource>()
            .0
            .drain_watch()
            .pop();
        let Some(position) = latest else {
            return;
        };
        if self.world.resource::<RideSession>().phase.inputs_locked() {
            return;
        }
        self.apply_origin(position);
    }

    fn apply_origin(&mut self, position: Coordinate) {
        let address = self.world.resource::<GeocoderResource>().0.reverse(position);
        let has_destination = {
            let mut session = self.world.resource_mut::<RideSession>();
            session.origin = Some(position);
            session.origin_address = address;
            session.destination.is_some()
        };
        if has_destination && !self.world.resource::<RideSession>().phase.inputs_locked() {
            self.begin_quote();
        }
    }

    /// Issues a quote request stamped with a fresh generation; any response
    /// still in flight for the previous endpoints becomes stale.
    fn begin_quote(&mut self) {
        let generation = {
            let mut session = self.world.resource_mut::<RideSession>();
            session.phase = RidePhase::Quoting;
            session.quote = None;
            session.generation += 1;
            session.generation
        };
        let latency = self.world.resource::<ScenarioParams>().quote_latency_ms;
        self.world.resource_mut::<SimulationClock>().schedule_in(
            latency,
            EventKind::QuoteResolved,
            Some(EventSubject::Generation(generation)),
        );
    }

    // ---- event pump --------------------------------------------------

    /// Pops and processes the next scheduled event. Returns it, or `None`
    /// when the queue is empty.
    pub fn step(&mut self) -> Option<Event> {
        let event = self.world.resource_mut::<SimulationClock>().pop_next()?;
        self.world.insert_resource(CurrentEvent(event));
        self.schedule.run(&mut self.world);
        Some(event)
    }

    /// Like [`step`](Self::step), calling `hook` with the post-event snapshot.
    pub fn step_with_hook(&mut self, mut hook: impl FnMut(&RideSnapshot, &Event)) -> Option<Event> {
        let event = self.step()?;
        let snapshot = self.snapshot();
        hook(&snapshot, &event);
        Some(event)
    }

    /// Pumps events until the queue drains or `max_steps` is hit. Returns the
    /// number of events processed. Recurring events (jitter, ticks) keep the
    /// queue busy, so callers bound the run.
    pub fn run_until_settled(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.step().is_some() {
            steps += 1;
        }
        steps
    }

    /// Pumps events until `predicate` accepts the snapshot. Returns `false`
    /// when the queue drained or `max_steps` elapsed first.
    pub fn run_until(
        &mut self,
        predicate: impl Fn(&RideSnapshot) -> bool,
        max_steps: usize,
    ) -> bool {
        for _ in 0..max_steps {
            if predicate(&self.snapshot()) {
                return true;
            }
            if self.step().is_none() {
                return false;
            }
        }
        predicate(&self.snapshot())
    }

    // ---- views -------------------------------------------------------

    pub fn snapshot(&self) -> RideSnapshot {
        self.world.resource::<RideSession>().snapshot()
    }

    pub fn now_ms(&self) -> u64 {
        self.world.resource::<SimulationClock>().now()
    }

    pub fn driver_roster(&mut self) -> Vec<(DriverId, Coordinate)> {
        drivers::roster(&mut self.world)
    }

    pub fn driver_profiles(&mut self) -> Vec<DriverProfile> {
        drivers::profiles(&mut self.world)
    }

    // ---- notifications -----------------------------------------------

    fn notify_info(&self, message: &str) {
        self.world.resource::<NotificationSinkResource>().0.info(message);
    }

    fn notify_error(&self, message: &str) {
        self.world.resource::<NotificationSinkResource>().0.error(message);
    }
}
