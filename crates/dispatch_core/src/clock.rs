//! Discrete-event clock for the session.
//!
//! Every suspension point of the ride flow is a scheduled event: the route
//! collaborator "responding" after a simulated latency, each animation tick,
//! and the ambient driver jitter. Tests drive the clock directly instead of
//! waiting on wall time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::Resource;

/// Animation cadence: one vehicle advancement every 50 ms.
pub const TICK_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    /// A quote request's response has arrived.
    QuoteResolved,
    /// A pickup/drop-off leg route response has arrived.
    LegRouteResolved,
    /// Advance the path animator by one step.
    AnimationTick,
    /// The animator reached the final vertex of its leg.
    LegArrived,
    /// Nudge idle drivers' positions.
    DriverJitter,
}

/// Which leg of the ride a route response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegKind {
    Pickup,
    Dropoff,
}

/// Staleness stamp carried by asynchronous events. Responses stamped with an
/// outdated generation or animator run are silently discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSubject {
    /// Session generation the quote request was issued against.
    Generation(u64),
    /// Leg route request: leg plus the session generation at request time.
    Leg { kind: LegKind, generation: u64 },
    /// Animator run a tick or arrival belongs to.
    Run(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    /// Monotone sequence number; breaks timestamp ties so events pop in
    /// strict arrival order.
    pub seq: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp,
        // then FIFO within a timestamp.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event being processed by the current schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedules an event at an absolute simulation time.
    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp,
            seq,
            kind,
            subject,
        });
    }

    /// Schedules an event `delay_ms` after the current time.
    pub fn schedule_in(&mut self, delay_ms: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_at(self.now + delay_ms, kind, subject);
    }

    /// Pops the next event and advances the clock to its timestamp.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(10, EventKind::AnimationTick, None);
        clock.schedule_at(5, EventKind::QuoteResolved, None);
        clock.schedule_at(20, EventKind::DriverJitter, None);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(first.kind, EventKind::QuoteResolved);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20);
        assert_eq!(clock.now(), 20);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn equal_timestamps_pop_in_arrival_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(
            100,
            EventKind::QuoteResolved,
            Some(EventSubject::Generation(1)),
        );
        clock.schedule_at(
            100,
            EventKind::QuoteResolved,
            Some(EventSubject::Generation(2)),
        );

        let first = clock.pop_next().expect("first event");
        let second = clock.pop_next().expect("second event");
        assert_eq!(first.subject, Some(EventSubject::Generation(1)));
        assert_eq!(second.subject, Some(EventSubject::Generation(2)));
    }

    #[test]
    fn schedule_in_is_relative_to_now() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(30, EventKind::AnimationTick, None);
        clock.pop_next().expect("event");
        clock.schedule_in(TICK_MS, EventKind::AnimationTick, None);
        let next = clock.pop_next().expect("relative event");
        assert_eq!(next.timestamp, 30 + TICK_MS);
    }
}
