//! Step-wise vehicle animation along a polyline.
//!
//! The animator holds the cursor for the single active leg: current position,
//! polyline segment index and heading. It is advanced by `AnimationTick`
//! events at a fixed cadence; each advancement moves the vehicle by at most a
//! fixed per-tick step on each axis. Progress is measured in polyline
//! vertices consumed, not arc length, which matches the pacing of the map
//! marker it models.

use bevy_ecs::prelude::Resource;

use crate::clock::LegKind;
use crate::error::RideError;
use crate::geo::{self, Coordinate};

/// Per-tick step magnitude in degrees on each axis.
pub const STEP_DEGREES: f64 = 0.000_05;

/// A vertex counts as reached when both axes are within this range.
pub const ARRIVAL_EPSILON: f64 = 0.000_01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Result of advancing the animator by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Vehicle moved; another tick should be scheduled.
    Moved {
        position: Coordinate,
        heading_degrees: f64,
        progress_percent: f64,
    },
    /// Final vertex reached; the run is complete and no further ticks fire.
    Arrived {
        position: Coordinate,
        heading_degrees: f64,
    },
}

#[derive(Debug, Resource)]
pub struct PathAnimator {
    state: AnimatorState,
    run_id: u64,
    leg: LegKind,
    path: Vec<Coordinate>,
    segment_index: usize,
    position: Coordinate,
    heading_degrees: f64,
}

impl Default for PathAnimator {
    fn default() -> Self {
        Self {
            state: AnimatorState::Idle,
            run_id: 0,
            leg: LegKind::Pickup,
            path: Vec::new(),
            segment_index: 0,
            position: Coordinate::new(0.0, 0.0),
            heading_degrees: 0.0,
        }
    }
}

impl PathAnimator {
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimatorState::Running
    }

    /// Identifier of the current run; ticks stamped with an older id are
    /// stale and must be dropped.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn leg(&self) -> LegKind {
        self.leg
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn heading_degrees(&self) -> f64 {
        self.heading_degrees
    }

    /// Begins a new run over `path`.
    ///
    /// Fails with [`RideError::DegeneratePath`] for paths shorter than two
    /// points; callers treat such a leg as already arrived (exactly one
    /// completion, zero ticks). A previous run must be cancelled first.
    pub fn start(&mut self, path: Vec<Coordinate>, leg: LegKind) -> Result<u64, RideError> {
        debug_assert!(
            self.state != AnimatorState::Running,
            "a leg is already running"
        );
        self.run_id += 1;
        self.leg = leg;
        self.segment_index = 0;
        if path.len() < 2 {
            self.state = AnimatorState::Completed;
            self.path = path;
            return Err(RideError::DegeneratePath);
        }
        self.position = path[0];
        self.path = path;
        self.state = AnimatorState::Running;
        Ok(self.run_id)
    }

    /// Advances one tick. Returns `None` when the animator is not running,
    /// so ticks left in the queue after a cancel are no-ops.
    pub fn advance(&mut self) -> Option<TickOutcome> {
        if self.state != AnimatorState::Running {
            return None;
        }
        let last = self.path.len() - 1;
        let from = self.path[self.segment_index];
        let to = self.path[self.segment_index + 1];
        if from != to {
            self.heading_degrees = geo::bearing_degrees(from, to);
        }
        self.position = geo::step_toward(self.position, to, STEP_DEGREES);
        let progress_percent =
            (self.segment_index + 1) as f64 / self.path.len() as f64 * 100.0;

        let reached = (self.position.latitude - to.latitude).abs() < ARRIVAL_EPSILON
            && (self.position.longitude - to.longitude).abs() < ARRIVAL_EPSILON;
        if reached {
            self.segment_index += 1;
            if self.segment_index >= last {
                self.state = AnimatorState::Completed;
                return Some(TickOutcome::Arrived {
                    position: self.position,
                    heading_degrees: self.heading_degrees,
                });
            }
        }
        Some(TickOutcome::Moved {
            position: self.position,
            heading_degrees: self.heading_degrees,
            progress_percent,
        })
    }

    /// Stops the current run and invalidates any ticks still queued for it.
    /// Idempotent: cancelling a non-running animator is a no-op.
    pub fn cancel(&mut self) {
        if self.state == AnimatorState::Running {
            self.state = AnimatorState::Cancelled;
            self.run_id += 1;
        }
    }
}
