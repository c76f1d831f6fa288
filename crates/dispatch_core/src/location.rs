//! Device location collaborator: one-shot reads plus a simple watch stream.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;

use crate::error::RideError;
use crate::geo::Coordinate;

pub trait LocationSource: Send + Sync {
    /// Latest known device position, or [`RideError::PermissionDenied`].
    fn current_position(&mut self) -> Result<Coordinate, RideError>;

    /// Drains positions received since the last call, in receipt order.
    /// Consumers should apply only the last one.
    fn drain_watch(&mut self) -> Vec<Coordinate>;
}

/// ECS resource wrapping a boxed location source.
#[derive(Resource)]
pub struct LocationSourceResource(pub Box<dyn LocationSource>);

/// Scripted device location for the simulation and tests.
#[derive(Debug, Default)]
pub struct SimulatedLocationSource {
    position: Option<Coordinate>,
    pending: VecDeque<Coordinate>,
    permission_granted: bool,
}

impl SimulatedLocationSource {
    pub fn fixed(position: Coordinate) -> Self {
        Self {
            position: Some(position),
            pending: VecDeque::new(),
            permission_granted: true,
        }
    }

    /// A device that refuses location access.
    pub fn denied() -> Self {
        Self::default()
    }

    /// Queues a watch update, as if the device moved.
    pub fn push_position(&mut self, position: Coordinate) {
        self.pending.push_back(position);
    }
}

impl LocationSource for SimulatedLocationSource {
    fn current_position(&mut self) -> Result<Coordinate, RideError> {
        if !self.permission_granted {
            return Err(RideError::PermissionDenied);
        }
        if let Some(last) = self.pending.back() {
            self.position = Some(*last);
        }
        self.position.ok_or(RideError::PermissionDenied)
    }

    fn drain_watch(&mut self) -> Vec<Coordinate> {
        let drained: Vec<Coordinate> = self.pending.drain(..).collect();
        if let Some(last) = drained.last() {
            self.position = Some(*last);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_source_reports_permission_denied() {
        let mut source = SimulatedLocationSource::denied();
        assert_eq!(
            source.current_position().expect_err("denied"),
            RideError::PermissionDenied
        );
    }

    #[test]
    fn watch_drains_in_receipt_order_and_updates_current() {
        let mut source = SimulatedLocationSource::fixed(Coordinate::new(0.0, 0.0));
        source.push_position(Coordinate::new(1.0, 1.0));
        source.push_position(Coordinate::new(2.0, 2.0));

        let drained = source.drain_watch();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], Coordinate::new(1.0, 1.0));
        assert_eq!(drained[1], Coordinate::new(2.0, 2.0));

        assert_eq!(
            source.current_position().expect("granted"),
            Coordinate::new(2.0, 2.0)
        );
        assert!(source.drain_watch().is_empty());
    }
}
