//! Driver selection: nearest-by-planar-distance or an explicit rider pick.

use crate::drivers::DriverId;
use crate::error::RideError;
use crate::geo::{self, Coordinate};

/// Picks the driver closest to `origin`. Ties resolve to the first pool entry
/// holding the minimum distance, so equal-distance pools select
/// deterministically.
pub fn nearest(origin: Coordinate, pool: &[(DriverId, Coordinate)]) -> Option<DriverId> {
    let mut best: Option<(DriverId, f64)> = None;
    for (id, position) in pool {
        let candidate = geo::distance(origin, *position);
        match best {
            Some((_, current)) if candidate >= current => {}
            _ => best = Some((*id, candidate)),
        }
    }
    best.map(|(id, _)| id)
}

/// Validates an explicit pick from a driver marker or card.
pub fn explicit(id: DriverId, pool: &[(DriverId, Coordinate)]) -> Result<DriverId, RideError> {
    if pool.iter().any(|(candidate, _)| *candidate == id) {
        Ok(id)
    } else {
        Err(RideError::InvalidDriver(id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<(DriverId, Coordinate)> {
        vec![
            (DriverId(0), Coordinate::new(-7.4905, -38.9760)),
            (DriverId(1), Coordinate::new(-7.4920, -38.9780)),
            (DriverId(2), Coordinate::new(-7.4910, -38.9795)),
        ]
    }

    #[test]
    fn nearest_picks_the_closest_driver() {
        let origin = Coordinate::new(-7.4912, -38.9772);
        assert_eq!(nearest(origin, &pool()), Some(DriverId(1)));
    }

    #[test]
    fn nearest_breaks_ties_toward_the_lower_index() {
        let origin = Coordinate::new(0.0, 0.0);
        let equidistant = vec![
            (DriverId(0), Coordinate::new(0.0, 1.0)),
            (DriverId(1), Coordinate::new(1.0, 0.0)),
        ];
        assert_eq!(nearest(origin, &equidistant), Some(DriverId(0)));
    }

    #[test]
    fn nearest_on_empty_pool_is_none() {
        assert_eq!(nearest(Coordinate::new(0.0, 0.0), &[]), None);
    }

    #[test]
    fn explicit_validates_against_the_pool() {
        assert_eq!(explicit(DriverId(2), &pool()), Ok(DriverId(2)));
        assert_eq!(
            explicit(DriverId(7), &pool()),
            Err(RideError::InvalidDriver(7))
        );
    }
}
