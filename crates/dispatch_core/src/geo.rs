//! Planar geometry helpers for the simulation.
//!
//! Trips are short in-city hops, so distance and stepping work directly on raw
//! coordinate deltas rather than geodesics. Haversine is provided only for the
//! simulated route collaborator, which reports road distances in meters.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used by [`haversine_meters`].
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair. Equality is exact numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Bit-level key for hash-based caches (`f64` itself is not hashable).
    pub fn key(&self) -> (u64, u64) {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

/// Planar distance on raw coordinate deltas.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = a.latitude - b.latitude;
    let dlng = a.longitude - b.longitude;
    dlat.hypot(dlng)
}

/// Heading in degrees from `a` to `b`: `atan2(Δlat, Δlng)`.
///
/// Callers keep their previous heading when `a == b`; the value returned for
/// a zero delta is not meaningful.
pub fn bearing_degrees(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = b.latitude - a.latitude;
    let dlng = b.longitude - a.longitude;
    dlat.atan2(dlng).to_degrees()
}

/// Moves `current` toward `target` by at most `max_step` on each axis
/// independently, clamped so it never overshoots. Repeated calls converge to
/// `target` in a number of steps bounded by `distance / max_step`.
pub fn step_toward(current: Coordinate, target: Coordinate, max_step: f64) -> Coordinate {
    let dlat = target.latitude - current.latitude;
    let dlng = target.longitude - current.longitude;
    Coordinate {
        latitude: current.latitude + dlat.signum() * dlat.abs().min(max_step),
        longitude: current.longitude + dlng.signum() * dlng.abs().min(max_step),
    }
}

/// Great-circle distance in meters between two coordinates.
pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lng1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lng2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlng = (dlng * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_planar_hypot() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-12);
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn bearing_matches_atan2_of_deltas() {
        let a = Coordinate::new(0.0, 0.0);
        let east = Coordinate::new(0.0, 1.0);
        let north = Coordinate::new(1.0, 0.0);
        assert!((bearing_degrees(a, east) - 0.0).abs() < 1e-12);
        assert!((bearing_degrees(a, north) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn step_toward_never_overshoots() {
        let current = Coordinate::new(0.0, 0.0);
        let target = Coordinate::new(0.00003, -0.0001);
        let next = step_toward(current, target, 0.00005);
        assert_eq!(next.latitude, 0.00003);
        assert_eq!(next.longitude, -0.00005);
    }

    #[test]
    fn step_toward_converges_in_bounded_steps() {
        let mut current = Coordinate::new(-7.4912, -38.9772);
        let target = Coordinate::new(-7.4905, -38.9760);
        let max_step = 0.00005;
        let bound = (distance(current, target) / max_step).ceil() as usize + 4;
        let mut steps = 0;
        while distance(current, target) > 1e-12 {
            current = step_toward(current, target, max_step);
            steps += 1;
            assert!(steps <= bound, "did not converge within {bound} steps");
        }
    }

    #[test]
    fn haversine_is_plausible_for_city_blocks() {
        let a = Coordinate::new(-7.4912, -38.9772);
        let b = Coordinate::new(-7.4800, -38.9700);
        let meters = haversine_meters(a, b);
        assert!(meters > 1000.0 && meters < 2000.0, "got {meters}");
    }
}
