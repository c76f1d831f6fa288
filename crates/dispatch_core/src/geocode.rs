//! Geocoding collaborator: free-form address ↔ coordinate.

use bevy_ecs::prelude::Resource;

use crate::geo::{self, Coordinate};

/// How close (planar degrees) a coordinate must be to a named place for
/// reverse lookups to use the place name instead of raw coordinates.
const PLACE_SNAP_RANGE: f64 = 0.005;

pub trait Geocoder: Send + Sync {
    /// Coordinate → display address. `None` when nothing is known there.
    fn reverse(&self, position: Coordinate) -> Option<String>;

    /// Free-form address → coordinate. `None` when the query does not match.
    fn forward(&self, query: &str) -> Option<Coordinate>;
}

/// ECS resource wrapping a boxed geocoder.
#[derive(Resource)]
pub struct GeocoderResource(pub Box<dyn Geocoder>);

/// Table-backed geocoder for the simulation: a handful of named places plus a
/// formatted-coordinate fallback for reverse lookups.
pub struct SimulatedGeocoder {
    places: Vec<(String, Coordinate)>,
}

impl SimulatedGeocoder {
    pub fn new(places: Vec<(String, Coordinate)>) -> Self {
        Self { places }
    }

    /// Places around the default map center.
    pub fn with_default_places() -> Self {
        Self::new(vec![
            ("Central Square".to_string(), Coordinate::new(-7.4912, -38.9772)),
            ("Bus Terminal".to_string(), Coordinate::new(-7.4860, -38.9735)),
            ("City Market".to_string(), Coordinate::new(-7.4800, -38.9700)),
            ("Regional Hospital".to_string(), Coordinate::new(-7.4950, -38.9810)),
        ])
    }
}

impl Geocoder for SimulatedGeocoder {
    fn reverse(&self, position: Coordinate) -> Option<String> {
        let nearest = self
            .places
            .iter()
            .map(|(name, place)| (name, geo::distance(position, *place)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((name, distance)) = nearest {
            if distance <= PLACE_SNAP_RANGE {
                return Some(name.clone());
            }
        }
        Some(format!(
            "{:.5}, {:.5}",
            position.latitude, position.longitude
        ))
    }

    fn forward(&self, query: &str) -> Option<Coordinate> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.places
            .iter()
            .find(|(name, _)| name.to_lowercase().contains(&needle))
            .map(|(_, place)| *place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_matches_case_insensitively() {
        let geocoder = SimulatedGeocoder::with_default_places();
        let place = geocoder.forward("city market").expect("match");
        assert_eq!(place, Coordinate::new(-7.4800, -38.9700));
        assert!(geocoder.forward("nowhere street").is_none());
        assert!(geocoder.forward("   ").is_none());
    }

    #[test]
    fn reverse_snaps_to_nearby_places() {
        let geocoder = SimulatedGeocoder::with_default_places();
        let near_market = Coordinate::new(-7.4801, -38.9702);
        assert_eq!(geocoder.reverse(near_market).as_deref(), Some("City Market"));

        let remote = Coordinate::new(-7.2, -38.5);
        let formatted = geocoder.reverse(remote).expect("fallback");
        assert!(formatted.contains("-7.2"));
    }
}
