//! Pluggable route collaborator plus quote construction.
//!
//! The route service is a narrow seam: given two coordinates it returns a
//! polyline, a road distance in meters and a human-readable duration, or
//! nothing when no route exists. The simulation ships a deterministic
//! in-process provider; tests swap in fixed or failing ones. A small LRU
//! decorator caches successful legs the way the movement path cache does in
//! larger fleets.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use bevy_ecs::prelude::Resource;
use lru::LruCache;
use serde::Serialize;

use crate::error::RideError;
use crate::fare::FareConfig;
use crate::geo::{self, Coordinate};

/// Average moped speed used for simulated duration labels (km/h).
const MOPED_SPEED_KMH: f64 = 25.0;

/// Road distance exceeds the crow-flies distance by roughly this factor.
const ROAD_CIRCUITY: f64 = 1.3;

/// Spacing between simulated polyline vertices, in meters of road.
const VERTEX_SPACING_M: f64 = 60.0;

/// Lateral bow of the simulated polyline, as a fraction of the chord length.
const BOW_FRACTION: f64 = 0.08;

const ROUTE_CACHE_CAPACITY: usize = 256;

/// One leg as returned by the route collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub polyline: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_label: String,
}

/// Route collaborator contract. `None` means no route was found.
pub trait RouteService: Send + Sync {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Option<RouteLeg>;
}

/// ECS resource wrapping a boxed route service.
#[derive(Resource)]
pub struct RouteServiceResource(pub Box<dyn RouteService>);

/// Deterministic in-process stand-in for the road-routing collaborator.
///
/// Interpolates a polyline between the endpoints with a gentle lateral bow so
/// animated trips do not run along a ruler line. Road distance is haversine
/// times a circuity factor; duration comes from a fixed moped speed.
#[derive(Debug, Default)]
pub struct SimulatedRouteService;

impl RouteService for SimulatedRouteService {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Option<RouteLeg> {
        if origin == destination {
            return None;
        }
        let distance_meters = geo::haversine_meters(origin, destination) * ROAD_CIRCUITY;
        let segments = ((distance_meters / VERTEX_SPACING_M).ceil() as usize).clamp(1, 127);
        let dlat = destination.latitude - origin.latitude;
        let dlng = destination.longitude - origin.longitude;
        // Perpendicular offset, zero at both endpoints.
        let bow_lat = -dlng * BOW_FRACTION;
        let bow_lng = dlat * BOW_FRACTION;

        let mut polyline = Vec::with_capacity(segments + 1);
        polyline.push(origin);
        for i in 1..segments {
            let t = i as f64 / segments as f64;
            let arc = (t * std::f64::consts::PI).sin();
            polyline.push(Coordinate::new(
                origin.latitude + dlat * t + bow_lat * arc,
                origin.longitude + dlng * t + bow_lng * arc,
            ));
        }
        polyline.push(destination);

        Some(RouteLeg {
            polyline,
            distance_meters,
            duration_label: duration_label(distance_meters),
        })
    }
}

/// Formats a trip duration the way the mapping provider would ("7 min").
fn duration_label(distance_meters: f64) -> String {
    let secs = distance_meters / 1000.0 / MOPED_SPEED_KMH * 3600.0;
    let minutes = (secs / 60.0).ceil().max(1.0) as u64;
    format!("{minutes} min")
}

type RouteKey = ((u64, u64), (u64, u64));

/// LRU decorator over a route service.
///
/// Only successful legs are cached; failures are not, so they retry on the
/// next request.
pub struct CachingRouteService {
    inner: Box<dyn RouteService>,
    cache: Mutex<LruCache<RouteKey, RouteLeg>>,
}

impl CachingRouteService {
    pub fn new(inner: Box<dyn RouteService>) -> Self {
        let capacity = NonZeroUsize::new(ROUTE_CACHE_CAPACITY).expect("cache size must be non-zero");
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl RouteService for CachingRouteService {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Option<RouteLeg> {
        let key = (origin.key(), destination.key());
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(leg) = cache.get(&key) {
                return Some(leg.clone());
            }
        }
        let leg = self.inner.route(origin, destination)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, leg.clone());
        }
        Some(leg)
    }
}

/// Distance/duration/price bundle for an origin/destination pair. Immutable
/// once produced; superseded, never mutated, when either input changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteQuote {
    /// Polyline from origin to destination; always at least two points.
    pub path: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_label: String,
    pub price_estimate: f64,
}

/// Normalizes a collaborator response into a [`RouteQuote`].
///
/// Requires two distinct coordinates; a collaborator miss maps to
/// [`RideError::RouteUnavailable`] and no quote is produced. Polylines with
/// fewer than two points are widened to the bare endpoints so `path` is
/// always a usable leg.
pub fn build_quote(
    service: &dyn RouteService,
    fare: &FareConfig,
    origin: Coordinate,
    destination: Coordinate,
) -> Result<RouteQuote, RideError> {
    if origin == destination {
        return Err(RideError::RouteUnavailable);
    }
    let leg = service
        .route(origin, destination)
        .ok_or(RideError::RouteUnavailable)?;
    let price_estimate = fare.estimate(leg.distance_meters);
    let path = if leg.polyline.len() >= 2 {
        leg.polyline
    } else {
        vec![origin, destination]
    };
    Ok(RouteQuote {
        path,
        distance_meters: leg.distance_meters,
        duration_label: leg.duration_label,
        price_estimate,
    })
}
