//! Fare estimation with the operator's psychological pricing rule.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Default per-kilometer rate in currency units.
pub const PRICE_PER_KM: f64 = 3.0;

/// Default minimum fare in currency units.
pub const MINIMUM_FARE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct FareConfig {
    pub price_per_km: f64,
    pub minimum_fare: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            price_per_km: PRICE_PER_KM,
            minimum_fare: MINIMUM_FARE,
        }
    }
}

impl FareConfig {
    /// Quoted price for a route of `distance_meters`, floored at the minimum
    /// fare.
    pub fn estimate(&self, distance_meters: f64) -> f64 {
        let raw = (distance_meters / 1000.0) * self.price_per_km;
        psychological_round(raw).max(self.minimum_fare)
    }
}

/// Rounds a raw fare to a price ending in .50 or .99: a fractional part of at
/// most 0.5 rounds down to `x.50`, anything above rounds down to `x.99`.
/// This is not round-half-up; the boundaries are part of the pricing rule.
pub fn psychological_round(raw: f64) -> f64 {
    let whole = raw.floor();
    let cents = raw - whole;
    if cents <= 0.5 {
        whole + 0.5
    } else {
        whole + 0.99
    }
}
