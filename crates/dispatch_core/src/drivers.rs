//! Driver directory: a small fixed pool of moped drivers.

use bevy_ecs::prelude::{Component, World};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Registry index of a driver in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverId(pub u32);

/// Static registry entry; lives for the whole process.
#[derive(Debug, Clone, PartialEq, Component, Serialize, Deserialize)]
pub struct DriverProfile {
    pub id: DriverId,
    pub display_name: String,
    pub photo_ref: String,
    /// Star rating in `[0, 5]`.
    pub rating: f32,
    pub vehicle_label: String,
    pub plate_label: String,
}

/// Live position of one driver. The jitter system owns it while the driver is
/// idle; the path animator owns it for the matched driver of an active ride.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct DriverPosition(pub Coordinate);

/// Seed data for one driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSeed {
    pub profile: DriverProfile,
    pub start_position: Coordinate,
}

/// The fixture pool: three mopeds parked around the default map center.
pub fn default_driver_seeds() -> Vec<DriverSeed> {
    let seeds = [
        (
            "Carlos Mendes",
            4.9_f32,
            "Honda CG 160",
            "QXD-2B41",
            Coordinate::new(-7.4905, -38.9760),
        ),
        (
            "Rafaela Souza",
            4.7,
            "Yamaha Factor 150",
            "PLK-7F19",
            Coordinate::new(-7.4920, -38.9780),
        ),
        (
            "Edson Lima",
            4.8,
            "Honda Biz 125",
            "RTC-9A03",
            Coordinate::new(-7.4910, -38.9795),
        ),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(index, (name, rating, vehicle, plate, position))| DriverSeed {
            profile: DriverProfile {
                id: DriverId(index as u32),
                display_name: name.to_string(),
                photo_ref: format!("drivers/{index}.png"),
                rating,
                vehicle_label: vehicle.to_string(),
                plate_label: plate.to_string(),
            },
            start_position: position,
        })
        .collect()
}

/// Spawns one entity per seed with its profile and starting position.
pub fn spawn_driver_pool(world: &mut World, seeds: &[DriverSeed]) {
    for seed in seeds {
        world.spawn((seed.profile.clone(), DriverPosition(seed.start_position)));
    }
}

/// Current pool positions, ordered by driver id so linear scans are stable.
pub fn roster(world: &mut World) -> Vec<(DriverId, Coordinate)> {
    let mut pool: Vec<(DriverId, Coordinate)> = world
        .query::<(&DriverProfile, &DriverPosition)>()
        .iter(world)
        .map(|(profile, position)| (profile.id, position.0))
        .collect();
    pool.sort_by_key(|(id, _)| id.0);
    pool
}

/// All registry profiles, ordered by driver id.
pub fn profiles(world: &mut World) -> Vec<DriverProfile> {
    let mut all: Vec<DriverProfile> = world
        .query::<&DriverProfile>()
        .iter(world)
        .cloned()
        .collect();
    all.sort_by_key(|profile| profile.id.0);
    all
}
