//! Deterministic moped dispatch session: quote, match, and animate a single
//! passenger ride over a discrete-event clock.

pub mod animator;
pub mod clock;
pub mod controller;
pub mod drivers;
pub mod error;
pub mod fare;
pub mod geo;
pub mod geocode;
pub mod location;
pub mod notify;
pub mod routing;
pub mod scenario;
pub mod selection;
pub mod session;
pub mod systems;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
