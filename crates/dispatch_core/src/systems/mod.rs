pub mod animation_tick;
pub mod driver_jitter;
pub mod leg_arrived;
pub mod leg_route_resolved;
pub mod quote_resolved;
