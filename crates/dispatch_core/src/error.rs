//! Failure taxonomy for the ride core.
//!
//! Nothing here is fatal to the process: every variant is either surfaced to
//! the user as a notification or handled internally while preserving the
//! session invariants. Stale async responses are not an error at all; they
//! are silently discarded by the systems that receive them.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RideError {
    /// The route collaborator returned zero routes.
    #[error("no route found between the selected points")]
    RouteUnavailable,

    /// An explicit driver pick referenced an id outside the pool.
    #[error("driver {0} is not in the pool")]
    InvalidDriver(u32),

    /// A leg with fewer than two points; callers treat it as already arrived.
    #[error("path has fewer than two points")]
    DegeneratePath,

    /// Device location access was refused.
    #[error("location permission denied")]
    PermissionDenied,

    /// The geocoder could not resolve the query.
    #[error("address not found")]
    GeocodeNotFound,
}
