//! Domain types for nearest-stop arrival lookup.
//!
//! Caller input is validated on the way in: a `Coordinate` is always
//! finite and in range, and a `StopCandidate` always carries one, so the
//! rest of the crate never sees NaN distances.

mod arrival;
mod coordinate;
mod error;
mod stop;

pub use arrival::ArrivalPrediction;
pub use coordinate::{Coordinate, EARTH_RADIUS_KM, distance_km};
pub use error::MalformedInput;
pub use stop::{RouteFilter, StopCandidate, nearest_stop, parse_trips};
