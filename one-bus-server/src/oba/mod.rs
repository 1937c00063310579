//! OneBusAway client.
//!
//! This module provides an HTTP client for the OneBusAway REST API,
//! which serves real-time arrival predictions for transit stops.
//!
//! Key characteristics of OneBusAway:
//! - Stop ids are agency-prefixed, e.g. `1_75403`
//! - Times are epoch milliseconds
//! - `predictedArrivalTime` is `0` when no real-time data exists
//! - Errors may arrive as a 200 with a non-200 `code` in the envelope

mod client;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, ObaClient, ObaConfig};
pub use error::ObaError;
pub use types::{ArrivalAndDeparture, ArrivalsData, ArrivalsResponse, StopWithArrivals};
