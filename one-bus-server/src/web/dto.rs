//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, MalformedInput, StopCandidate, parse_trips};

/// Query string shared by both arrival boards.
///
/// Every field is optional here so that a missing parameter becomes a
/// `MalformedInput` with the parameter's name, not a generic rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsQuery {
    /// Caller's OneBusAway key, passed through unchanged
    pub api_key: Option<String>,

    /// Caller position as `lat,lon`
    pub coordinates: Option<String>,

    /// JSON mapping of stop name to `{id, latitude, longitude, routeIds?}`
    pub trips: Option<String>,

    /// Accepted for compatibility; boards are not truncated
    pub limit: Option<String>,
}

/// A validated arrivals query.
#[derive(Debug, Clone)]
pub struct ArrivalsRequest {
    pub api_key: String,
    pub origin: Coordinate,
    /// Candidates in the order supplied; never empty
    pub stops: Vec<StopCandidate>,
    pub limit: Option<String>,
}

impl TryFrom<ArrivalsQuery> for ArrivalsRequest {
    type Error = MalformedInput;

    fn try_from(query: ArrivalsQuery) -> Result<Self, Self::Error> {
        let api_key = query
            .api_key
            .ok_or(MalformedInput::MissingParameter("apiKey"))?;

        let origin = query
            .coordinates
            .ok_or(MalformedInput::MissingParameter("coordinates"))?
            .parse::<Coordinate>()?;

        let stops = parse_trips(
            query
                .trips
                .as_deref()
                .ok_or(MalformedInput::MissingParameter("trips"))?,
        )?;

        if stops.is_empty() {
            return Err(MalformedInput::NoTrips);
        }

        Ok(Self {
            api_key,
            origin,
            stops,
            limit: query.limit,
        })
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
