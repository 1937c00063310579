//! OneBusAway API response DTOs.
//!
//! Only the fields this service reads are modelled. Everything is
//! optional except what an arrival cannot do without, because the API
//! omits fields freely (and wraps errors in the same envelope).

use serde::Deserialize;

use crate::domain::ArrivalPrediction;

/// Envelope around every OneBusAway response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsResponse {
    /// Mirrors the HTTP status; present even on errors.
    pub code: Option<u16>,

    /// Human-readable status, `OK` on success.
    pub text: Option<String>,

    pub data: Option<ArrivalsData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrivalsData {
    pub entry: StopWithArrivals,
}

/// The `entry` of `arrivals-and-departures-for-stop`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopWithArrivals {
    #[serde(default)]
    pub arrivals_and_departures: Vec<ArrivalAndDeparture>,
}

/// One predicted or scheduled arrival at the stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalAndDeparture {
    /// Rider-facing route name, e.g. `40`.
    pub route_short_name: String,

    /// Epoch millis, or `0` when there is no real-time prediction.
    #[serde(default)]
    pub predicted_arrival_time: i64,

    /// Timetabled arrival, epoch millis.
    pub scheduled_arrival_time: Option<i64>,
}

impl ArrivalAndDeparture {
    /// Best known arrival time: the prediction, else the timetable.
    pub fn arrival_time(&self) -> i64 {
        match (self.predicted_arrival_time, self.scheduled_arrival_time) {
            (0, Some(scheduled)) => scheduled,
            (predicted, _) => predicted,
        }
    }

    pub fn to_prediction(&self) -> ArrivalPrediction {
        ArrivalPrediction::new(self.route_short_name.clone(), self.arrival_time())
    }
}
