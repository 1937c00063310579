//! Arrival predictions.

const MILLIS_PER_MINUTE: i64 = 60_000;

/// A predicted arrival of a route at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalPrediction {
    /// Route short name as shown to riders, e.g. `40` or `E Line`
    pub route_name: String,
    /// Predicted arrival, milliseconds since the Unix epoch
    pub predicted_epoch_millis: i64,
}

impl ArrivalPrediction {
    pub fn new(route_name: impl Into<String>, predicted_epoch_millis: i64) -> Self {
        Self {
            route_name: route_name.into(),
            predicted_epoch_millis,
        }
    }

    /// Whole minutes from `now_millis` until arrival, rounded down.
    ///
    /// An arrival 30 seconds in the past is `-1`, not `0`.
    pub fn minutes_until(&self, now_millis: i64) -> i64 {
        self.predicted_epoch_millis
            .saturating_sub(now_millis)
            .div_euclid(MILLIS_PER_MINUTE)
    }
}
