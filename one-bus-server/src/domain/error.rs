//! Domain error types.
//!
//! Raised while turning caller-supplied query values into validated
//! domain types. These are always the caller's fault and map to
//! `400 Bad Request` in the web layer.

/// Caller input that could not be turned into a domain value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedInput {
    /// A required query parameter was not supplied
    #[error("missing query parameter `{0}`")]
    MissingParameter(&'static str),

    /// The `coordinates` value is not of the form `lat,lon`
    #[error("coordinates must be \"latitude,longitude\", got {0:?}")]
    CoordinatePair(String),

    /// A latitude or longitude is not a finite number
    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    /// A latitude or longitude is outside its valid range
    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },

    /// The trip mapping is not a JSON object
    #[error("trips must be a JSON object: {0}")]
    TripsNotObject(String),

    /// A trip entry is missing a required field or has the wrong shape
    #[error("trip {name:?}: {reason}")]
    Trip { name: String, reason: String },

    /// No trips were supplied, so no stop can be selected
    #[error("trips must contain at least one stop")]
    NoTrips,
}
