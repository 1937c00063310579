//! Geographic coordinates and great-circle distance.

use std::fmt;
use std::str::FromStr;

use super::error::MalformedInput;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated latitude/longitude pair in degrees.
///
/// Both values are finite and within range, so distances computed from
/// a `Coordinate` are never NaN.
///
/// # Examples
///
/// ```
/// use one_bus_server::domain::Coordinate;
///
/// let here: Coordinate = "47.6,-122.3".parse().unwrap();
/// assert_eq!(here.latitude(), 47.6);
///
/// assert!("47.6".parse::<Coordinate>().is_err());
/// assert!("91,0".parse::<Coordinate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MalformedInput> {
        let latitude = check_range("latitude", latitude, 90.0)?;
        let longitude = check_range("longitude", longitude, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse latitude and longitude from their textual forms.
    pub fn parse_parts(latitude: &str, longitude: &str) -> Result<Self, MalformedInput> {
        Self::new(
            parse_degrees("latitude", latitude)?,
            parse_degrees("longitude", longitude)?,
        )
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        distance_km(*self, *other)
    }
}

impl FromStr for Coordinate {
    type Err = MalformedInput;

    /// Parse a `"lat,lon"` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => Self::parse_parts(lat, lon),
            _ => Err(MalformedInput::CoordinatePair(s.to_string())),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

fn parse_degrees(field: &'static str, value: &str) -> Result<f64, MalformedInput> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| MalformedInput::NotANumber {
            field,
            value: value.to_string(),
        })
}

fn check_range(field: &'static str, value: f64, limit: f64) -> Result<f64, MalformedInput> {
    if !value.is_finite() {
        return Err(MalformedInput::NotANumber {
            field,
            value: value.to_string(),
        });
    }
    if value.abs() > limit {
        return Err(MalformedInput::OutOfRange { field, value });
    }
    Ok(value)
}

/// Haversine distance between two coordinates, in kilometers.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);

    // Rounding can push h just past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
