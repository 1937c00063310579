//! Candidate stops supplied by the caller, and nearest-stop selection.

use std::fmt;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};

use super::coordinate::{Coordinate, distance_km};
use super::error::MalformedInput;

/// The route short names a caller wants to see at a stop.
///
/// Order of first appearance is kept and duplicates are dropped. An empty
/// filter allows no routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter(Vec<String>);

impl RouteFilter {
    pub fn new<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for route in routes {
            let route = route.into();
            if !kept.contains(&route) {
                kept.push(route);
            }
        }
        Self(kept)
    }

    /// Whether arrivals on `route` should be shown.
    pub fn allows(&self, route: &str) -> bool {
        self.0.iter().any(|r| r == route)
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    fn routes(&self) -> &[String] {
        &self.0
    }
}

/// A named stop the caller might be standing near.
#[derive(Debug, Clone, PartialEq)]
pub struct StopCandidate {
    /// Upstream stop id, e.g. `1_75403`
    pub id: String,
    /// Caller-chosen display name
    pub name: String,
    pub coordinate: Coordinate,
    pub route_filter: RouteFilter,
}

impl StopCandidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
        route_filter: RouteFilter,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            route_filter,
        }
    }
}

/// Degrees as they appear in a trip mapping: either `"47.6"` or `47.6`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn into_text(self) -> String {
        match self {
            Degrees::Number(n) => n.to_string(),
            Degrees::Text(s) => s,
        }
    }
}

/// One entry of the trip mapping before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrip {
    id: String,
    latitude: Degrees,
    longitude: Degrees,
    #[serde(default)]
    route_ids: Option<Vec<String>>,
}

/// The trip mapping in document order.
///
/// `serde_json::Map` sorts its keys, so the entries are collected by hand
/// to keep the caller's order for tie-breaking.
struct OrderedTrips(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for OrderedTrips {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TripsVisitor;

        impl<'de> Visitor<'de> for TripsVisitor {
            type Value = OrderedTrips;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping stop names to stops")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(OrderedTrips(entries))
            }
        }

        deserializer.deserialize_map(TripsVisitor)
    }
}

/// Parse the JSON-encoded trip mapping into stop candidates.
///
/// Candidates come back in the order the names appear in the document.
///
/// ```
/// use one_bus_server::domain::parse_trips;
///
/// let trips = parse_trips(
///     r#"{"Home":{"id":"1_123","latitude":"47.6","longitude":"-122.3","routeIds":["40"]}}"#,
/// )
/// .unwrap();
/// assert_eq!(trips[0].name, "Home");
/// assert!(trips[0].route_filter.allows("40"));
/// ```
pub fn parse_trips(json: &str) -> Result<Vec<StopCandidate>, MalformedInput> {
    let OrderedTrips(entries) = serde_json::from_str(json)
        .map_err(|e| MalformedInput::TripsNotObject(e.to_string()))?;

    entries
        .into_iter()
        .map(|(name, value)| {
            let raw: RawTrip = serde_json::from_value(value).map_err(|e| MalformedInput::Trip {
                name: name.clone(),
                reason: e.to_string(),
            })?;

            let coordinate = Coordinate::parse_parts(
                &raw.latitude.into_text(),
                &raw.longitude.into_text(),
            )
            .map_err(|e| MalformedInput::Trip {
                name: name.clone(),
                reason: e.to_string(),
            })?;

            let route_filter = RouteFilter::new(raw.route_ids.unwrap_or_default());

            Ok(StopCandidate::new(raw.id, name, coordinate, route_filter))
        })
        .collect()
}

/// The candidate closest to `origin`.
///
/// Only a strictly shorter distance replaces the current best, so the
/// first of several equidistant candidates wins. Returns `None` for an
/// empty slice.
pub fn nearest_stop<'a>(
    origin: &Coordinate,
    stops: &'a [StopCandidate],
) -> Option<&'a StopCandidate> {
    let mut nearest = None;
    let mut shortest = f64::INFINITY;

    for stop in stops {
        let distance = distance_km(*origin, stop.coordinate);
        if distance < shortest {
            shortest = distance;
            nearest = Some(stop);
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, lat: f64, lon: f64) -> StopCandidate {
        StopCandidate::new(
            id,
            id,
            Coordinate::new(lat, lon).unwrap(),
            RouteFilter::default(),
        )
    }

    #[test]
    fn parse_example_trip() {
        let trips = parse_trips(
            r#"{"Home":{"id":"1_123","latitude":"47.6","longitude":"-122.3","routeIds":["40"]}}"#,
        )
        .unwrap();

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].id, "1_123");
        assert_eq!(trips[0].name, "Home");
        assert_eq!(trips[0].coordinate, Coordinate::new(47.6, -122.3).unwrap());
        assert_eq!(trips[0].route_filter.routes(), ["40".to_string()]);
    }

    #[test]
    fn parse_numeric_coordinates() {
        let trips =
            parse_trips(r#"{"Work":{"id":"1_9","latitude":47.61,"longitude":-122.33}}"#).unwrap();
        assert_eq!(trips[0].coordinate, Coordinate::new(47.61, -122.33).unwrap());
    }

    #[test]
    fn missing_route_ids_is_empty_filter() {
        let trips =
            parse_trips(r#"{"Work":{"id":"1_9","latitude":"47","longitude":"-122"}}"#).unwrap();
        assert!(trips[0].route_filter.is_empty());

        let trips = parse_trips(
            r#"{"Work":{"id":"1_9","latitude":"47","longitude":"-122","routeIds":null}}"#,
        )
        .unwrap();
        assert!(trips[0].route_filter.is_empty());
    }

    #[test]
    fn parse_keeps_document_order() {
        let trips = parse_trips(
            r#"{
                "Zoo":{"id":"z","latitude":"1","longitude":"1"},
                "Apple":{"id":"a","latitude":"2","longitude":"2"},
                "Middle":{"id":"m","latitude":"3","longitude":"3"}
            }"#,
        )
        .unwrap();
        let names: Vec<_> = trips.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Zoo", "Apple", "Middle"]);
    }

    #[test]
    fn empty_mapping_parses_to_nothing() {
        assert!(parse_trips("{}").unwrap().is_empty());
    }

    #[test]
    fn reject_non_object() {
        assert!(matches!(
            parse_trips("[1, 2]"),
            Err(MalformedInput::TripsNotObject(_))
        ));
        assert!(matches!(
            parse_trips("not json"),
            Err(MalformedInput::TripsNotObject(_))
        ));
    }

    #[test]
    fn reject_missing_id() {
        let err = parse_trips(r#"{"Home":{"latitude":"47","longitude":"-122"}}"#).unwrap_err();
        match err {
            MalformedInput::Trip { name, reason } => {
                assert_eq!(name, "Home");
                assert!(reason.contains("id"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reject_bad_coordinate() {
        let err = parse_trips(r#"{"Home":{"id":"1","latitude":"abc","longitude":"-122"}}"#)
            .unwrap_err();
        assert!(matches!(err, MalformedInput::Trip { ref name, .. } if name == "Home"));
        assert!(err.to_string().contains("latitude is not a number"));
    }

    #[test]
    fn reject_bad_route_ids() {
        let err = parse_trips(
            r#"{"Home":{"id":"1","latitude":"47","longitude":"-122","routeIds":"40"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MalformedInput::Trip { .. }));
    }

    #[test]
    fn route_filter_dedups_in_order() {
        let filter = RouteFilter::new(["40", "E Line", "40"]);
        assert_eq!(filter.routes(), ["40".to_string(), "E Line".to_string()]);
        assert!(filter.allows("E Line"));
        assert!(!filter.allows("e line"));
    }

    #[test]
    fn empty_filter_allows_nothing() {
        let filter = RouteFilter::default();
        assert!(!filter.allows("40"));
        assert!(!filter.allows(""));
    }

    #[test]
    fn nearest_of_none() {
        let origin = Coordinate::new(47.6, -122.3).unwrap();
        assert!(nearest_stop(&origin, &[]).is_none());
    }

    #[test]
    fn nearest_of_one() {
        let origin = Coordinate::new(0.0, 0.0).unwrap();
        let stops = [stop("far", 60.0, 60.0)];
        assert_eq!(nearest_stop(&origin, &stops).unwrap().id, "far");
    }

    #[test]
    fn nearest_picks_minimum() {
        let origin = Coordinate::new(47.6, -122.3).unwrap();
        let stops = [
            stop("tacoma", 47.25, -122.44),
            stop("downtown", 47.605, -122.33),
            stop("everett", 47.98, -122.2),
        ];
        assert_eq!(nearest_stop(&origin, &stops).unwrap().id, "downtown");
    }

    #[test]
    fn nearest_of_one_at_antipode() {
        let origin = Coordinate::new(87.5, 0.0).unwrap();
        let stops = [stop("antipode", -87.5, 180.0)];
        assert_eq!(nearest_stop(&origin, &stops).unwrap().id, "antipode");
    }

    #[test]
    fn nearest_tie_keeps_first_seen() {
        let origin = Coordinate::new(0.0, 0.0).unwrap();
        let stops = [stop("east", 0.0, 1.0), stop("west", 0.0, -1.0)];
        assert_eq!(nearest_stop(&origin, &stops).unwrap().id, "east");

        let stops = [stop("west", 0.0, -1.0), stop("east", 0.0, 1.0)];
        assert_eq!(nearest_stop(&origin, &stops).unwrap().id, "west");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_stops() -> impl Strategy<Value = Vec<StopCandidate>> {
            prop::collection::vec((-80.0f64..80.0, -170.0f64..170.0), 1..20).prop_map(|points| {
                points
                    .into_iter()
                    .enumerate()
                    .map(|(i, (lat, lon))| stop(&i.to_string(), lat, lon))
                    .collect()
            })
        }

        proptest! {
            /// No candidate is strictly closer than the one selected
            #[test]
            fn selected_is_minimal(
                lat in -80.0f64..80.0,
                lon in -170.0f64..170.0,
                stops in any_stops(),
            ) {
                let origin = Coordinate::new(lat, lon).unwrap();
                let nearest = nearest_stop(&origin, &stops).unwrap();
                let best = distance_km(origin, nearest.coordinate);
                for s in &stops {
                    prop_assert!(best <= distance_km(origin, s.coordinate));
                }
            }

            /// The selection is the first index achieving the minimum
            #[test]
            fn selected_is_first_minimum(
                lat in -80.0f64..80.0,
                lon in -170.0f64..170.0,
                stops in any_stops(),
            ) {
                let origin = Coordinate::new(lat, lon).unwrap();
                let nearest = nearest_stop(&origin, &stops).unwrap();
                let best = distance_km(origin, nearest.coordinate);
                let first = stops
                    .iter()
                    .position(|s| distance_km(origin, s.coordinate) == best)
                    .unwrap();
                prop_assert_eq!(&stops[first].id, &nearest.id);
            }
        }
    }
}
