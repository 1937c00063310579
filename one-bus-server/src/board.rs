//! Turning raw arrivals into what the rider sees.
//!
//! Both outputs apply the same rules: only routes in the stop's filter,
//! minutes rounded down, arrivals already in the past dropped. The flat
//! board is a list of sentences ordered by minutes; the grouped board
//! collects minutes per route in the order routes first appear upstream.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::{ArrivalPrediction, StopCandidate};

/// Arrivals at `stop` that pass its route filter and are not yet past,
/// paired with their minutes until arrival, in upstream order.
fn upcoming<'a>(
    stop: &'a StopCandidate,
    arrivals: &'a [ArrivalPrediction],
    now_millis: i64,
) -> impl Iterator<Item = (&'a ArrivalPrediction, i64)> + 'a {
    arrivals
        .iter()
        .filter(move |a| stop.route_filter.allows(&a.route_name))
        .map(move |a| (a, a.minutes_until(now_millis)))
        .filter(|(_, minutes)| *minutes >= 0)
}

/// The flat board: one message per upcoming arrival, soonest first.
///
/// Arrivals due in the same minute keep their upstream order.
pub fn arrival_messages(
    stop: &StopCandidate,
    arrivals: &[ArrivalPrediction],
    now_millis: i64,
) -> Vec<String> {
    let mut upcoming: Vec<_> = upcoming(stop, arrivals, now_millis).collect();
    upcoming.sort_by_key(|(_, minutes)| *minutes);

    upcoming
        .into_iter()
        .map(|(a, minutes)| {
            format!(
                "{}: Route {} arrives in {} minutes",
                stop.name, a.route_name, minutes
            )
        })
        .collect()
}

/// Upcoming minutes for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGroup {
    pub route_name: String,
    /// Distinct minute values, ascending
    pub minutes: BTreeSet<i64>,
}

/// The grouped board. Routes appear in first-seen order.
///
/// Serializes as a JSON object keyed by route name, keys in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGroups(Vec<RouteGroup>);

impl RouteGroups {
    pub fn iter(&self) -> std::slice::Iter<'_, RouteGroup> {
        self.0.iter()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    fn get(&self, route_name: &str) -> Option<&RouteGroup> {
        self.0.iter().find(|g| g.route_name == route_name)
    }
}

impl<'a> IntoIterator for &'a RouteGroups {
    type Item = &'a RouteGroup;
    type IntoIter = std::slice::Iter<'a, RouteGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for RouteGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in &self.0 {
            map.serialize_entry(&group.route_name, &group.minutes)?;
        }
        map.end()
    }
}

/// Group upcoming arrivals by route.
pub fn group_by_route(
    stop: &StopCandidate,
    arrivals: &[ArrivalPrediction],
    now_millis: i64,
) -> RouteGroups {
    let mut groups: Vec<RouteGroup> = Vec::new();

    for (arrival, minutes) in upcoming(stop, arrivals, now_millis) {
        match groups
            .iter_mut()
            .find(|g| g.route_name == arrival.route_name)
        {
            Some(group) => {
                group.minutes.insert(minutes);
            }
            None => groups.push(RouteGroup {
                route_name: arrival.route_name.clone(),
                minutes: BTreeSet::from([minutes]),
            }),
        }
    }

    RouteGroups(groups)
}
