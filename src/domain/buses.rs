use std::collections::HashSet;
use std::sync::OnceLock;

use hashbrown::HashMap;

use super::error::{Result, TransitError};
use super::models::{great_circle_distance, Coordinates};
use super::stops::StopIndex;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteMetrics {
    pub geographic_length: f64,
    pub road_length: f64,
    /// Road length over geographic length; 0 when the line has no extent.
    pub curvature: f64,
    pub stop_count: usize,
    pub unique_stop_count: usize,
}

#[derive(Debug)]
pub struct BusRoute {
    pub name: String,
    pub is_round_trip: bool,
    pub stops: Vec<String>,
    metrics: OnceLock<RouteMetrics>,
}

impl BusRoute {
    pub fn new(name: impl Into<String>, mut stops: Vec<String>, is_round_trip: bool) -> Self {
        if !is_round_trip && stops.len() > 1 {
            let back: Vec<String> = stops.iter().rev().skip(1).cloned().collect();
            stops.extend(back);
        }
        Self {
            name: name.into(),
            is_round_trip,
            stops,
            metrics: OnceLock::new(),
        }
    }

    pub fn hops(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stops
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    pub fn metrics(&self, stops: &StopIndex) -> Result<RouteMetrics> {
        if let Some(metrics) = self.metrics.get() {
            return Ok(*metrics);
        }
        let computed = self.compute_metrics(stops)?;
        Ok(*self.metrics.get_or_init(|| computed))
    }

    fn compute_metrics(&self, stops: &StopIndex) -> Result<RouteMetrics> {
        let mut geographic_length = 0.0;
        let mut road_length = 0.0;
        for (from, to) in self.hops() {
            let a = self.coordinates_of(stops, from)?;
            let b = self.coordinates_of(stops, to)?;
            geographic_length += great_circle_distance(a, b);
            road_length += stops.distance(from, to)?;
        }
        let curvature = if geographic_length > 0.0 {
            road_length / geographic_length
        } else {
            0.0
        };
        let unique: HashSet<&str> = self.stops.iter().map(String::as_str).collect();
        Ok(RouteMetrics {
            geographic_length,
            road_length,
            curvature,
            stop_count: self.stops.len(),
            unique_stop_count: unique.len(),
        })
    }

    fn coordinates_of(&self, stops: &StopIndex, stop: &str) -> Result<Coordinates> {
        stops
            .get(stop)
            .and_then(|s| s.coordinates)
            .ok_or_else(|| TransitError::MissingStop {
                bus: self.name.clone(),
                stop: stop.to_owned(),
            })
    }
}

#[derive(Debug, Default)]
pub struct BusIndex {
    routes: Vec<BusRoute>,
    positions: HashMap<String, usize>,
}

impl BusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second definition of the same bus replaces the first, stop
    /// membership included.
    pub fn insert(&mut self, route: BusRoute, stops: &mut StopIndex) {
        for stop in &route.stops {
            stops.add_bus(stop, &route.name);
        }
        match self.positions.get(&route.name) {
            Some(&pos) => {
                let old = std::mem::replace(&mut self.routes[pos], route);
                let current = &self.routes[pos];
                for stop in old.stops.iter().filter(|s| !current.stops.contains(*s)) {
                    stops.remove_bus(stop, &current.name);
                }
            }
            None => {
                self.positions.insert(route.name.clone(), self.routes.len());
                self.routes.push(route);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&BusRoute> {
        self.positions.get(name).map(|&pos| &self.routes[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BusRoute> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn metrics(&self, name: &str, stops: &StopIndex) -> Result<Option<RouteMetrics>> {
        self.get(name).map(|route| route.metrics(stops)).transpose()
    }

    pub fn validate(&self, stops: &StopIndex) -> Result<()> {
        for route in &self.routes {
            if let Some(stop) = route.stops.iter().find(|s| !stops.is_defined(s)) {
                return Err(TransitError::MissingStop {
                    bus: route.name.clone(),
                    stop: stop.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(stops: &[&str]) -> Vec<String> {
        stops.iter().map(|s| s.to_string()).collect()
    }

    fn equator_stops() -> StopIndex {
        let mut stops = StopIndex::new();
        stops.upsert(
            "A",
            Coordinates::from_degrees(0.0, 0.0),
            [("B".to_owned(), 120_000.0)],
        );
        stops.upsert(
            "B",
            Coordinates::from_degrees(0.0, 1.0),
            [("A".to_owned(), 130_000.0)],
        );
        stops
    }

    #[test]
    fn one_way_route_becomes_out_and_back() {
        let route = BusRoute::new("1", names(&["A", "B", "C"]), false);
        assert!(!route.is_round_trip);
        assert_eq!(route.stops, names(&["A", "B", "C", "B", "A"]));
    }

    #[test]
    fn round_trip_route_is_kept() {
        let route = BusRoute::new("1", names(&["A", "B", "A"]), true);
        assert!(route.is_round_trip);
        assert_eq!(route.stops, names(&["A", "B", "A"]));
    }

    #[test]
    fn single_stop_one_way_route_is_kept() {
        let route = BusRoute::new("1", names(&["A"]), false);
        assert_eq!(route.stops, names(&["A"]));
    }

    #[test]
    fn metrics_of_out_and_back_line() {
        let stops = equator_stops();
        let route = BusRoute::new("1", names(&["A", "B"]), false);
        let metrics = route.metrics(&stops).unwrap();

        let one_degree = crate::domain::EARTH_RADIUS_M * 1f64.to_radians();
        assert!((metrics.geographic_length - 2.0 * one_degree).abs() < 1e-6);
        assert_eq!(metrics.road_length, 250_000.0);
        assert!(metrics.curvature >= 1.0);
        assert_eq!(metrics.stop_count, 3);
        assert_eq!(metrics.unique_stop_count, 2);
    }

    #[test]
    fn zero_extent_route_reports_zero_curvature() {
        let mut stops = StopIndex::new();
        stops.upsert("A", Coordinates::from_degrees(10.0, 10.0), [("A".to_owned(), 0.0)]);
        let route = BusRoute::new("loop", names(&["A", "A"]), true);
        let metrics = route.metrics(&stops).unwrap();
        assert_eq!(metrics.road_length, 0.0);
        assert_eq!(metrics.curvature, 0.0);
        // cached even though every length is zero
        assert_eq!(route.metrics(&stops).unwrap(), metrics);
    }

    #[test]
    fn stops_sharing_coordinates_have_no_extent() {
        let mut stops = StopIndex::new();
        let here = Coordinates::from_degrees(55.611087, 37.20829);
        stops.upsert("North gate", here, [("South gate".to_owned(), 80.0)]);
        stops.upsert("South gate", here, Vec::<(String, f64)>::new());
        let route = BusRoute::new("shuttle", names(&["North gate", "South gate"]), false);
        let metrics = route.metrics(&stops).unwrap();
        assert_eq!(metrics.geographic_length, 0.0);
        assert_eq!(metrics.road_length, 160.0);
        assert_eq!(metrics.curvature, 0.0);
    }

    #[test]
    fn insert_registers_membership() {
        let mut stops = equator_stops();
        let mut buses = BusIndex::new();
        buses.insert(BusRoute::new("1", names(&["A", "B"]), false), &mut stops);
        buses.insert(BusRoute::new("2", names(&["B", "C"]), false), &mut stops);

        assert_eq!(buses.len(), 2);
        assert!(stops.get("A").unwrap().buses.contains("1"));
        assert_eq!(stops.get("B").unwrap().buses.len(), 2);
        assert!(stops.get("C").is_some());
        assert!(!stops.is_defined("C"));
    }

    #[test]
    fn redefining_a_bus_replaces_its_membership() {
        let mut stops = equator_stops();
        let mut buses = BusIndex::new();
        buses.insert(BusRoute::new("1", names(&["A", "B"]), false), &mut stops);
        buses.insert(BusRoute::new("1", names(&["B"]), true), &mut stops);

        assert_eq!(buses.len(), 1);
        assert!(stops.get("A").unwrap().buses.is_empty());
        assert!(stops.get("B").unwrap().buses.contains("1"));
        assert_eq!(buses.get("1").unwrap().stops, names(&["B"]));
    }

    #[test]
    fn validate_rejects_undefined_stops() {
        let mut stops = equator_stops();
        let mut buses = BusIndex::new();
        buses.insert(BusRoute::new("7", names(&["A", "Ghost"]), true), &mut stops);
        match buses.validate(&stops) {
            Err(TransitError::MissingStop { bus, stop }) => {
                assert_eq!(bus, "7");
                assert_eq!(stop, "Ghost");
            }
            other => panic!("expected MissingStop, got {other:?}"),
        }
    }

    #[test]
    fn metrics_of_unknown_bus_is_none() {
        let stops = equator_stops();
        let buses = BusIndex::new();
        assert!(buses.metrics("404", &stops).unwrap().is_none());
    }

    proptest! {
        #[test]
        fn one_way_length_is_twice_minus_one(n in 1usize..40) {
            let stops: Vec<String> = (0..n).map(|i| format!("S{i}")).collect();
            let route = BusRoute::new("p", stops.clone(), false);
            prop_assert_eq!(route.stops.len(), 2 * n - 1);
            prop_assert_eq!(route.stops.first(), route.stops.last());
            prop_assert_eq!(&route.stops[..n], &stops[..]);
        }
    }
}
