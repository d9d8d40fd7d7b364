use std::collections::BTreeSet;

use hashbrown::HashMap;

use super::error::{Result, TransitError};
use super::models::Coordinates;

#[derive(Clone, Debug, Default)]
pub struct Stop {
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub buses: BTreeSet<String>,
    pub road_distances: HashMap<String, f64>,
}

impl Stop {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    pub fn is_defined(&self) -> bool {
        self.coordinates.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct StopIndex {
    stops: Vec<Stop>,
    positions: HashMap<String, usize>,
}

impl StopIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an undefined stop when `name` is new.
    pub fn ensure(&mut self, name: &str) -> usize {
        if let Some(&pos) = self.positions.get(name) {
            return pos;
        }
        let pos = self.stops.len();
        self.stops.push(Stop::new(name));
        self.positions.insert(name.to_owned(), pos);
        pos
    }

    pub fn upsert<I>(&mut self, name: &str, coordinates: Coordinates, road_distances: I)
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let pos = self.ensure(name);
        let stop = &mut self.stops[pos];
        stop.coordinates = Some(coordinates);
        stop.road_distances.extend(road_distances);
    }

    pub fn add_bus(&mut self, stop: &str, bus: &str) {
        let pos = self.ensure(stop);
        self.stops[pos].buses.insert(bus.to_owned());
    }

    pub fn remove_bus(&mut self, stop: &str, bus: &str) {
        if let Some(&pos) = self.positions.get(stop) {
            self.stops[pos].buses.remove(bus);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Stop> {
        self.positions.get(name).map(|&pos| &self.stops[pos])
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some_and(Stop::is_defined)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Directed distance `from -> to`, falling back to `to -> from`.
    pub fn explicit_distance(&self, from: &str, to: &str) -> Option<f64> {
        let forward = self.get(from)?.road_distances.get(to).copied();
        forward.or_else(|| self.get(to)?.road_distances.get(from).copied())
    }

    pub fn distance(&self, from: &str, to: &str) -> Result<f64> {
        for name in [from, to] {
            if self.get(name).is_none() {
                return Err(TransitError::UnknownStop(name.to_owned()));
            }
        }
        self.explicit_distance(from, to)
            .ok_or_else(|| TransitError::MissingDistance {
                from: from.to_owned(),
                to: to.to_owned(),
            })
    }
}
