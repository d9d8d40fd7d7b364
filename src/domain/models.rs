use serde::Serialize;

use super::error::{Result, TransitError};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const METERS_PER_KM: f64 = 1000.0;
const MINUTES_PER_HOUR: f64 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.to_radians(),
            longitude: longitude.to_radians(),
        }
    }
}

/// Great-circle distance in meters by the spherical law of cosines.
pub fn great_circle_distance(a: Coordinates, b: Coordinates) -> f64 {
    // acos is imprecise near 1
    if a == b {
        return 0.0;
    }
    let cos_angle = a.latitude.sin() * b.latitude.sin()
        + a.latitude.cos() * b.latitude.cos() * (a.longitude - b.longitude).abs().cos();
    // Rounding can push nearly identical points just above 1.0
    cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteSettings {
    pub bus_wait_time: f64,
    // m/min
    pub bus_velocity: f64,
}

impl RouteSettings {
    pub fn from_kmh(bus_wait_time: f64, velocity_kmh: f64) -> Self {
        Self {
            bus_wait_time,
            bus_velocity: velocity_kmh * METERS_PER_KM / MINUTES_PER_HOUR,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bus_wait_time.is_finite() || self.bus_wait_time < 0.0 {
            return Err(TransitError::InvalidSettings(
                "bus wait time must be a non-negative number",
            ));
        }
        if !self.bus_velocity.is_finite() || self.bus_velocity <= 0.0 {
            return Err(TransitError::InvalidSettings("bus velocity must be positive"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeInfo {
    pub bus: String,
    pub span_count: usize,
    /// Riding time only, without the boarding wait.
    pub ride_time: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum RouteItem {
    Wait { stop_name: String, time: f64 },
    Bus { bus: String, span_count: usize, time: f64 },
}

impl RouteItem {
    pub fn time(&self) -> f64 {
        match self {
            RouteItem::Wait { time, .. } | RouteItem::Bus { time, .. } => *time,
        }
    }

    pub fn is_wait(&self) -> bool {
        matches!(self, RouteItem::Wait { .. })
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Itinerary {
    pub total_time: f64,
    pub items: Vec<RouteItem>,
}

impl Itinerary {
    pub fn empty() -> Self {
        Self {
            total_time: 0.0,
            items: Vec::new(),
        }
    }

    pub fn ride_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_wait()).count()
    }
}
