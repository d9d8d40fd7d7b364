pub mod buses;
pub mod error;
pub mod models;
pub mod stops;

pub use buses::{BusIndex, BusRoute, RouteMetrics};
pub use error::{Result, TransitError};
pub use models::{
    great_circle_distance, Coordinates, EdgeInfo, Itinerary, RouteItem, RouteSettings,
    EARTH_RADIUS_M,
};
pub use stops::{Stop, StopIndex};
