//! Distance configuration for the route planner.

use crate::domain::GeoPoint;
use crate::graph::MetroGraph;

/// Distance reported between stations that cannot be looked up.
const MISSING_STATION_DISTANCE_KM: f64 = 1.0;

/// Planar approximation for converting degree offsets to kilometres.
///
/// Longitude offsets are scaled by the cosine of a single reference latitude,
/// which is accurate enough across one city.
#[derive(Debug, Clone)]
pub struct DistanceModel {
    /// Latitude (degrees) at which longitude degrees are measured.
    pub reference_latitude_deg: f64,

    /// Kilometres per degree of latitude.
    pub km_per_degree: f64,
}

impl DistanceModel {
    /// Create a new model with the given parameters.
    pub fn new(reference_latitude_deg: f64, km_per_degree: f64) -> Self {
        Self {
            reference_latitude_deg,
            km_per_degree,
        }
    }

    /// Kilometres per degree of longitude at the reference latitude.
    pub fn km_per_degree_lon(&self) -> f64 {
        self.km_per_degree * self.reference_latitude_deg.to_radians().cos()
    }

    /// Approximate distance in kilometres between two positions.
    pub fn between(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let dx = (a.lon - b.lon) * self.km_per_degree_lon();
        let dy = (a.lat - b.lat) * self.km_per_degree;
        dx.hypot(dy)
    }

    /// Approximate distance in kilometres between two stations of `graph`.
    ///
    /// Unknown stations count as a fixed 1 km so a route through bad data
    /// still accumulates something.
    pub fn station_distance(&self, graph: &MetroGraph, a: &str, b: &str) -> f64 {
        match (graph.station(a), graph.station(b)) {
            (Some(a), Some(b)) => self.between(a.geo_position, b.geo_position),
            _ => MISSING_STATION_DISTANCE_KM,
        }
    }
}

impl Default for DistanceModel {
    fn default() -> Self {
        Self {
            reference_latitude_deg: 31.0, // Shanghai
            km_per_degree: 111.0,
        }
    }
}
