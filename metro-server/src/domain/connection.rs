//! Connections (edges) between stations.

use super::GraphPoint;

/// An unordered pair of station names in canonical order.
///
/// The lexicographically smaller name is always first, so `(A, B)` and
/// `(B, A)` compare and hash identically.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StationPair;
///
/// let ab = StationPair::new("Xujiahui", "Hongqiao");
/// let ba = StationPair::new("Hongqiao", "Xujiahui");
/// assert_eq!(ab, ba);
/// assert_eq!(ab.first(), "Hongqiao");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationPair(String, String);

impl StationPair {
    /// Build the canonical pair for two station names.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    /// The lexicographically smaller station.
    pub fn first(&self) -> &str {
        &self.0
    }

    /// The lexicographically larger station.
    pub fn second(&self) -> &str {
        &self.1
    }

    /// Returns true if `station` is one of the endpoints.
    pub fn contains(&self, station: &str) -> bool {
        self.0 == station || self.1 == station
    }
}

/// A direct link between two stations on one line.
///
/// `waypoints` are bend points for drawing the edge and play no part in
/// routing.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub stations: StationPair,
    pub line: String,
    pub waypoints: Vec<GraphPoint>,
}

impl Connection {
    pub fn new(stations: StationPair, line: impl Into<String>, waypoints: Vec<GraphPoint>) -> Self {
        Self {
            stations,
            line: line.into(),
            waypoints,
        }
    }

    /// Returns true if this connection links `a` and `b` (in either order).
    pub fn links(&self, a: &str, b: &str) -> bool {
        self.stations == StationPair::new(a, b)
    }
}
