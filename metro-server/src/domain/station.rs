//! Station types.

use std::fmt;

/// Integer position on the schematic map. Layout only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GraphPoint {
    pub x: i32,
    pub y: i32,
}

impl GraphPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Geographic position as (longitude, latitude) in degrees.
///
/// `(0, 0)` is what stations get when no real position is known; distances
/// involving such a station are meaningless but still computed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns true for the unset `(0, 0)` position.
    pub fn is_unset(&self) -> bool {
        self.lon == 0.0 && self.lat == 0.0
    }
}

/// Category tag carried in source data.
///
/// Advisory only: whether a station is really an interchange is derived from
/// the lines serving it (see `MetroGraph::is_transfer_station`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StationKind {
    #[default]
    Normal,
    Transfer,
    /// Any other tag found in source data, kept verbatim.
    Other(String),
}

impl StationKind {
    /// Parse a category tag. Empty input maps to `Normal`.
    pub fn parse(s: &str) -> Self {
        match s {
            "" | "normal" => StationKind::Normal,
            "transfer" => StationKind::Transfer,
            other => StationKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StationKind::Normal => "normal",
            StationKind::Transfer => "transfer",
            StationKind::Other(s) => s,
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metro station.
///
/// Names are case-sensitive and unique within a graph. `connected` lists the
/// names of directly connected stations; the graph keeps it symmetric, so it
/// is only populated through `MetroGraph` mutations. Anything set here before
/// `add_station` is discarded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Station {
    pub name: String,
    /// Label placement tag (e.g., "left", "right"), cosmetic
    pub tag: String,
    pub kind: StationKind,
    pub graph_position: GraphPoint,
    pub geo_position: GeoPoint,
    pub(crate) connected: Vec<String>,
}

impl Station {
    /// Creates a station with no connections, default tag and unset positions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the geographic position.
    pub fn with_geo(mut self, lon: f64, lat: f64) -> Self {
        self.geo_position = GeoPoint::new(lon, lat);
        self
    }

    /// Sets the schematic position.
    pub fn with_graph_position(mut self, x: i32, y: i32) -> Self {
        self.graph_position = GraphPoint::new(x, y);
        self
    }

    /// Sets the category tag.
    pub fn with_kind(mut self, kind: StationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the label placement tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Names of directly connected stations, in the order connections were made.
    pub fn connected_stations(&self) -> &[String] {
        &self.connected
    }

    /// Returns true if `other` is directly connected to this station.
    pub fn is_connected_to(&self, other: &str) -> bool {
        self.connected.iter().any(|s| s == other)
    }
}
