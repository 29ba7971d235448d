//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{GraphPoint, Line, Station, StationKind};
use crate::graph::{LineAddReport, LineTopology, MetroGraph};
use crate::planner::{Itinerary, Segment};

/// A station in listings.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,

    /// Free-form label from the source data
    pub tag: String,

    /// Category tag ("normal", "transfer" or whatever the data said)
    #[serde(rename = "type")]
    pub kind: String,

    /// Lines serving this station, in line order
    pub lines: Vec<String>,

    /// Whether two or more lines serve this station
    pub is_transfer: bool,

    /// Schematic map position as [x, y]
    pub graph_position: [i32; 2],

    /// Geographic position as [longitude, latitude]
    pub geo_position: [f64; 2],
}

impl StationResult {
    pub fn from_station(station: &Station, graph: &MetroGraph) -> Self {
        Self {
            name: station.name.clone(),
            tag: station.tag.clone(),
            kind: station.kind.as_str().to_string(),
            lines: graph
                .lines_at(&station.name)
                .into_iter()
                .map(str::to_string)
                .collect(),
            is_transfer: graph.is_transfer_station(&station.name),
            graph_position: [station.graph_position.x, station.graph_position.y],
            geo_position: [station.geo_position.lon, station.geo_position.lat],
        }
    }
}

/// Response listing every station.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    pub stations: Vec<StationResult>,
}

/// A line in listings.
#[derive(Debug, Serialize)]
pub struct LineResult {
    pub name: String,

    /// Colour as "#rrggbb"
    pub color: String,

    /// Number of stations the line serves
    pub station_count: usize,
}

impl LineResult {
    pub fn from_line(line: &Line, graph: &MetroGraph) -> Self {
        Self {
            name: line.name.clone(),
            color: line.color.to_string(),
            station_count: LineTopology::build(graph, &line.name).len(),
        }
    }
}

/// Response listing every line.
#[derive(Debug, Serialize)]
pub struct LineListResponse {
    pub lines: Vec<LineResult>,
}

/// Stations of one line in display order.
#[derive(Debug, Serialize)]
pub struct LineStationsResponse {
    pub line: String,
    pub stations: Vec<String>,

    /// True if the line forks, in which case `stations` shows only the
    /// longest walk and some stations may be missing from it
    pub branched: bool,
}

impl LineStationsResponse {
    pub fn from_topology(topology: &LineTopology) -> Self {
        Self {
            line: topology.line().to_string(),
            stations: topology.stations().to_vec(),
            branched: topology.is_branched(),
        }
    }
}

/// Query for a route between two stations.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub from: String,
    pub to: String,

    /// One of "fewest_transfers" (default), "fewest_stations",
    /// "shortest_distance"
    pub strategy: Option<String>,
}

/// A single-line run within a route.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub line: String,
    pub from: String,
    pub to: String,
    pub stations: Vec<String>,
}

impl SegmentResult {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            line: segment.line.clone(),
            from: segment.from.clone(),
            to: segment.to.clone(),
            stations: segment.stations.clone(),
        }
    }
}

/// Response for a route query.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// False when the stations are not connected
    pub found: bool,

    /// Strategy that produced the route
    pub strategy: Option<String>,

    /// True when the requested strategy could not be satisfied and a
    /// fewest-stations route was returned instead
    pub degraded: bool,

    pub station_count: usize,
    pub transfer_count: usize,
    pub total_distance_km: f64,
    pub stations: Vec<String>,
    pub segments: Vec<SegmentResult>,

    /// Human-readable directions
    pub guide: String,
}

impl RouteResponse {
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            found: !itinerary.is_empty(),
            strategy: itinerary.strategy.map(|s| s.as_str().to_string()),
            degraded: itinerary.degraded,
            station_count: itinerary.station_count,
            transfer_count: itinerary.transfer_count,
            total_distance_km: itinerary.total_distance_km,
            stations: itinerary.stations.clone(),
            segments: itinerary
                .segments
                .iter()
                .map(SegmentResult::from_segment)
                .collect(),
            guide: itinerary.to_string(),
        }
    }
}

/// Request to add a line, optionally with its stations in order.
#[derive(Debug, Deserialize)]
pub struct CreateLineRequest {
    pub name: String,

    /// Colour as [r, g, b]; black if omitted
    pub color: Option<Vec<i64>>,

    /// Existing stations to connect in sequence on the new line
    #[serde(default)]
    pub stations: Vec<String>,
}

/// A consecutive pair that could not be connected.
#[derive(Debug, Serialize)]
pub struct RejectedPair {
    pub from: String,
    pub to: String,
    pub reason: String,
}

/// Response after adding a line.
#[derive(Debug, Serialize)]
pub struct CreateLineResponse {
    pub line: String,
    pub connected: usize,
    pub rejected: Vec<RejectedPair>,
}

impl CreateLineResponse {
    pub fn from_report(line: &str, report: &LineAddReport) -> Self {
        Self {
            line: line.to_string(),
            connected: report.connected,
            rejected: report
                .rejected
                .iter()
                .map(|(from, to, e)| RejectedPair {
                    from: from.clone(),
                    to: to.clone(),
                    reason: e.to_string(),
                })
                .collect(),
        }
    }
}

/// Request to add a station.
#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    pub name: String,

    #[serde(default)]
    pub tag: String,

    #[serde(default, rename = "type")]
    pub kind: String,

    /// Schematic map position as [x, y]
    pub graph_position: Option<[i32; 2]>,

    /// Geographic position as [longitude, latitude]
    pub geo_position: Option<[f64; 2]>,
}

impl CreateStationRequest {
    pub fn to_station(&self) -> Station {
        let mut station = Station::new(self.name.clone())
            .with_tag(self.tag.clone())
            .with_kind(StationKind::parse(&self.kind));
        if let Some([x, y]) = self.graph_position {
            station = station.with_graph_position(x, y);
        }
        if let Some([lon, lat]) = self.geo_position {
            station = station.with_geo(lon, lat);
        }
        station
    }
}

/// Request to connect two stations on a line.
#[derive(Debug, Deserialize)]
pub struct CreateConnectionRequest {
    pub from: String,
    pub to: String,
    pub line: String,

    /// Schematic bend points as [[x, y], ...]
    #[serde(default)]
    pub waypoints: Vec<[i32; 2]>,
}

impl CreateConnectionRequest {
    pub fn waypoints(&self) -> Vec<GraphPoint> {
        self.waypoints
            .iter()
            .map(|&[x, y]| GraphPoint::new(x, y))
            .collect()
    }
}

/// Response after adding a connection.
#[derive(Debug, Serialize)]
pub struct ConnectionResult {
    pub from: String,
    pub to: String,
    pub line: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, Rgb};
    use crate::planner::{DistanceModel, Planner, Strategy};

    fn graph() -> MetroGraph {
        let mut graph = MetroGraph::new();
        for name in ["A", "B", "C", "D"] {
            graph.add_station(Station::new(name)).unwrap();
        }
        graph
            .add_line_with_stations(Line::new("L1", Rgb::new(228, 0, 43)), &["A", "B", "C"])
            .unwrap();
        graph
            .add_line_with_stations(Line::new("L2", Rgb::BLACK), &["C", "D"])
            .unwrap();
        graph
    }

    #[test]
    fn station_result_from_station() {
        let graph = graph();
        let result = StationResult::from_station(graph.station("C").unwrap(), &graph);

        assert_eq!(result.name, "C");
        assert_eq!(result.kind, "normal");
        assert_eq!(result.lines, ["L1", "L2"]);
        assert!(result.is_transfer);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "normal");
        assert_eq!(json["graph_position"], serde_json::json!([0, 0]));
    }

    #[test]
    fn line_result_from_line() {
        let graph = graph();
        let result = LineResult::from_line(graph.line("L1").unwrap(), &graph);

        assert_eq!(result.color, "#e4002b");
        assert_eq!(result.station_count, 3);
    }

    #[test]
    fn route_response_from_itinerary() {
        let graph = graph();
        let model = DistanceModel::default();
        let planner = Planner::new(&graph, &model);
        let itinerary = planner.find_path("A", "D", Strategy::FewestTransfers);
        let response = RouteResponse::from_itinerary(&itinerary);

        assert!(response.found);
        assert_eq!(response.strategy.as_deref(), Some("fewest_transfers"));
        assert!(!response.degraded);
        assert_eq!(response.stations, ["A", "B", "C", "D"]);
        assert_eq!(response.segments.len(), 2);
        assert_eq!(response.segments[1].line, "L2");
        assert!(response.guide.starts_with("4 stations, 1 transfer"));
    }

    #[test]
    fn empty_route_response() {
        let response = RouteResponse::from_itinerary(&Itinerary::empty());
        assert!(!response.found);
        assert_eq!(response.strategy, None);
        assert!(response.stations.is_empty());
        assert_eq!(response.guide, "No route found");
    }

    #[test]
    fn create_station_request_defaults() {
        let req: CreateStationRequest = serde_json::from_str(r#"{"name": "E"}"#).unwrap();
        let station = req.to_station();

        assert_eq!(station.name, "E");
        assert_eq!(station.kind, StationKind::Normal);
        assert!(station.geo_position.is_unset());
    }

    #[test]
    fn create_station_request_full() {
        let req: CreateStationRequest = serde_json::from_str(
            r#"{"name": "E", "tag": "north", "type": "transfer",
                "graph_position": [3, 4], "geo_position": [121.5, 31.2]}"#,
        )
        .unwrap();
        let station = req.to_station();

        assert_eq!(station.tag, "north");
        assert_eq!(station.kind, StationKind::Transfer);
        assert_eq!(station.graph_position, GraphPoint::new(3, 4));
        assert_eq!(station.geo_position, GeoPoint::new(121.5, 31.2));
    }

    #[test]
    fn create_connection_waypoints() {
        let req: CreateConnectionRequest = serde_json::from_str(
            r#"{"from": "A", "to": "B", "line": "L1", "waypoints": [[1, 2], [3, 4]]}"#,
        )
        .unwrap();
        assert_eq!(
            req.waypoints(),
            [GraphPoint::new(1, 2), GraphPoint::new(3, 4)]
        );

        let req: CreateConnectionRequest =
            serde_json::from_str(r#"{"from": "A", "to": "B", "line": "L1"}"#).unwrap();
        assert!(req.waypoints().is_empty());
    }

    #[test]
    fn create_line_response_lists_rejections() {
        let mut graph = graph();
        let report = graph
            .add_line_with_stations(Line::new("L3", Rgb::BLACK), &["A", "Nowhere", "D"])
            .unwrap();
        let response = CreateLineResponse::from_report("L3", &report);

        assert_eq!(response.connected, 0);
        assert_eq!(response.rejected.len(), 2);
        assert_eq!(response.rejected[0].to, "Nowhere");
        assert_eq!(response.rejected[0].reason, "unknown station: Nowhere");
    }
}
