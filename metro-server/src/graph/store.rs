//! The metro graph store.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use super::topology::LineTopology;
use crate::domain::{Connection, GraphError, GraphPoint, Line, Station, StationPair};

/// Outcome of adding a line together with its station sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAddReport {
    /// Consecutive pairs that were connected.
    pub connected: usize,
    /// Consecutive pairs that were rejected, with the reason.
    pub rejected: Vec<(String, String, GraphError)>,
}

/// A metro network: lines, stations and the connections between them.
///
/// The graph owns every entity. Mutations go through `add_line`,
/// `add_station` and `add_connection`, which keep the following invariants:
///
/// - line and station names are unique
/// - every connection references existing stations and an existing line
/// - at most one connection exists per (station pair, line)
/// - station adjacency is symmetric: if A lists B, B lists A
///
/// A rejected mutation leaves the graph unchanged.
#[derive(Debug, Clone, Default)]
pub struct MetroGraph {
    lines: Vec<Line>,
    line_index: HashMap<String, usize>,
    stations: Vec<Station>,
    station_index: HashMap<String, usize>,
    connections: Vec<Connection>,
    connection_index: HashMap<(StationPair, String), usize>,
}

impl MetroGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line. Rejected if a line with the same name exists.
    pub fn add_line(&mut self, line: Line) -> Result<(), GraphError> {
        if line.name.is_empty() {
            return Err(GraphError::EmptyName);
        }
        if self.line_index.contains_key(&line.name) {
            warn!(line = %line.name, "line already exists");
            return Err(GraphError::DuplicateLine(line.name));
        }

        debug!(line = %line.name, "added line");
        self.line_index.insert(line.name.clone(), self.lines.len());
        self.lines.push(line);
        Ok(())
    }

    /// Add a station. Rejected if a station with the same name exists.
    ///
    /// Connections listed on the incoming station are ignored; use
    /// `add_connection` to link it into the network.
    pub fn add_station(&mut self, mut station: Station) -> Result<(), GraphError> {
        if station.name.is_empty() {
            return Err(GraphError::EmptyName);
        }
        if self.station_index.contains_key(&station.name) {
            warn!(station = %station.name, "station already exists");
            return Err(GraphError::DuplicateStation(station.name));
        }

        station.connected.clear();
        debug!(station = %station.name, "added station");
        self.station_index
            .insert(station.name.clone(), self.stations.len());
        self.stations.push(station);
        Ok(())
    }

    /// Connect two stations on a line.
    ///
    /// Rejected if either station or the line is unknown, if `a == b`, or if
    /// the two stations are already connected on this line. A different line
    /// connecting the same pair is accepted.
    pub fn add_connection(
        &mut self,
        a: &str,
        b: &str,
        line: &str,
        waypoints: Vec<GraphPoint>,
    ) -> Result<(), GraphError> {
        let result = self.check_connection(a, b, line);
        if let Err(e) = &result {
            warn!(a, b, line, error = %e, "rejected connection");
        }
        result?;

        self.insert_connection(Connection::new(StationPair::new(a, b), line, waypoints));
        debug!(a, b, line, "added connection");
        Ok(())
    }

    pub(super) fn check_connection(
        &self,
        a: &str,
        b: &str,
        line: &str,
    ) -> Result<(), GraphError> {
        for station in [a, b] {
            if !self.has_station(station) {
                return Err(GraphError::UnknownStation(station.to_string()));
            }
        }
        if !self.has_line(line) {
            return Err(GraphError::UnknownLine(line.to_string()));
        }
        if a == b {
            return Err(GraphError::SelfConnection(a.to_string()));
        }
        let key = (StationPair::new(a, b), line.to_string());
        if self.connection_index.contains_key(&key) {
            let (pair, line) = key;
            return Err(GraphError::DuplicateConnection(
                pair.first().to_string(),
                pair.second().to_string(),
                line,
            ));
        }
        Ok(())
    }

    /// Insert a validated connection and update adjacency on both ends.
    pub(super) fn insert_connection(&mut self, connection: Connection) {
        let pair = connection.stations.clone();
        self.connection_index.insert(
            (pair.clone(), connection.line.clone()),
            self.connections.len(),
        );
        self.connections.push(connection);

        for (from, to) in [(pair.first(), pair.second()), (pair.second(), pair.first())] {
            if let Some(&idx) = self.station_index.get(from) {
                let station = &mut self.stations[idx];
                if !station.is_connected_to(to) {
                    station.connected.push(to.to_string());
                }
            }
        }
    }

    /// Replace the waypoints of an existing connection when `waypoints` is
    /// strictly more detailed. Returns true if the connection was updated.
    pub(super) fn refine_waypoints(
        &mut self,
        a: &str,
        b: &str,
        line: &str,
        waypoints: Vec<GraphPoint>,
    ) -> bool {
        let key = (StationPair::new(a, b), line.to_string());
        match self.connection_index.get(&key) {
            Some(&idx) if waypoints.len() > self.connections[idx].waypoints.len() => {
                self.connections[idx].waypoints = waypoints;
                true
            }
            _ => false,
        }
    }

    /// Add a line and connect each consecutive pair of `stations` on it.
    ///
    /// Fails only if the line itself is rejected. Pairs that cannot be
    /// connected are skipped and listed in the report.
    pub fn add_line_with_stations<S: AsRef<str>>(
        &mut self,
        line: Line,
        stations: &[S],
    ) -> Result<LineAddReport, GraphError> {
        let name = line.name.clone();
        self.add_line(line)?;

        let mut report = LineAddReport::default();
        for pair in stations.windows(2) {
            let (a, b) = (pair[0].as_ref(), pair[1].as_ref());
            match self.add_connection(a, b, &name, Vec::new()) {
                Ok(()) => report.connected += 1,
                Err(e) => report.rejected.push((a.to_string(), b.to_string(), e)),
            }
        }
        Ok(report)
    }

    /// Returns true if a station with this name exists.
    pub fn has_station(&self, name: &str) -> bool {
        self.station_index.contains_key(name)
    }

    /// Returns true if a line with this name exists.
    pub fn has_line(&self, name: &str) -> bool {
        self.line_index.contains_key(name)
    }

    /// Look up a station by name.
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.station_index.get(name).map(|&idx| &self.stations[idx])
    }

    /// Look up a line by name.
    pub fn line(&self, name: &str) -> Option<&Line> {
        self.line_index.get(name).map(|&idx| &self.lines[idx])
    }

    /// The first connection added between two stations, in either order.
    pub fn connection(&self, a: &str, b: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.links(a, b))
    }

    /// Every connection between two stations, one per line, in insertion order.
    pub fn connections_between(&self, a: &str, b: &str) -> Vec<&Connection> {
        self.connections.iter().filter(|c| c.links(a, b)).collect()
    }

    /// The connection between two stations on a specific line.
    pub fn connection_on(&self, a: &str, b: &str, line: &str) -> Option<&Connection> {
        self.connection_index
            .get(&(StationPair::new(a, b), line.to_string()))
            .map(|&idx| &self.connections[idx])
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// All stations in insertion order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// All connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Station names in insertion order.
    pub fn station_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stations.iter().map(|s| s.name.as_str())
    }

    /// Station names sorted lexicographically.
    pub fn sorted_station_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.station_names().collect();
        names.sort_unstable();
        names
    }

    /// Names of stations directly connected to `name` (empty if unknown).
    pub fn neighbors(&self, name: &str) -> &[String] {
        self.station(name)
            .map(|s| s.connected_stations())
            .unwrap_or_default()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Lines serving a station, in order of first appearance among connections.
    pub fn lines_at(&self, station: &str) -> Vec<&str> {
        let mut lines: Vec<&str> = Vec::new();
        for conn in self.connections.iter().filter(|c| c.stations.contains(station)) {
            if !lines.contains(&conn.line.as_str()) {
                lines.push(&conn.line);
            }
        }
        lines
    }

    /// Map from every connected station to the lines serving it.
    ///
    /// Derived from the connection set on each call.
    pub fn station_lines(&self) -> HashMap<&str, Vec<&str>> {
        let mut map: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for conn in &self.connections {
            for station in [conn.stations.first(), conn.stations.second()] {
                if seen.insert((station, conn.line.as_str())) {
                    map.entry(station).or_default().push(&conn.line);
                }
            }
        }
        map
    }

    /// Returns true if the station is served by more than one line.
    ///
    /// This is derived from connections and ignores the station's category tag.
    pub fn is_transfer_station(&self, station: &str) -> bool {
        self.lines_at(station).len() > 1
    }

    /// Ordered station list for every line.
    ///
    /// Recomputed from the connection set on each call, so it always reflects
    /// the current graph. Lines without connections map to an empty list.
    pub fn line_stations(&self) -> BTreeMap<String, Vec<String>> {
        LineTopology::build_all(self)
            .into_iter()
            .map(LineTopology::into_parts)
            .collect()
    }
}
