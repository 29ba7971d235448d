//! Itinerary construction.
//!
//! Turns a raw station sequence into segments grouped by line, with a
//! transfer count and accumulated distance.

use std::fmt;

use tracing::{debug, warn};

use super::config::DistanceModel;
use super::search::Strategy;
use crate::graph::MetroGraph;

/// Line label used when a hop has no connection and no previous segment.
pub const UNKNOWN_LINE: &str = "unknown";

/// A run of consecutive hops on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub line: String,
    /// Boarding station (the transfer station for every segment but the first)
    pub from: String,
    /// Alighting station
    pub to: String,
    /// Every station on the segment, both ends included
    pub stations: Vec<String>,
}

/// The result of a route query.
///
/// An itinerary with `station_count == 0` means no route: either an endpoint
/// was unknown or the endpoints are not connected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Itinerary {
    pub segments: Vec<Segment>,
    /// The full station sequence.
    pub stations: Vec<String>,
    pub transfer_count: usize,
    /// Stations visited, both endpoints included.
    pub station_count: usize,
    /// Best effort for strategies other than shortest distance.
    pub total_distance_km: f64,
    /// The strategy that produced the route, if a search ran.
    pub strategy: Option<Strategy>,
    /// True when fewest-transfers could not complete and the route came from
    /// fewest-stations instead. Transfer count still describes this route.
    pub degraded: bool,
}

impl Itinerary {
    /// The "no route" itinerary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A zero-length trip that starts and ends at `station`.
    pub fn single(station: &str) -> Self {
        Self {
            stations: vec![station.to_string()],
            station_count: 1,
            ..Self::default()
        }
    }

    /// Returns true if this itinerary describes no route.
    pub fn is_empty(&self) -> bool {
        self.station_count == 0
    }

    pub fn origin(&self) -> Option<&str> {
        self.stations.first().map(String::as_str)
    }

    pub fn destination(&self) -> Option<&str> {
        self.stations.last().map(String::as_str)
    }

    /// Stations where the route changes line, in travel order.
    pub fn transfer_stations(&self) -> Vec<&str> {
        self.segments
            .iter()
            .skip(1)
            .map(|s| s.from.as_str())
            .collect()
    }

    /// Record which strategy produced this itinerary. A "no route" result
    /// stays untagged.
    pub(crate) fn tagged(mut self, strategy: Strategy, degraded: bool) -> Self {
        if self.is_empty() {
            return self;
        }
        self.strategy = Some(strategy);
        self.degraded = degraded;
        self
    }
}

/// Build an itinerary from an ordered station sequence.
///
/// Fewer than two stations yields an empty itinerary. A hop between stations
/// with no connection reuses the previous segment's line, or `UNKNOWN_LINE`
/// at the start of the route; it never aborts construction.
pub fn build_itinerary(
    graph: &MetroGraph,
    model: &DistanceModel,
    stations: &[String],
) -> Itinerary {
    if stations.len() < 2 {
        debug!(stations = stations.len(), "too few stations for an itinerary");
        return Itinerary::empty();
    }

    let mut segments = Vec::new();
    let mut transfer_count = 0;
    let mut total_distance_km = 0.0;

    let mut current = Segment {
        line: String::new(),
        from: stations[0].clone(),
        to: stations[0].clone(),
        stations: vec![stations[0].clone()],
    };

    for i in 1..stations.len() {
        let (prev, here) = (&stations[i - 1], &stations[i]);
        total_distance_km += model.station_distance(graph, prev, here);

        let current_line = (!current.line.is_empty()).then_some(current.line.as_str());
        let line = match hop_line(graph, current_line, stations, i) {
            Some(line) => line,
            None => {
                warn!(from = %prev, to = %here, "no connection between consecutive stations");
                current_line.unwrap_or(UNKNOWN_LINE).to_string()
            }
        };

        if current.line.is_empty() {
            current.line = line;
            current.to = here.clone();
            current.stations.push(here.clone());
        } else if current.line == line {
            current.to = here.clone();
            current.stations.push(here.clone());
        } else {
            let next_segment = Segment {
                line,
                from: prev.clone(),
                to: here.clone(),
                stations: vec![prev.clone(), here.clone()],
            };
            segments.push(std::mem::replace(&mut current, next_segment));
            transfer_count += 1;
        }
    }
    segments.push(current);

    debug!(
        segments = segments.len(),
        transfers = transfer_count,
        "built itinerary"
    );

    Itinerary {
        segments,
        stations: stations.to_vec(),
        transfer_count,
        station_count: stations.len(),
        total_distance_km,
        strategy: None,
        degraded: false,
    }
}

/// Pick the line for the hop from `stations[i - 1]` to `stations[i]`.
///
/// Stays on the current line while it serves the hop. Otherwise boards the
/// line serving the longest run of hops from here, taking the first
/// connection added on ties, so the transfer count is the fewest the station
/// sequence allows in either direction.
fn hop_line(
    graph: &MetroGraph,
    current: Option<&str>,
    stations: &[String],
    i: usize,
) -> Option<String> {
    let lines: Vec<&str> = graph
        .connections_between(&stations[i - 1], &stations[i])
        .into_iter()
        .map(|c| c.line.as_str())
        .collect();

    if let Some(current) = current.filter(|line| lines.contains(line)) {
        return Some(current.to_string());
    }

    let reach = |line: &str| {
        stations[i - 1..]
            .windows(2)
            .take_while(|hop| graph.connection_on(&hop[0], &hop[1], line).is_some())
            .count()
    };

    let mut best: Option<(&str, usize)> = None;
    for line in lines {
        let run = reach(line);
        if best.is_none_or(|(_, longest)| run > longest) {
            best = Some((line, run));
        }
    }
    best.map(|(line, _)| line.to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(destination) = self.destination() else {
            return f.write_str("No route found");
        };
        if self.segments.is_empty() {
            return write!(f, "Already at {destination}");
        }

        write!(
            f,
            "{}, {}",
            plural(self.station_count, "station"),
            plural(self.transfer_count, "transfer")
        )?;
        if self.strategy == Some(Strategy::ShortestDistance) {
            write!(f, ", {:.2} km", self.total_distance_km)?;
        }
        writeln!(f)?;

        for (i, segment) in self.segments.iter().enumerate() {
            if i == 0 {
                writeln!(f, "Board {} at {}", segment.line, segment.from)?;
            } else {
                writeln!(f, "Change to {} at {}", segment.line, segment.from)?;
            }
            writeln!(f, "Via: {}", segment.stations.join(" → "))?;
        }

        write!(f, "Arrive at {destination}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Line, Rgb, Station};

    fn names(stations: &[&str]) -> Vec<String> {
        stations.iter().map(|s| s.to_string()).collect()
    }

    /// L1: A - B - C, L2: C - D - E, 1 km apart along a parallel of latitude 0
    fn graph() -> MetroGraph {
        let mut graph = MetroGraph::new();
        for (i, name) in ["A", "B", "C", "D", "E"].iter().enumerate() {
            graph
                .add_station(Station::new(*name).with_geo(0.0, i as f64 / 111.0))
                .unwrap();
        }
        graph.add_station(Station::new("Z")).unwrap();
        graph
            .add_line_with_stations(Line::new("L1", Rgb::BLACK), &["A", "B", "C"])
            .unwrap();
        graph
            .add_line_with_stations(Line::new("L2", Rgb::BLACK), &["C", "D", "E"])
            .unwrap();
        graph
    }

    fn build(graph: &MetroGraph, stations: &[&str]) -> Itinerary {
        build_itinerary(graph, &DistanceModel::default(), &names(stations))
    }

    #[test]
    fn too_short_is_empty() {
        let graph = graph();
        assert!(build(&graph, &[]).is_empty());
        assert!(build(&graph, &["A"]).is_empty());
        assert_eq!(build(&graph, &["A"]).station_count, 0);
    }

    #[test]
    fn single_line() {
        let graph = graph();
        let itinerary = build(&graph, &["A", "B", "C"]);

        assert_eq!(itinerary.segments.len(), 1);
        assert_eq!(itinerary.transfer_count, 0);
        assert_eq!(itinerary.station_count, 3);
        let segment = &itinerary.segments[0];
        assert_eq!(segment.line, "L1");
        assert_eq!((segment.from.as_str(), segment.to.as_str()), ("A", "C"));
        assert_eq!(segment.stations, ["A", "B", "C"]);
    }

    #[test]
    fn transfer_splits_segments() {
        let graph = graph();
        let itinerary = build(&graph, &["A", "B", "C", "D", "E"]);

        assert_eq!(itinerary.transfer_count, 1);
        assert_eq!(itinerary.station_count, 5);
        assert_eq!(itinerary.segments.len(), 2);
        assert_eq!(itinerary.segments[0].stations, ["A", "B", "C"]);
        assert_eq!(itinerary.segments[1].line, "L2");
        assert_eq!(itinerary.segments[1].stations, ["C", "D", "E"]);
        assert_eq!(itinerary.transfer_stations(), ["C"]);
        assert!((itinerary.total_distance_km - 4.0).abs() < 1e-9);
    }

    #[test]
    fn missing_connection_reuses_previous_line() {
        let graph = graph();
        // B - D has no connection
        let itinerary = build(&graph, &["A", "B", "D", "E"]);

        assert_eq!(itinerary.segments[0].line, "L1");
        assert_eq!(itinerary.segments[0].stations, ["A", "B", "D"]);
        assert_eq!(itinerary.segments[1].line, "L2");
        assert_eq!(itinerary.transfer_count, 1);
    }

    #[test]
    fn missing_connection_at_start_is_unknown() {
        let graph = graph();
        let itinerary = build(&graph, &["Z", "A", "B"]);

        assert_eq!(itinerary.segments[0].line, UNKNOWN_LINE);
        assert_eq!(itinerary.segments[1].line, "L1");
        assert_eq!(itinerary.transfer_count, 1);
        assert_eq!(itinerary.station_count, 3);
    }

    #[test]
    fn shared_pair_prefers_current_line() {
        let mut graph = graph();
        graph.add_line(Line::new("Express", Rgb::BLACK)).unwrap();
        graph.add_connection("B", "C", "Express", vec![]).unwrap();
        graph.add_connection("C", "D", "Express", vec![]).unwrap();

        // A-B is only L1, so B-C stays on L1 rather than switching to Express
        let itinerary = build(&graph, &["A", "B", "C"]);
        assert_eq!(itinerary.transfer_count, 0);
        assert_eq!(itinerary.segments[0].line, "L1");
    }

    #[test]
    fn shared_pair_looks_ahead() {
        let mut graph = graph();
        graph.add_line(Line::new("Express", Rgb::BLACK)).unwrap();
        graph.add_connection("B", "C", "Express", vec![]).unwrap();
        graph.add_connection("C", "E", "Express", vec![]).unwrap();

        // B-C is served by L1 (added first) and Express; C-E only by Express
        let itinerary = build(&graph, &["B", "C", "E"]);
        assert_eq!(itinerary.transfer_count, 0);
        assert_eq!(itinerary.segments[0].line, "Express");
    }

    #[test]
    fn shared_pair_boards_longest_run() {
        let mut graph = graph();
        graph.add_line(Line::new("Express", Rgb::BLACK)).unwrap();
        graph.add_connection("A", "B", "Express", vec![]).unwrap();
        graph.add_connection("B", "C", "Express", vec![]).unwrap();
        graph.add_connection("C", "D", "Express", vec![]).unwrap();

        // A-B and B-C are served by L1 and Express; only Express goes on to D
        let itinerary = build(&graph, &["A", "B", "C", "D"]);
        assert_eq!(itinerary.transfer_count, 0);
        assert_eq!(itinerary.segments[0].line, "Express");

        let reversed = build(&graph, &["D", "C", "B", "A"]);
        assert_eq!(reversed.transfer_count, 0);
        assert_eq!(reversed.segments[0].line, "Express");
    }

    #[test]
    fn no_route_stays_untagged() {
        let itinerary = Itinerary::empty().tagged(Strategy::FewestStations, true);
        assert_eq!(itinerary.strategy, None);
        assert!(!itinerary.degraded);

        let itinerary = Itinerary::single("A").tagged(Strategy::FewestStations, false);
        assert_eq!(itinerary.strategy, Some(Strategy::FewestStations));
    }

    #[test]
    fn single_station_itinerary() {
        let itinerary = Itinerary::single("A");
        assert!(!itinerary.is_empty());
        assert_eq!(itinerary.station_count, 1);
        assert_eq!(itinerary.transfer_count, 0);
        assert!(itinerary.segments.is_empty());
        assert_eq!(itinerary.origin(), Some("A"));
    }

    #[test]
    fn display_guide() {
        let graph = graph();
        let itinerary =
            build(&graph, &["A", "B", "C", "D", "E"]).tagged(Strategy::ShortestDistance, false);

        assert_eq!(
            itinerary.to_string(),
            "5 stations, 1 transfer, 4.00 km\n\
             Board L1 at A\n\
             Via: A → B → C\n\
             Change to L2 at C\n\
             Via: C → D → E\n\
             Arrive at E"
        );
    }

    #[test]
    fn display_without_distance() {
        let graph = graph();
        let itinerary = build(&graph, &["A", "B"]).tagged(Strategy::FewestStations, false);

        assert_eq!(
            itinerary.to_string(),
            "2 stations, 0 transfers\nBoard L1 at A\nVia: A → B\nArrive at B"
        );
    }

    #[test]
    fn display_edge_cases() {
        assert_eq!(Itinerary::empty().to_string(), "No route found");
        assert_eq!(Itinerary::single("A").to_string(), "Already at A");
    }
}
