//! Per-line topology.
//!
//! Connections are stored as an unordered edge set, so "the stations of line
//! L in order" has to be reconstructed. Each `LineTopology` keeps two views of
//! a line:
//!
//! - the line's own sub-graph (stations joined by connections on this line),
//!   which in-line routing walks directly and which handles branches exactly;
//! - a display order, chosen as the longest traversal from a candidate
//!   endpoint. On a forked line this order is a best effort.

use std::collections::{HashMap, HashSet, VecDeque};

use super::MetroGraph;

/// Stations and adjacency of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTopology {
    line: String,
    /// Stations in order of first appearance among the line's connections.
    members: Vec<String>,
    adjacency: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl LineTopology {
    /// Build the topology of `line` from the graph's current connections.
    ///
    /// A line with no connections yields an empty topology.
    pub fn build(graph: &MetroGraph, line: &str) -> Self {
        let mut members: Vec<String> = Vec::new();
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();

        for conn in graph.connections().iter().filter(|c| c.line == line) {
            let (a, b) = (conn.stations.first(), conn.stations.second());
            for (from, to) in [(a, b), (b, a)] {
                let neighbors = adjacency.entry(from.to_string()).or_insert_with(|| {
                    members.push(from.to_string());
                    Vec::new()
                });
                neighbors.push(to.to_string());
            }
        }

        let order = longest_traversal(&members, &adjacency);

        Self {
            line: line.to_string(),
            members,
            adjacency,
            order,
        }
    }

    /// Build the topology of every line in the graph, in line order.
    pub fn build_all(graph: &MetroGraph) -> Vec<Self> {
        graph
            .lines()
            .iter()
            .map(|line| Self::build(graph, &line.name))
            .collect()
    }

    /// The line name.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Stations in display order.
    pub fn stations(&self) -> &[String] {
        &self.order
    }

    /// Every station on the line, in order of first appearance among its
    /// connections. Unlike `stations`, this never omits a station.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Returns true if the line serves `station`.
    pub fn contains(&self, station: &str) -> bool {
        self.adjacency.contains_key(station)
    }

    /// Neighbours of `station` on this line.
    pub fn neighbors(&self, station: &str) -> &[String] {
        self.adjacency
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Position of `station` in display order.
    pub fn position(&self, station: &str) -> Option<usize> {
        self.order.iter().position(|s| s == station)
    }

    /// Returns true if any station has more than two neighbours on this line.
    pub fn is_branched(&self) -> bool {
        self.adjacency.values().any(|n| n.len() > 2)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Shortest station sequence from `from` to `to` using only this line's
    /// connections, both ends included.
    ///
    /// Returns `None` if either station is not on the line or the line's
    /// sub-graph does not connect them.
    pub fn path_between(&self, from: &str, to: &str) -> Option<Vec<String>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }

        let mut came_from: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::from([from]);
        let mut queue: VecDeque<&str> = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![current.to_string()];
                let mut node = current;
                while let Some(&prev) = came_from.get(node) {
                    path.push(prev.to_string());
                    node = prev;
                }
                path.reverse();
                return Some(path);
            }

            for neighbor in self.neighbors(current) {
                if visited.insert(neighbor) {
                    came_from.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Split into the line name and its display order.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.line, self.order)
    }
}

/// Stations to start a traversal from: line ends (one neighbour) and branch
/// points (more than two). Topped up with arbitrary members when fewer than
/// two are found, e.g. on a loop line.
fn endpoint_candidates<'a>(
    members: &'a [String],
    adjacency: &HashMap<String, Vec<String>>,
) -> Vec<&'a str> {
    let mut candidates: Vec<&str> = members
        .iter()
        .filter(|s| {
            let degree = adjacency.get(s.as_str()).map_or(0, Vec::len);
            degree == 1 || degree > 2
        })
        .map(String::as_str)
        .collect();

    for station in members {
        if candidates.len() >= 2 {
            break;
        }
        if !candidates.contains(&station.as_str()) {
            candidates.push(station);
        }
    }

    candidates
}

/// Depth-first traversal from `start`, visiting each station once.
fn traverse(start: &str, adjacency: &HashMap<String, Vec<String>>) -> Vec<String> {
    let mut order = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![start];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        order.push(current.to_string());

        if let Some(neighbors) = adjacency.get(current) {
            // Reversed so the first-listed neighbour is explored first
            for neighbor in neighbors.iter().rev() {
                if !visited.contains(neighbor.as_str()) {
                    stack.push(neighbor);
                }
            }
        }
    }

    order
}

/// The longest traversal over all candidate starts. Ties keep the earliest.
fn longest_traversal(members: &[String], adjacency: &HashMap<String, Vec<String>>) -> Vec<String> {
    let mut longest: Vec<String> = Vec::new();
    for start in endpoint_candidates(members, adjacency) {
        let order = traverse(start, adjacency);
        if order.len() > longest.len() {
            longest = order;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Line, Rgb, Station};

    fn graph_with(lines: &[&str], edges: &[(&str, &str, &str)]) -> MetroGraph {
        let mut graph = MetroGraph::new();
        for line in lines {
            graph.add_line(Line::new(*line, Rgb::BLACK)).unwrap();
        }
        for (a, b, line) in edges {
            for name in [a, b] {
                if !graph.has_station(name) {
                    graph.add_station(Station::new(*name)).unwrap();
                }
            }
            graph.add_connection(a, b, line, vec![]).unwrap();
        }
        graph
    }

    #[test]
    fn straight_line_in_order() {
        let graph = graph_with(&["L1"], &[("A", "B", "L1"), ("B", "C", "L1"), ("C", "D", "L1")]);
        let topology = LineTopology::build(&graph, "L1");

        assert_eq!(topology.stations(), ["A", "B", "C", "D"]);
        assert_eq!(topology.position("C"), Some(2));
        assert!(!topology.is_branched());
    }

    #[test]
    fn shuffled_edges_still_ordered() {
        let graph = graph_with(&["L1"], &[("B", "C", "L1"), ("A", "B", "L1"), ("C", "D", "L1")]);
        let topology = LineTopology::build(&graph, "L1");

        assert_eq!(topology.members(), ["B", "C", "A", "D"]);
        assert_eq!(topology.stations(), ["A", "B", "C", "D"]);
    }

    #[test]
    fn only_own_line_is_traversed() {
        let graph = graph_with(
            &["L1", "L2"],
            &[("A", "B", "L1"), ("B", "C", "L1"), ("B", "X", "L2"), ("X", "Y", "L2")],
        );
        let l1 = LineTopology::build(&graph, "L1");
        let l2 = LineTopology::build(&graph, "L2");

        assert_eq!(l1.stations(), ["A", "B", "C"]);
        assert_eq!(l2.stations(), ["B", "X", "Y"]);
        assert!(!l1.contains("X"));
        assert!(l2.contains("B"));
    }

    #[test]
    fn forked_line_covers_every_station() {
        // Trunk A-B-C-D with a branch C-E
        let graph = graph_with(
            &["L1"],
            &[("A", "B", "L1"), ("B", "C", "L1"), ("C", "D", "L1"), ("C", "E", "L1")],
        );
        let topology = LineTopology::build(&graph, "L1");

        assert!(topology.is_branched());
        assert_eq!(topology.stations(), ["A", "B", "C", "D", "E"]);
        assert_eq!(topology.neighbors("C"), ["B", "D", "E"]);
    }

    #[test]
    fn path_between_follows_branches() {
        let graph = graph_with(
            &["L1"],
            &[("A", "B", "L1"), ("B", "C", "L1"), ("C", "D", "L1"), ("C", "E", "L1")],
        );
        let topology = LineTopology::build(&graph, "L1");

        assert_eq!(topology.path_between("D", "E").unwrap(), ["D", "C", "E"]);
        assert_eq!(topology.path_between("E", "A").unwrap(), ["E", "C", "B", "A"]);
        assert_eq!(topology.path_between("B", "B").unwrap(), ["B"]);
    }

    #[test]
    fn path_between_off_line() {
        let graph = graph_with(&["L1", "L2"], &[("A", "B", "L1"), ("C", "D", "L2")]);
        let topology = LineTopology::build(&graph, "L1");

        assert!(topology.path_between("A", "C").is_none());
        assert!(topology.path_between("Nowhere", "A").is_none());
    }

    #[test]
    fn path_between_disconnected_segments() {
        let graph = graph_with(&["L1"], &[("A", "B", "L1"), ("C", "D", "L1")]);
        let topology = LineTopology::build(&graph, "L1");

        assert!(topology.path_between("A", "D").is_none());
        assert_eq!(topology.len(), 4);
        assert_eq!(topology.stations().len(), 2);
    }

    #[test]
    fn loop_line_uses_fallback_candidates() {
        let graph = graph_with(
            &["L4"],
            &[("A", "B", "L4"), ("B", "C", "L4"), ("C", "D", "L4"), ("D", "A", "L4")],
        );
        let topology = LineTopology::build(&graph, "L4");

        assert_eq!(topology.stations(), ["A", "B", "C", "D"]);
        assert_eq!(topology.path_between("A", "D").unwrap(), ["A", "D"]);
    }

    #[test]
    fn line_without_connections_is_empty() {
        let graph = graph_with(&["L1", "L2"], &[("A", "B", "L1")]);
        let topology = LineTopology::build(&graph, "L2");

        assert!(topology.is_empty());
        assert!(topology.stations().is_empty());
        assert_eq!(LineTopology::build_all(&graph).len(), 2);
    }

    #[test]
    fn into_parts() {
        let graph = graph_with(&["L1"], &[("A", "B", "L1")]);
        let (line, order) = LineTopology::build(&graph, "L1").into_parts();
        assert_eq!(line, "L1");
        assert_eq!(order, ["A", "B"]);
    }
}
