//! Fewest-transfers planning.
//!
//! Works on the line-adjacency graph: one node per line, with an edge between
//! two lines whenever they share a station. Breadth-first searches over lines
//! give the fewest changes needed, and every line sequence with that many
//! changes is expanded back into stations by walking each line's own
//! sub-graph between interchanges. The shortest expansion wins.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::graph::{LineTopology, MetroGraph};

/// Why a fewest-transfers plan could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    /// The station has no connections
    #[error("station {0} is not served by any line")]
    NoLines(String),

    /// No chain of interchanges joins the two stations' lines
    #[error("no sequence of lines joins {from} and {to}")]
    NoLineSequence { from: String, to: String },

    /// The line's own connections do not join the two stations
    #[error("no path on {line} from {from} to {to}")]
    NoPathOnLine {
        line: String,
        from: String,
        to: String,
    },
}

/// Lines as nodes, shared stations as edges.
#[derive(Debug, Clone)]
pub struct LineGraph {
    topologies: Vec<LineTopology>,
    adjacency: Vec<Vec<usize>>,
}

impl LineGraph {
    /// Derive the line-adjacency graph from the current connections.
    pub fn build(graph: &MetroGraph) -> Self {
        let topologies = LineTopology::build_all(graph);
        let mut adjacency = vec![Vec::new(); topologies.len()];

        for i in 0..topologies.len() {
            for j in (i + 1)..topologies.len() {
                let shared = topologies[i]
                    .members()
                    .iter()
                    .any(|s| topologies[j].contains(s));
                if shared {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }

        Self {
            topologies,
            adjacency,
        }
    }

    /// Topology of the named line.
    pub fn topology(&self, line: &str) -> Option<&LineTopology> {
        self.topologies.iter().find(|t| t.line() == line)
    }

    /// Lines sharing at least one station with `line`.
    pub fn neighbors(&self, line: &str) -> Vec<&str> {
        self.index_of(line)
            .map(|i| {
                self.adjacency[i]
                    .iter()
                    .map(|&j| self.topologies[j].line())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stations served by both lines, in order of appearance on `a`.
    pub fn shared_stations(&self, a: &str, b: &str) -> Vec<&str> {
        match (self.topology(a), self.topology(b)) {
            (Some(a), Some(b)) => a
                .members()
                .iter()
                .filter(|s| b.contains(s))
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn index_of(&self, line: &str) -> Option<usize> {
        self.topologies.iter().position(|t| t.line() == line)
    }

    /// Indices of lines serving `station`, in line order.
    fn serving(&self, station: &str) -> Vec<usize> {
        self.topologies
            .iter()
            .enumerate()
            .filter(|(_, t)| t.contains(station))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of line changes from the nearest of `sources` to every line.
    fn changes_from(&self, sources: &[usize]) -> Vec<Option<usize>> {
        let mut changes = vec![None; self.topologies.len()];
        let mut queue = VecDeque::new();

        for &line in sources {
            changes[line] = Some(0);
            queue.push_back(line);
        }

        while let Some(current) = queue.pop_front() {
            let next_changes = changes[current].map(|c| c + 1);
            for &next in &self.adjacency[current] {
                if changes[next].is_none() {
                    changes[next] = next_changes;
                    queue.push_back(next);
                }
            }
        }

        changes
    }
}

/// A route under construction: the line being ridden and the stations so
/// far, ending where that line was boarded.
type Partial = (usize, Vec<String>);

/// Keep `path` unless a route boarding the same line at the same station is
/// already at least as short.
fn keep_shorter(partials: &mut Vec<Partial>, line: usize, path: Vec<String>) {
    let existing = partials
        .iter_mut()
        .find(|(l, p)| *l == line && p.last() == path.last());
    match existing {
        Some((_, kept)) if path.len() < kept.len() => *kept = path,
        Some(_) => {}
        None => partials.push((line, path)),
    }
}

/// Plan a route from `from` to `to` that changes line as few times as possible.
///
/// Among routes with the fewest changes, the one visiting the fewest stations
/// is returned: every line sequence of that length and every interchange
/// between consecutive lines is considered, so the choice does not depend on
/// which end the search starts from. Ties go to the earliest line and
/// interchange.
pub fn plan_fewest_transfers(
    graph: &MetroGraph,
    from: &str,
    to: &str,
) -> Result<Vec<String>, TransferError> {
    let lines = LineGraph::build(graph);

    let start = lines.serving(from);
    if start.is_empty() {
        return Err(TransferError::NoLines(from.to_string()));
    }
    let end = lines.serving(to);
    if end.is_empty() {
        return Err(TransferError::NoLines(to.to_string()));
    }

    let from_start = lines.changes_from(&start);
    let to_end = lines.changes_from(&end);
    let changes = start
        .iter()
        .filter_map(|&line| to_end[line])
        .min()
        .ok_or_else(|| TransferError::NoLineSequence {
            from: from.to_string(),
            to: to.to_string(),
        })?;
    debug!(changes, "fewest line changes");

    // Lines that can be the i-th ride of a route with `changes` changes
    let ride = |i: usize| -> Vec<usize> {
        (0..lines.topologies.len())
            .filter(|&line| from_start[line] == Some(i) && to_end[line] == Some(changes - i))
            .collect()
    };

    let mut failure = None;
    let mut partials: Vec<Partial> = ride(0)
        .into_iter()
        .map(|line| (line, vec![from.to_string()]))
        .collect();

    for i in 1..=changes {
        let onward = ride(i);
        let mut next: Vec<Partial> = Vec::new();

        for (line, path) in &partials {
            let current = &lines.topologies[*line];
            let boarded = path.last().map(String::as_str).unwrap_or(from);
            let adjacent = &lines.adjacency[*line];

            for &next_line in onward.iter().filter(|&&l| adjacent.contains(&l)) {
                let interchanges =
                    lines.shared_stations(current.line(), lines.topologies[next_line].line());
                for station in interchanges {
                    let Some(leg) = current.path_between(boarded, station) else {
                        failure.get_or_insert_with(|| TransferError::NoPathOnLine {
                            line: current.line().to_string(),
                            from: boarded.to_string(),
                            to: station.to_string(),
                        });
                        continue;
                    };
                    let mut candidate = path.clone();
                    candidate.extend(leg.into_iter().skip(1));
                    keep_shorter(&mut next, next_line, candidate);
                }
            }
        }

        trace!(ride = i, candidates = next.len(), "interchanges expanded");
        partials = next;
    }

    let mut best: Option<Vec<String>> = None;
    for (line, path) in partials {
        let last = &lines.topologies[line];
        let boarded = path.last().map(String::as_str).unwrap_or(from);
        let Some(tail) = last.path_between(boarded, to) else {
            failure.get_or_insert_with(|| TransferError::NoPathOnLine {
                line: last.line().to_string(),
                from: boarded.to_string(),
                to: to.to_string(),
            });
            continue;
        };

        let mut candidate = path.clone();
        candidate.extend(tail.into_iter().skip(1));
        if best.as_ref().is_none_or(|b| candidate.len() < b.len()) {
            best = Some(candidate);
        }
    }

    match best {
        Some(path) => {
            debug!(stations = path.len(), "fewest transfers route");
            Ok(path)
        }
        None => Err(failure.unwrap_or(TransferError::NoLineSequence {
            from: from.to_string(),
            to: to.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Line, Rgb, Station};

    fn graph_with(lines: &[(&str, &[&str])]) -> MetroGraph {
        let mut graph = MetroGraph::new();
        for (_, stations) in lines {
            for name in *stations {
                if !graph.has_station(name) {
                    graph.add_station(Station::new(*name)).unwrap();
                }
            }
        }
        for (line, stations) in lines {
            graph
                .add_line_with_stations(Line::new(*line, Rgb::BLACK), *stations)
                .unwrap();
        }
        graph
    }

    #[test]
    fn line_graph_edges() {
        let graph = graph_with(&[
            ("L1", &["A", "B", "C"]),
            ("L2", &["C", "D"]),
            ("L3", &["D", "E"]),
            ("L4", &["X", "Y"]),
        ]);
        let lines = LineGraph::build(&graph);

        assert_eq!(lines.neighbors("L1"), ["L2"]);
        assert_eq!(lines.neighbors("L2"), ["L1", "L3"]);
        assert!(lines.neighbors("L4").is_empty());
        assert!(lines.neighbors("L9").is_empty());
        assert_eq!(lines.shared_stations("L1", "L2"), ["C"]);
        assert!(lines.shared_stations("L1", "L3").is_empty());
    }

    #[test]
    fn direct_line() {
        let graph = graph_with(&[("L1", &["A", "B", "C"]), ("L2", &["C", "D"])]);
        assert_eq!(plan_fewest_transfers(&graph, "C", "A").unwrap(), ["C", "B", "A"]);
    }

    #[test]
    fn shortest_direct_line_wins() {
        let graph = graph_with(&[
            ("Local", &["A", "B", "C", "D"]),
            ("Express", &["A", "D"]),
        ]);
        assert_eq!(plan_fewest_transfers(&graph, "A", "D").unwrap(), ["A", "D"]);
    }

    #[test]
    fn one_change() {
        let graph = graph_with(&[("L1", &["A", "B", "C"]), ("L2", &["C", "D", "E"])]);
        assert_eq!(
            plan_fewest_transfers(&graph, "A", "E").unwrap(),
            ["A", "B", "C", "D", "E"]
        );
    }

    #[test]
    fn nearest_interchange_when_it_is_shortest_overall() {
        // L1 and L2 meet at both B and E; changing at B is shorter overall
        let graph = graph_with(&[
            ("L1", &["A", "B", "C", "D", "E"]),
            ("L2", &["B", "X", "E", "Y"]),
        ]);
        assert_eq!(
            plan_fewest_transfers(&graph, "A", "Y").unwrap(),
            ["A", "B", "X", "E", "Y"]
        );
    }

    #[test]
    fn interchange_chosen_by_whole_route_length() {
        // P is the nearest interchange from A, but L2 then crawls to R; riding
        // L1 on to R and changing there is shorter
        let graph = graph_with(&[
            ("L1", &["A", "P", "Q", "R"]),
            ("L2", &["P", "x1", "x2", "x3", "x4", "R", "T"]),
        ]);
        assert_eq!(
            plan_fewest_transfers(&graph, "A", "T").unwrap(),
            ["A", "P", "Q", "R", "T"]
        );
        assert_eq!(
            plan_fewest_transfers(&graph, "T", "A").unwrap(),
            ["T", "R", "Q", "P", "A"]
        );
    }

    #[test]
    fn every_shortest_line_sequence_considered() {
        // Both L1 -> L3 and L2 -> L3 need one change; only via L2 is short
        let graph = graph_with(&[
            ("L1", &["S", "a", "b", "c", "J"]),
            ("L2", &["S", "K"]),
            ("L3", &["J", "T", "K"]),
        ]);
        assert_eq!(
            plan_fewest_transfers(&graph, "S", "T").unwrap(),
            ["S", "K", "T"]
        );
        assert_eq!(
            plan_fewest_transfers(&graph, "T", "S").unwrap(),
            ["T", "K", "S"]
        );
    }

    #[test]
    fn two_changes() {
        let graph = graph_with(&[
            ("L1", &["A", "B"]),
            ("L2", &["B", "C"]),
            ("L3", &["C", "D"]),
        ]);
        assert_eq!(
            plan_fewest_transfers(&graph, "A", "D").unwrap(),
            ["A", "B", "C", "D"]
        );
    }

    #[test]
    fn isolated_station() {
        let mut graph = graph_with(&[("L1", &["A", "B"])]);
        graph.add_station(Station::new("Z")).unwrap();
        assert_eq!(
            plan_fewest_transfers(&graph, "A", "Z"),
            Err(TransferError::NoLines("Z".into()))
        );
    }

    #[test]
    fn disjoint_networks() {
        let graph = graph_with(&[("L1", &["A", "B"]), ("L2", &["Y", "Z"])]);
        assert_eq!(
            plan_fewest_transfers(&graph, "A", "Z"),
            Err(TransferError::NoLineSequence {
                from: "A".into(),
                to: "Z".into()
            })
        );
    }

    #[test]
    fn gap_in_line() {
        // L1 has a gap between B and C that only L2 bridges
        let mut graph = graph_with(&[("L2", &["B", "C"])]);
        for name in ["A", "D"] {
            graph.add_station(Station::new(name)).unwrap();
        }
        graph.add_line(Line::new("L1", Rgb::BLACK)).unwrap();
        graph.add_connection("A", "B", "L1", vec![]).unwrap();
        graph.add_connection("C", "D", "L1", vec![]).unwrap();

        assert_eq!(
            plan_fewest_transfers(&graph, "A", "D"),
            Err(TransferError::NoPathOnLine {
                line: "L1".into(),
                from: "A".into(),
                to: "D".into()
            })
        );
    }

    #[test]
    fn error_display() {
        let err = TransferError::NoPathOnLine {
            line: "L1".into(),
            from: "A".into(),
            to: "D".into(),
        };
        assert_eq!(err.to_string(), "no path on L1 from A to D");
        let err = TransferError::NoLines("Z".into());
        assert_eq!(err.to_string(), "station Z is not served by any line");
    }
}
