//! Route search over the station graph.
//!
//! Three strategies are offered: fewest stations (breadth-first search),
//! shortest distance (Dijkstra over geographic distance) and fewest
//! transfers (search over lines, see `transfers`).

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use super::config::DistanceModel;
use super::itinerary::{Itinerary, build_itinerary};
use super::transfers::plan_fewest_transfers;
use crate::graph::MetroGraph;

/// Error returned for an unrecognised strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy '{0}', expected fewest_transfers, fewest_stations or shortest_distance")]
pub struct InvalidStrategy(pub String);

/// What a route search optimises for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    #[default]
    FewestTransfers,
    FewestStations,
    ShortestDistance,
}

impl Strategy {
    /// Every strategy, in presentation order.
    pub const ALL: [Strategy; 3] = [
        Strategy::FewestTransfers,
        Strategy::FewestStations,
        Strategy::ShortestDistance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::FewestTransfers => "fewest_transfers",
            Strategy::FewestStations => "fewest_stations",
            Strategy::ShortestDistance => "shortest_distance",
        }
    }
}

impl FromStr for Strategy {
    type Err = InvalidStrategy;

    /// Accepts the snake_case name, with `-` allowed in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| InvalidStrategy(s.to_string()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route planner over a borrowed graph.
///
/// The planner holds no state of its own beyond the references, so after the
/// graph is mutated a new planner (or `set_graph`) picks up the change.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    graph: &'a MetroGraph,
    distance: &'a DistanceModel,
}

impl<'a> Planner<'a> {
    pub fn new(graph: &'a MetroGraph, distance: &'a DistanceModel) -> Self {
        Self { graph, distance }
    }

    /// Point the planner at a different graph.
    pub fn set_graph(&mut self, graph: &'a MetroGraph) {
        self.graph = graph;
    }

    pub fn graph(&self) -> &'a MetroGraph {
        self.graph
    }

    pub fn distance_model(&self) -> &'a DistanceModel {
        self.distance
    }

    /// Find a route from `from` to `to` using `strategy`.
    ///
    /// Returns an empty itinerary if either station is unknown or no route
    /// exists. A query from a station to itself yields a one-station
    /// itinerary with no segments.
    ///
    /// If fewest-transfers planning cannot complete, the route is found by
    /// fewest stations instead and the itinerary is marked `degraded`.
    pub fn find_path(&self, from: &str, to: &str, strategy: Strategy) -> Itinerary {
        debug!(from, to, %strategy, "searching");

        for station in [from, to] {
            if !self.graph.has_station(station) {
                debug!(station, "unknown station");
                return Itinerary::empty();
            }
        }
        if from == to {
            return Itinerary::single(from).tagged(strategy, false);
        }

        let itinerary = match strategy {
            Strategy::FewestStations => self
                .itinerary(self.fewest_stations_path(from, to))
                .tagged(strategy, false),
            Strategy::ShortestDistance => self
                .itinerary(self.shortest_distance_path(from, to))
                .tagged(strategy, false),
            Strategy::FewestTransfers => self.fewest_transfers(from, to),
        };

        debug!(
            stations = itinerary.station_count,
            transfers = itinerary.transfer_count,
            distance_km = itinerary.total_distance_km,
            degraded = itinerary.degraded,
            "search complete"
        );
        itinerary
    }

    /// Breadth-first search for the path visiting the fewest stations.
    ///
    /// Equal-length candidates are searched from both ends and the one that
    /// reads smaller from the lesser endpoint name wins, so a query and its
    /// reverse return the same route.
    pub fn fewest_stations_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        if !self.graph.has_station(from) || !self.graph.has_station(to) {
            return None;
        }

        let forward = self.breadth_first(from, to)?;
        let mut backward = self.breadth_first(to, from)?;
        backward.reverse();

        let keep_forward = if from <= to {
            forward <= backward
        } else {
            forward.iter().rev().le(backward.iter().rev())
        };
        trace!(keep_forward, stations = forward.len(), "fewest stations tie-break");
        Some(if keep_forward { forward } else { backward })
    }

    /// Breadth-first search exploring neighbours in name order.
    fn breadth_first(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let mut came_from: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                return Some(reconstruct(&came_from, to));
            }

            let mut neighbors: Vec<&str> = self
                .graph
                .neighbors(current)
                .iter()
                .map(String::as_str)
                .collect();
            neighbors.sort_unstable();
            trace!(station = current, neighbors = neighbors.len(), "expanding");

            for neighbor in neighbors {
                if visited.insert(neighbor) {
                    came_from.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Dijkstra search for the geographically shortest path.
    ///
    /// Each step settles the unsettled station with the smallest tentative
    /// distance, taking the earliest-added station on ties.
    pub fn shortest_distance_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let names: Vec<&str> = self.graph.station_names().collect();
        let index: HashMap<&str, usize> =
            names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        let (&source, &target) = (index.get(from)?, index.get(to)?);

        let mut dist = vec![f64::INFINITY; names.len()];
        let mut prev: Vec<Option<usize>> = vec![None; names.len()];
        let mut settled = vec![false; names.len()];
        dist[source] = 0.0;

        loop {
            let mut current = None;
            let mut best = f64::INFINITY;
            for (i, &d) in dist.iter().enumerate() {
                if !settled[i] && d < best {
                    best = d;
                    current = Some(i);
                }
            }
            let Some(current) = current else { break };
            if current == target {
                break;
            }
            settled[current] = true;
            trace!(station = names[current], distance_km = best, "settled");

            for neighbor in self.graph.neighbors(names[current]) {
                let Some(&next) = index.get(neighbor.as_str()) else {
                    continue;
                };
                if settled[next] {
                    continue;
                }
                let candidate =
                    best + self.distance.station_distance(self.graph, names[current], neighbor);
                if candidate < dist[next] {
                    dist[next] = candidate;
                    prev[next] = Some(current);
                }
            }
        }

        if !dist[target].is_finite() {
            return None;
        }

        let mut path = vec![names[target].to_string()];
        let mut node = target;
        while let Some(p) = prev[node] {
            path.push(names[p].to_string());
            node = p;
        }
        path.reverse();
        Some(path)
    }

    fn fewest_transfers(&self, from: &str, to: &str) -> Itinerary {
        match plan_fewest_transfers(self.graph, from, to) {
            Ok(stations) => self
                .itinerary(Some(stations))
                .tagged(Strategy::FewestTransfers, false),
            Err(e) => {
                debug!(error = %e, "fewest transfers failed, falling back to fewest stations");
                self.itinerary(self.fewest_stations_path(from, to))
                    .tagged(Strategy::FewestStations, true)
            }
        }
    }

    fn itinerary(&self, stations: Option<Vec<String>>) -> Itinerary {
        match stations {
            Some(stations) => build_itinerary(self.graph, self.distance, &stations),
            None => Itinerary::empty(),
        }
    }
}

fn reconstruct(came_from: &HashMap<&str, &str>, end: &str) -> Vec<String> {
    let mut path = vec![end.to_string()];
    let mut node = end;
    while let Some(&prev) = came_from.get(node) {
        path.push(prev.to_string());
        node = prev;
    }
    path.reverse();
    path
}
