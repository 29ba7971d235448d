//! Loading a metro graph from a JSON document.
//!
//! Loading is all-or-nothing at the document level: a file that cannot be
//! read or parsed yields a `LoadError` and the target graph is untouched.
//! Inside a well-formed document, bad records are skipped with a warning.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::MetroGraph;
use super::records::{
    MetroDocument, color_from, geo_point_from, graph_point_from, waypoints_from,
};
use crate::domain::{Connection, Line, Station, StationKind, StationPair};

/// Errors that make a data source unusable.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not a valid metro document
    #[error("malformed metro document: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a load produced and what it had to skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub lines: usize,
    pub stations: usize,
    pub connections: usize,
    /// Line or station records that were unnamed or duplicated.
    pub skipped_records: usize,
    /// Edges naming an unknown station or line, or looping back to their origin.
    pub skipped_edges: usize,
}

impl MetroGraph {
    /// Build a graph from a parsed document.
    ///
    /// Lines are added first, then stations, then edges. Edges are symmetric:
    /// an edge listed on both of its stations produces one connection, and
    /// the later listing only contributes its waypoints when it has more of
    /// them.
    pub fn from_document(doc: &MetroDocument) -> (Self, LoadSummary) {
        let mut graph = MetroGraph::new();
        let mut summary = LoadSummary::default();

        for record in &doc.lines {
            let line = Line::new(record.name.clone(), color_from(record.color.as_ref()));
            if let Err(e) = graph.add_line(line) {
                warn!(error = %e, "skipping line record");
                summary.skipped_records += 1;
            }
        }

        for record in &doc.stations {
            let station = Station {
                name: record.name.clone(),
                tag: record.tag.clone(),
                kind: StationKind::parse(&record.kind),
                graph_position: graph_point_from(record.graph_position.as_ref()),
                geo_position: geo_point_from(record.real_position.as_ref()),
                connected: Vec::new(),
            };
            if let Err(e) = graph.add_station(station) {
                warn!(error = %e, "skipping station record");
                summary.skipped_records += 1;
            }
        }

        for record in &doc.stations {
            let from = record.name.as_str();
            if !graph.has_station(from) {
                summary.skipped_edges += record.edges.len();
                continue;
            }

            for edge in &record.edges {
                let waypoints = waypoints_from(edge.via.as_ref());

                if graph.connection_on(from, &edge.to, &edge.line).is_some() {
                    graph.refine_waypoints(from, &edge.to, &edge.line, waypoints);
                    continue;
                }

                match graph.check_connection(from, &edge.to, &edge.line) {
                    Ok(()) => graph.insert_connection(Connection::new(
                        StationPair::new(from, edge.to.as_str()),
                        edge.line.as_str(),
                        waypoints,
                    )),
                    Err(e) => {
                        warn!(station = from, error = %e, "skipping edge");
                        summary.skipped_edges += 1;
                    }
                }
            }
        }

        summary.lines = graph.line_count();
        summary.stations = graph.station_count();
        summary.connections = graph.connection_count();
        (graph, summary)
    }

    /// Parse and build a graph from JSON text.
    pub fn from_json_str(json: &str) -> Result<(Self, LoadSummary), LoadError> {
        let doc: MetroDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(&doc))
    }

    /// Read, parse and build a graph from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<(Self, LoadSummary), LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Replace this graph's contents with the document at `path`.
    ///
    /// On error the current contents are kept.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, LoadError> {
        let (graph, summary) = Self::from_path(path.as_ref()).inspect_err(|e| {
            warn!(error = %e, "load failed, keeping current graph");
        })?;
        info!(
            path = %path.as_ref().display(),
            lines = summary.lines,
            stations = summary.stations,
            connections = summary.connections,
            skipped_records = summary.skipped_records,
            skipped_edges = summary.skipped_edges,
            "loaded metro graph"
        );
        *self = graph;
        Ok(summary)
    }

    /// Replace this graph's contents with the given JSON text.
    ///
    /// On error the current contents are kept.
    pub fn load_json(&mut self, json: &str) -> Result<LoadSummary, LoadError> {
        let (graph, summary) = Self::from_json_str(json)?;
        info!(
            lines = summary.lines,
            stations = summary.stations,
            connections = summary.connections,
            "loaded metro graph"
        );
        *self = graph;
        Ok(summary)
    }
}
