//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::graph::MetroGraph;
use crate::planner::DistanceModel;

/// Shared application state.
///
/// The graph sits behind a read-write lock: route queries and listings take
/// the read lock, mutations the write lock.
#[derive(Clone)]
pub struct AppState {
    /// The metro network
    pub graph: Arc<RwLock<MetroGraph>>,

    /// Distance model used by shortest-distance routing
    pub distance: Arc<DistanceModel>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(graph: MetroGraph, distance: DistanceModel) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
            distance: Arc::new(distance),
        }
    }
}
