//! Domain types for the metro route planner.
//!
//! Lines, stations and the connections between them. These are plain data;
//! the invariants that span several values (unique names, symmetric
//! adjacency, no dangling connections) are enforced by `MetroGraph`.

mod connection;
mod error;
mod line;
mod station;

pub use connection::{Connection, StationPair};
pub use error::GraphError;
pub use line::{InvalidColor, Line, Rgb};
pub use station::{GeoPoint, GraphPoint, Station, StationKind};
