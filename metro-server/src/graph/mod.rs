//! The metro network graph.
//!
//! `MetroGraph` owns lines, stations and connections and enforces their
//! referential integrity. `LineTopology` derives per-line structure from the
//! connection set on demand, so it never goes stale after a mutation.

mod load;
mod records;
mod store;
mod topology;

pub use load::{LoadError, LoadSummary};
pub use records::{EdgeRecord, LineRecord, MetroDocument, StationRecord};
pub use store::{LineAddReport, MetroGraph};
pub use topology::LineTopology;
