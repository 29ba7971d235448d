//! Domain error types.
//!
//! These errors describe why a mutation of the metro graph was rejected.
//! A rejected mutation never changes the graph.

/// Errors returned by `MetroGraph` mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A line with this name already exists
    #[error("line {0} already exists")]
    DuplicateLine(String),

    /// A station with this name already exists
    #[error("station {0} already exists")]
    DuplicateStation(String),

    /// The stations are already connected on this line
    #[error("stations {0} and {1} are already connected on {2}")]
    DuplicateConnection(String, String, String),

    /// Referenced station does not exist
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// Referenced line does not exist
    #[error("unknown line: {0}")]
    UnknownLine(String),

    /// Lines and stations must have a non-empty name
    #[error("name must not be empty")]
    EmptyName,

    /// A station cannot be connected to itself
    #[error("station {0} cannot be connected to itself")]
    SelfConnection(String),
}
