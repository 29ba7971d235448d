//! Route planner for the metro graph.
//!
//! This module answers "how do I get from station A to station B?" under
//! one of three strategies: fewest transfers, fewest stations or shortest
//! geographic distance. Results come back as an `Itinerary` grouped into
//! per-line segments.

mod config;
mod itinerary;
mod search;
mod transfers;


pub use config::DistanceModel;
pub use itinerary::{Itinerary, Segment, UNKNOWN_LINE, build_itinerary};
pub use search::{InvalidStrategy, Planner, Strategy};
pub use transfers::{LineGraph, TransferError, plan_fewest_transfers};
