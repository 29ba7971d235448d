//! Metro route planner server.
//!
//! Holds a metro network (lines, stations and the connections between them)
//! and answers: "how do I get from here to there with the fewest transfers,
//! the fewest stations or the shortest distance?"

pub mod config;
pub mod domain;
pub mod graph;
pub mod planner;
pub mod web;
