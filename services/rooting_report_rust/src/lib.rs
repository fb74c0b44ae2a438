//! Rooting report service: loads a snapshot, runs the rooting engine and
//! renders a text report grouped by urgency.

pub mod config;
pub mod report;
pub mod snapshot;
