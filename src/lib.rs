//! DroneForge: assemble virtual drones and estimate their flight performance
//!
//! Builds are ordered lists of catalog parts stored as YAML. The [`engine`]
//! derives a capability summary from a build and turns it into pass /
//! warning / fail verdicts for a set of simulated flight tests.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
pub mod yaml;
