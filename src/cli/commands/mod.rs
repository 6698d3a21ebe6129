//! CLI command implementations

pub mod build;
pub mod catalog;
pub mod completions;
pub mod config;
pub mod init;
pub mod metrics;
pub mod test;
