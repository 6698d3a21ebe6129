//! Core module - project layout, configuration, identity and persistence

pub mod config;
pub mod identity;
pub mod project;
pub mod store;

pub use config::Config;
pub use identity::{IdParseError, InstanceId};
pub use project::{Project, ProjectError};
pub use store::StoreError;
