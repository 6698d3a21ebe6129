//! Domain types
//!
//! - [`Component`] - a catalog part and its free-text specs
//! - [`PlacedComponent`] - a component instance inside a build
//! - [`Build`] - placed components plus a [`DroneColors`] palette
//! - [`Catalog`] - the embedded component table and test library

pub mod build;
pub mod catalog;
pub mod component;
pub mod palette;

pub use build::Build;
pub use catalog::Catalog;
pub use component::{Component, ComponentCategory, PlacedComponent, Position};
pub use palette::DroneColors;
