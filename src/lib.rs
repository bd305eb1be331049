//! chart-interaction: hover, focus, tooltip and legend coordination for charts
//! whose scene graph is owned by an external retained-mode engine.
//!
//! The engine draws and re-creates series/points at will. This crate keeps one
//! authoritative highlight/tooltip/focus state per chart instance, restores it
//! after every re-render and suppresses the engine's own emphasis behavior.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{CoordinatorConfig, InteractionCoordinator};
pub use error::{ChartError, ChartResult};
