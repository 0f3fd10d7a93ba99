//! Debug module for visualization and debugging tools
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 10.2:
//! "Debug Drawing Facilities"
//!
//! Line drawing is compiled only with the `debug-draw` feature; the
//! telemetry counters are always available.

#[cfg(feature = "debug-draw")]
pub mod draw;
#[cfg(feature = "debug-draw")]
pub mod collision_debug;
pub mod stats;

#[cfg(feature = "debug-draw")]
pub use draw::{DebugDrawSystem, DebugLine};
#[cfg(feature = "debug-draw")]
pub use collision_debug::{CollisionDebugColors, CollisionDebugVisualizer, DebugDrawFlags};
pub use stats::CollisionStats;
