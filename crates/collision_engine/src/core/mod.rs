//! # Core Engine Module
//!
//! Shared configuration for the collision subsystem.
//!
//! ## Organization
//!
//! - **Config**: collision configuration (quad tree, hash grid, debug, layers)
//! - **Foundation**: low-level utilities (math, logging), re-exported here

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    CollisionConfig,
    CollisionDebugConfig,
    CollisionLayerConfig,
    HashGridConfig,
    QuadTreeConfig,
    ConfigError,
    MAX_QUAD_TREE_LEVEL,
};
pub use crate::config::Config;
