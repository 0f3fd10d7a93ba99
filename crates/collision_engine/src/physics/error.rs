//! Collision subsystem errors
//!
//! Only construction-time validation can fail. Per-frame entry points never
//! return errors: unknown handles and late registrations are skipped.

/// Errors raised while configuring the collision subsystem
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// Quad-tree field has a non-positive or non-finite dimension
    #[error("Invalid quad-tree field size: ({width}, {depth})")]
    InvalidFieldSize {
        /// Field width (X)
        width: f32,
        /// Field depth (Z)
        depth: f32,
    },

    /// Requested quad-tree depth exceeds the linear cell array
    #[error("Quad-tree level {level} exceeds maximum {max}")]
    LevelTooDeep {
        /// Requested level
        level: u32,
        /// Supported maximum
        max: u32,
    },

    /// Hash grid cell size is non-positive or non-finite
    #[error("Invalid hash grid cell size: {0}")]
    InvalidCellSize(f32),

    /// All 32 layer bits are already assigned
    #[error("Cannot register collision layer '{0}': all 32 layer bits are in use")]
    TooManyLayers(String),
}
