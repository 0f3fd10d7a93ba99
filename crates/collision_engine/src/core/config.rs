//! # Collision Configuration
//!
//! Configuration structures for the collision subsystem. All of them are
//! serializable (TOML or RON through the [`Config`] trait) and have defaults
//! suitable for a 1 km x 1 km play field centred on the origin.
//!
//! ## Configuration Categories
//!
//! - **QuadTree**: bounded field used for dynamic-vs-dynamic broad phase
//! - **HashGrid**: cell size of the unbounded static-collider grid
//! - **Debug**: collider visualisation toggles and colours
//! - **Layers**: collision layer names registered up front

use serde::{Serialize, Deserialize};

use crate::config::Config;
use crate::foundation::math::{Vec2, Vec4};

pub use crate::config::ConfigError;

/// Deepest quad-tree level the linear cell array supports
pub const MAX_QUAD_TREE_LEVEL: u32 = 9;

/// # Quad-tree configuration
///
/// Defines the bounded region on the XZ ground plane and the subdivision depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// Width (X) and depth (Z) of the field
    pub field_size: [f32; 2],
    /// Subdivision depth, `0..=MAX_QUAD_TREE_LEVEL`
    pub level: u32,
    /// Minimum X/Z corner of the field
    pub left_bottom: [f32; 2],
}

impl QuadTreeConfig {
    /// Create a quad-tree configuration
    pub fn new(field_size: Vec2, level: u32, left_bottom: Vec2) -> Self {
        Self {
            field_size: [field_size.x, field_size.y],
            level,
            left_bottom: [left_bottom.x, left_bottom.y],
        }
    }

    /// Field size as a vector
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_size[0], self.field_size[1])
    }

    /// Minimum corner as a vector
    pub fn left_bottom(&self) -> Vec2 {
        Vec2::new(self.left_bottom[0], self.left_bottom[1])
    }
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            field_size: [1000.0, 1000.0],
            level: 5,
            left_bottom: [-500.0, -500.0],
        }
    }
}

/// # Spiral hash grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashGridConfig {
    /// Edge length of one square grid cell
    pub cell_size: f32,
}

impl Default for HashGridConfig {
    fn default() -> Self {
        Self { cell_size: 10.0 }
    }
}

/// # Collision debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionDebugConfig {
    /// Push collider outlines to the debug line buffer every frame
    pub draw_colliders: bool,
    /// Colour of a collider that was hit this frame
    pub hit_color: [f32; 4],
    /// Colour of an idle dynamic collider
    pub idle_color: [f32; 4],
    /// Colour of an idle static collider
    pub static_color: [f32; 4],
    /// Line segments per great circle when drawing spheres
    pub sphere_segments: u32,
}

impl CollisionDebugConfig {
    /// Hit colour as a vector
    pub fn hit_color(&self) -> Vec4 {
        Vec4::from(self.hit_color)
    }

    /// Idle colour as a vector
    pub fn idle_color(&self) -> Vec4 {
        Vec4::from(self.idle_color)
    }

    /// Static colour as a vector
    pub fn static_color(&self) -> Vec4 {
        Vec4::from(self.static_color)
    }
}

impl Default for CollisionDebugConfig {
    fn default() -> Self {
        Self {
            draw_colliders: false,
            hit_color: [1.0, 0.0, 0.0, 1.0],    // Red
            idle_color: [1.0, 1.0, 1.0, 1.0],   // White
            static_color: [0.0, 1.0, 0.0, 1.0], // Green
            sphere_segments: 16,
        }
    }
}

/// # Collision layer configuration
///
/// Layer names listed here receive bits in order (first name is bit 0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionLayerConfig {
    /// Preset layer names
    pub names: Vec<String>,
}

impl Config for CollisionLayerConfig {}

/// # Collision system configuration
///
/// Top-level configuration consumed by `CollisionManager::new` and
/// `CollisionManager::initialize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Quad-tree field for dynamic colliders
    pub quad_tree: QuadTreeConfig,
    /// Hash grid for static colliders
    pub hash_grid: HashGridConfig,
    /// Narrow-phase worker count; `None` uses the available parallelism
    pub thread_count: Option<usize>,
    /// Debug visualisation
    pub debug: CollisionDebugConfig,
    /// Preset collision layers
    pub layers: CollisionLayerConfig,
}

impl CollisionConfig {
    /// Set the quad-tree field
    pub fn with_field(mut self, field_size: Vec2, level: u32, left_bottom: Vec2) -> Self {
        self.quad_tree = QuadTreeConfig::new(field_size, level, left_bottom);
        self
    }

    /// Set the hash grid cell size
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.hash_grid.cell_size = cell_size;
        self
    }

    /// Pin the narrow-phase worker count
    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = Some(thread_count);
        self
    }

    /// Enable collider debug drawing
    pub fn with_debug_draw(mut self, enabled: bool) -> Self {
        self.debug.draw_colliders = enabled;
        self
    }

    /// Worker count after resolving `None` against the machine
    pub fn resolved_thread_count(&self) -> usize {
        self.thread_count
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get))
            .max(1)
    }
}

impl Config for CollisionConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip_keeps_field() {
        let config = CollisionConfig::default()
            .with_field(Vec2::new(64.0, 32.0), 3, Vec2::new(-32.0, -16.0))
            .with_cell_size(4.0)
            .with_thread_count(2);

        let text = config.to_toml_string().unwrap();
        let parsed = CollisionConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let parsed = CollisionConfig::from_ron_str("(hash_grid: (cell_size: 2.5))").unwrap();
        assert_eq!(parsed.hash_grid.cell_size, 2.5);
        assert_eq!(parsed.quad_tree, QuadTreeConfig::default());
        assert!(parsed.thread_count.is_none());
    }

    #[test]
    fn test_resolved_thread_count_is_never_zero() {
        let config = CollisionConfig::default().with_thread_count(0);
        assert_eq!(config.resolved_thread_count(), 1);
        assert!(CollisionConfig::default().resolved_thread_count() >= 1);
    }
}
