//! Collision-specific debug visualization
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2:
//! "Debug drawing for collision detection typically includes visualizations
//! of bounding volumes, collision shapes, and query results."

use bitflags::bitflags;

use crate::core::config::CollisionDebugConfig;
use crate::debug::draw::{DebugDrawSystem, DebugLine};
use crate::foundation::math::{Vec3, Vec4};
use crate::physics::collider::Collider;
use crate::physics::collision::{ColliderInfo, ColliderShape};
use crate::spatial::QuadTree;

bitflags! {
    /// What the collision visualizer draws
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugDrawFlags: u32 {
        /// Dynamic collider outlines
        const DYNAMIC = 1 << 0;
        /// Static collider outlines
        const STATIC = 1 << 1;
        /// Contact points and normals
        const CONTACTS = 1 << 2;
        /// Occupied quad-tree nodes
        const QUAD_TREE = 1 << 3;
        /// Collider outlines only
        const COLLIDERS = Self::DYNAMIC.bits() | Self::STATIC.bits();
    }
}

impl Default for DebugDrawFlags {
    fn default() -> Self {
        Self::COLLIDERS
    }
}

/// Color scheme for collision visualization
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionDebugColors {
    /// Collider hit this frame
    pub hit: Vec4,
    /// Idle dynamic collider
    pub idle: Vec4,
    /// Idle static collider
    pub static_idle: Vec4,
    /// Quad-tree node outlines
    pub quad_tree: Vec4,
    /// Contact markers
    pub contact: Vec4,
}

impl CollisionDebugColors {
    /// Colours from configuration
    pub fn from_config(config: &CollisionDebugConfig) -> Self {
        Self {
            hit: config.hit_color(),
            idle: config.idle_color(),
            static_idle: config.static_color(),
            ..Self::default()
        }
    }
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            hit: Vec4::new(1.0, 0.0, 0.0, 1.0),         // Red
            idle: Vec4::new(1.0, 1.0, 1.0, 1.0),        // White
            static_idle: Vec4::new(0.0, 1.0, 0.0, 1.0), // Green
            quad_tree: Vec4::new(0.5, 0.8, 1.0, 0.3),   // Light blue, transparent
            contact: Vec4::new(1.0, 1.0, 0.0, 1.0),     // Yellow
        }
    }
}

/// Collision-specific debug visualizer
///
/// Turns colliders, contacts and quad-tree occupancy into debug lines.
#[derive(Debug, Clone)]
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: CollisionDebugColors,
    sphere_segments: u32,

    /// Which layers of information are drawn
    pub flags: DebugDrawFlags,
}

impl CollisionDebugVisualizer {
    /// Create a visualizer from configuration
    pub fn new(config: &CollisionDebugConfig) -> Self {
        Self {
            debug_draw: DebugDrawSystem::new(),
            colors: CollisionDebugColors::from_config(config),
            sphere_segments: config.sphere_segments,
            flags: DebugDrawFlags::default(),
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Drop last frame's lines
    pub fn begin_frame(&mut self) {
        self.debug_draw.clear();
    }

    /// Outline one collider, coloured by its hit state
    pub fn draw_collider(&mut self, collider: &Collider, is_static: bool) {
        let wanted = if is_static { DebugDrawFlags::STATIC } else { DebugDrawFlags::DYNAMIC };
        if !self.flags.contains(wanted) {
            return;
        }
        let Some(shape) = collider.shape() else {
            return;
        };

        let color = match (collider.is_hit(), is_static) {
            (true, _) => self.colors.hit,
            (false, true) => self.colors.static_idle,
            (false, false) => self.colors.idle,
        };

        match shape {
            ColliderShape::Sphere(sphere) => {
                self.debug_draw
                    .draw_wire_sphere(sphere.center(), sphere.world_radius(), color, self.sphere_segments);
            }
            ColliderShape::Aabb(aabb) => self.debug_draw.draw_box(&aabb.world().corners(), color),
            ColliderShape::Obb(obb) => self.debug_draw.draw_box(&obb.vertices(), color),
        }
    }

    /// Mark a contact point and its normal
    pub fn draw_contact(&mut self, info: &ColliderInfo) {
        if !self.flags.contains(DebugDrawFlags::CONTACTS) {
            return;
        }
        let color = self.colors.contact;
        self.debug_draw.draw_point(info.contact_point, 0.2, color);
        self.debug_draw
            .draw_line(info.contact_point, info.contact_point + info.contact_normal, color);
    }

    /// Outline every occupied quad-tree node on the ground plane
    pub fn draw_quad_tree(&mut self, tree: &QuadTree) {
        if !self.flags.contains(DebugDrawFlags::QUAD_TREE) {
            return;
        }
        let color = self.colors.quad_tree;
        for index in tree.occupied_nodes() {
            if let Some((min, max)) = tree.node_rect(index) {
                self.debug_draw.draw_rect_xz(min, max, 0.0, color);
            }
        }
    }

    /// Lines produced this frame
    pub fn lines(&self) -> &[DebugLine] {
        self.debug_draw.lines()
    }

    /// Hand this frame's lines to the renderer
    pub fn take_lines(&mut self) -> Vec<DebugLine> {
        self.debug_draw.take_lines()
    }

    /// Access the underlying debug draw system
    pub fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug_draw
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new(&CollisionDebugConfig::default())
    }
}
