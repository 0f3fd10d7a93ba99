//! Debug line drawing
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2:
//! "Debug drawing facilities allow programmers to render simple shapes like
//! lines, points, spheres and boxes for debugging and visualization purposes."
//!
//! Everything is reduced to coloured line segments that a renderer can pick
//! up once per frame with [`DebugDrawSystem::take_lines`].

use crate::foundation::math::{constants::TAU, Vec2, Vec3, Vec4};

/// A coloured line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    /// Start point
    pub start: Vec3,
    /// End point
    pub end: Vec3,
    /// RGBA colour
    pub color: Vec4,
}

/// Box edges as index pairs into the eight corners (bottom face, top face, pillars)
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Line buffer for debug visualisation
#[derive(Debug, Clone)]
pub struct DebugDrawSystem {
    lines: Vec<DebugLine>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            enabled: true,
        }
    }

    /// Draw a line segment
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4) {
        if !self.enabled {
            return;
        }
        self.lines.push(DebugLine { start, end, color });
    }

    /// Draw a sphere as three great circles (XY, YZ and XZ planes)
    pub fn draw_wire_sphere(&mut self, center: Vec3, radius: f32, color: Vec4, segments: u32) {
        let segments = segments.max(3);
        let point = |i: u32| {
            let angle = TAU * i as f32 / segments as f32;
            (angle.cos() * radius, angle.sin() * radius)
        };

        for i in 0..segments {
            let (c0, s0) = point(i);
            let (c1, s1) = point(i + 1);
            self.draw_line(center + Vec3::new(c0, s0, 0.0), center + Vec3::new(c1, s1, 0.0), color);
            self.draw_line(center + Vec3::new(0.0, c0, s0), center + Vec3::new(0.0, c1, s1), color);
            self.draw_line(center + Vec3::new(c0, 0.0, s0), center + Vec3::new(c1, 0.0, s1), color);
        }
    }

    /// Draw a box from its eight corners, bottom face first, then top face
    pub fn draw_box(&mut self, corners: &[Vec3; 8], color: Vec4) {
        for (a, b) in BOX_EDGES {
            self.draw_line(corners[a], corners[b], color);
        }
    }

    /// Draw a rectangle on the ground plane at height `y`
    pub fn draw_rect_xz(&mut self, min: Vec2, max: Vec2, y: f32, color: Vec4) {
        let corners = [
            Vec3::new(min.x, y, min.y),
            Vec3::new(max.x, y, min.y),
            Vec3::new(max.x, y, max.y),
            Vec3::new(min.x, y, max.y),
        ];
        for i in 0..4 {
            self.draw_line(corners[i], corners[(i + 1) % 4], color);
        }
    }

    /// Draw a small three-axis cross marking a point
    pub fn draw_point(&mut self, position: Vec3, size: f32, color: Vec4) {
        let half = size * 0.5;
        for axis in [Vec3::x(), Vec3::y(), Vec3::z()] {
            self.draw_line(position - axis * half, position + axis * half, color);
        }
    }

    /// Lines queued so far
    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    /// Hand the queued lines to the renderer, leaving the buffer empty
    pub fn take_lines(&mut self) -> Vec<DebugLine> {
        std::mem::take(&mut self.lines)
    }

    /// Get the number of queued lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Discard all queued lines
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
