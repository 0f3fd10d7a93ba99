//! Narrow-phase contact data

use crate::foundation::math::Vec3;

/// Result of one narrow-phase test
///
/// `contact_normal` points from the first collider toward the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderInfo {
    /// Whether the two shapes overlap
    pub has_collision: bool,
    /// Representative world-space contact point
    pub contact_point: Vec3,
    /// Unit normal from the first collider toward the second
    pub contact_normal: Vec3,
    /// Overlap depth along the normal
    pub penetration: f32,
}

impl Default for ColliderInfo {
    fn default() -> Self {
        Self {
            has_collision: false,
            contact_point: Vec3::zeros(),
            contact_normal: Vec3::zeros(),
            penetration: 0.0,
        }
    }
}

impl ColliderInfo {
    /// A positive contact
    pub fn hit(contact_point: Vec3, contact_normal: Vec3, penetration: f32) -> Self {
        Self {
            has_collision: true,
            contact_point,
            contact_normal,
            penetration,
        }
    }

    /// The same contact seen from the other collider
    pub fn flipped(self) -> Self {
        Self {
            contact_normal: -self.contact_normal,
            ..self
        }
    }
}
