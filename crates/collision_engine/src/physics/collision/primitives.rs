//! Primitive collision shapes and intersection algorithms
//!
//! Provides rays, bounding spheres and the slab test shared by the box
//! shapes' ray casts.

use crate::foundation::math::{constants::EPSILON, Vec3};

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (unit length, or zero for a degenerate ray)
    pub direction: Vec3,
    /// Maximum hit distance
    pub length: f32,
}

impl Ray {
    /// Creates a new ray with the given origin, direction and length
    ///
    /// A zero direction produces a degenerate ray that never hits anything.
    pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros),
            length,
        }
    }

    /// Creates a ray without a distance limit
    pub fn infinite(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, f32::INFINITY)
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether the direction collapsed to zero
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::zeros()
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Test ray intersection with this sphere
    /// Returns (distance, normal) if hit, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        if ray.is_degenerate() {
            return None;
        }

        // Solve: |origin + t*direction - center|^2 = radius^2
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        // Closest non-negative intersection; from inside this is the exit point
        let t = if t1 >= 0.0 {
            t1
        } else if t2 >= 0.0 {
            t2
        } else {
            return None;
        };

        let normal = (ray.point_at(t) - self.center)
            .try_normalize(EPSILON)
            .unwrap_or_else(|| -ray.direction);
        Some((t, normal))
    }
}

/// Slab test against a box centred on the origin of its own frame
///
/// `origin` and `direction` are expressed in the box frame. Returns the hit
/// distance and the box-frame normal of the face hit. A ray starting inside
/// the box reports its exit face.
pub fn intersect_ray_box(origin: Vec3, direction: Vec3, half_extents: Vec3) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::zeros();
    let mut exit_normal = Vec3::zeros();

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let h = half_extents[axis];

        if d.abs() < f32::EPSILON {
            // Parallel to this slab: must already lie within it
            if o < -h || o > h {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (near, far) = {
            let t0 = (-h - o) * inv;
            let t1 = (h - o) * inv;
            if t0 <= t1 { (t0, t1) } else { (t1, t0) }
        };
        let entering_sign = if d > 0.0 { -1.0 } else { 1.0 };

        if near > t_enter {
            t_enter = near;
            enter_normal = Vec3::zeros();
            enter_normal[axis] = entering_sign;
        }
        if far < t_exit {
            t_exit = far;
            exit_normal = Vec3::zeros();
            exit_normal[axis] = -entering_sign;
        }
        if t_enter > t_exit {
            return None;
        }
    }

    if !t_exit.is_finite() || t_exit < 0.0 {
        return None;
    }
    if t_enter >= 0.0 {
        Some((t_enter, enter_normal))
    } else {
        Some((t_exit, exit_normal))
    }
}
