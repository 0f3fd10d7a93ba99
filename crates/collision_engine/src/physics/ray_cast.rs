//! Ray casting against colliders
//!
//! Rays are tested against the cached world-space shapes, so colliders must
//! have been updated this frame for the results to be current.

use crate::foundation::math::Vec3;
use crate::physics::collider::{Collider, ColliderHandle, ColliderSet};
use crate::physics::collision::primitives::{intersect_ray_box, BoundingSphere, Ray};
use crate::physics::collision::ColliderShape;

/// Result of a ray hitting a collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastHit {
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// The collider that was hit
    pub collider: ColliderHandle,
}

impl ColliderShape {
    /// Intersect a ray with this shape, returning `(distance, normal)`
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        if ray.is_degenerate() {
            return None;
        }

        let (distance, normal) = match self {
            Self::Sphere(sphere) => {
                BoundingSphere::new(sphere.center(), sphere.world_radius()).intersect_ray(ray)?
            }
            Self::Aabb(aabb) => {
                let world = aabb.world();
                intersect_ray_box(ray.origin - world.center(), ray.direction, world.extents())?
            }
            Self::Obb(obb) => {
                let local_direction = obb.to_local(obb.center() + ray.direction);
                let (distance, local_normal) =
                    intersect_ray_box(obb.to_local(ray.origin), local_direction, obb.half_extents())?;
                (distance, obb.to_world(local_normal) - obb.center())
            }
        };

        (distance <= ray.length).then_some((distance, normal))
    }
}

impl Collider {
    /// Intersect a ray with this collider's shape
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        self.shape()?.intersect_ray(ray)
    }
}

impl ColliderSet {
    /// Cast a ray against a single collider
    ///
    /// Stale handles and colliders without a shape never report a hit.
    pub fn ray_cast(&self, ray: &Ray, handle: ColliderHandle) -> Option<RayCastHit> {
        let (distance, normal) = self.get(handle)?.intersect_ray(ray)?;
        Some(RayCastHit {
            distance,
            point: ray.point_at(distance),
            normal,
            collider: handle,
        })
    }

    /// Cast a ray against every collider whose layer intersects `layer_mask`
    ///
    /// Hits are sorted nearest first.
    pub fn ray_cast_all(&self, ray: &Ray, layer_mask: u32) -> Vec<RayCastHit> {
        let mut hits: Vec<RayCastHit> = self
            .iter()
            .filter(|(_, collider)| collider.layer() & layer_mask != 0)
            .filter_map(|(handle, _)| self.ray_cast(ray, handle))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest hit among colliders whose layer intersects `layer_mask`
    pub fn ray_cast_first(&self, ray: &Ray, layer_mask: u32) -> Option<RayCastHit> {
        self.iter()
            .filter(|(_, collider)| collider.layer() & layer_mask != 0)
            .filter_map(|(handle, _)| self.ray_cast(ray, handle))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
