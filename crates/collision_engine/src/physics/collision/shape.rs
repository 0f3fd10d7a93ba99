//! Collider shape variants
//!
//! Each variant stores its parameters in model space (relative to the owner's
//! origin, shifted by a reference point) together with a cached world-space
//! representation. [`ColliderShape::update`] refreshes the cache from the
//! owner's transform; the narrow phase only ever reads the cached values.

use crate::foundation::math::{Transform, Vec3, AABB};
use super::primitives::BoundingSphere;

/// Which shape variant a collider is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundingBox {
    /// Not configured yet
    #[default]
    None,
    /// Sphere
    Sphere,
    /// Axis-aligned box
    Aabb,
    /// Oriented box
    Obb,
}

/// Sphere shape
#[derive(Debug, Clone, PartialEq)]
pub struct SphereShape {
    /// Model-space radius
    pub radius: f32,
    /// Model-space centre offset
    pub reference_point: Vec3,
    center: Vec3,
    world_radius: f32,
}

impl SphereShape {
    /// Create a sphere centred on the owner's origin
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            reference_point: Vec3::zeros(),
            center: Vec3::zeros(),
            world_radius: radius,
        }
    }

    /// World-space centre
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// World-space radius (scaled by the largest scale component)
    pub fn world_radius(&self) -> f32 {
        self.world_radius
    }

    fn update(&mut self, transform: &Transform) {
        self.center = transform.transform_point(self.reference_point);
        self.world_radius = self.radius * transform.max_scale();
    }

    fn bounds(&self) -> AABB {
        AABB::from_center_extents(self.center, Vec3::repeat(self.world_radius))
    }
}

/// Axis-aligned box shape
///
/// The owner's rotation does not rotate the box; the world box is the tightest
/// axis-aligned box around the transformed model-space corners.
#[derive(Debug, Clone, PartialEq)]
pub struct AabbShape {
    /// Model-space minimum corner
    pub min: Vec3,
    /// Model-space maximum corner
    pub max: Vec3,
    /// Model-space offset applied to both corners
    pub reference_point: Vec3,
    world: AABB,
}

impl AabbShape {
    /// Create a box from model-space corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            reference_point: Vec3::zeros(),
            world: AABB::new(min, max),
        }
    }

    /// World-space box
    pub fn world(&self) -> &AABB {
        &self.world
    }

    /// Closest point inside the world box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.sup(&self.world.min).inf(&self.world.max)
    }

    /// The box viewed as an OBB with identity axes
    pub fn as_obb(&self) -> ObbShape {
        ObbShape {
            min: self.min,
            max: self.max,
            reference_point: self.reference_point,
            center: self.world.center(),
            half_extents: self.world.extents(),
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
        }
    }

    fn update(&mut self, transform: &Transform) {
        let local = AABB::new(self.min + self.reference_point, self.max + self.reference_point);
        let corners = local.corners().map(|corner| transform.transform_point(corner));
        self.world = AABB::from_points(&corners);
    }
}

/// Oriented box shape
#[derive(Debug, Clone, PartialEq)]
pub struct ObbShape {
    /// Model-space minimum corner
    pub min: Vec3,
    /// Model-space maximum corner
    pub max: Vec3,
    /// Model-space offset applied to both corners
    pub reference_point: Vec3,
    center: Vec3,
    half_extents: Vec3,
    axes: [Vec3; 3],
}

impl ObbShape {
    /// Create an oriented box from model-space corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        let mut obb = Self {
            min,
            max,
            reference_point: Vec3::zeros(),
            center: Vec3::zeros(),
            half_extents: Vec3::zeros(),
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
        };
        obb.update(&Transform::identity());
        obb
    }

    /// World-space centre
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// World-space half extents along each local axis
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// World-space unit axes
    pub fn axes(&self) -> &[Vec3; 3] {
        &self.axes
    }

    /// Express a world point in box-local coordinates
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        let d = point - self.center;
        Vec3::new(d.dot(&self.axes[0]), d.dot(&self.axes[1]), d.dot(&self.axes[2]))
    }

    /// Convert box-local coordinates back to world space
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.center + self.axes[0] * local.x + self.axes[1] * local.y + self.axes[2] * local.z
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let local = self.to_local(point);
        let clamped = local.sup(&-self.half_extents).inf(&self.half_extents);
        self.to_world(clamped)
    }

    /// The eight world-space corners, bottom face first, then top face
    pub fn vertices(&self) -> [Vec3; 8] {
        let h = self.half_extents;
        AABB::from_center_extents(Vec3::zeros(), h)
            .corners()
            .map(|local| self.to_world(local))
    }

    /// Projected radius of the box onto a unit axis
    pub fn project_radius(&self, axis: &Vec3) -> f32 {
        self.half_extents.x * axis.dot(&self.axes[0]).abs()
            + self.half_extents.y * axis.dot(&self.axes[1]).abs()
            + self.half_extents.z * axis.dot(&self.axes[2]).abs()
    }

    fn update(&mut self, transform: &Transform) {
        let local_center = (self.min + self.max) * 0.5 + self.reference_point;
        self.center = transform.transform_point(local_center);
        self.half_extents = ((self.max - self.min) * 0.5).component_mul(&transform.scale.abs());
        self.axes = transform.axes();
    }

    fn bounds(&self) -> AABB {
        let extents = Vec3::new(
            self.project_radius(&Vec3::x()),
            self.project_radius(&Vec3::y()),
            self.project_radius(&Vec3::z()),
        );
        AABB::from_center_extents(self.center, extents)
    }
}

/// A configured collider shape
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Sphere
    Sphere(SphereShape),
    /// Axis-aligned box
    Aabb(AabbShape),
    /// Oriented box
    Obb(ObbShape),
}

impl ColliderShape {
    /// The variant tag
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Self::Sphere(_) => BoundingBox::Sphere,
            Self::Aabb(_) => BoundingBox::Aabb,
            Self::Obb(_) => BoundingBox::Obb,
        }
    }

    /// Recompute the world-space representation from the owner's transform
    pub fn update(&mut self, transform: &Transform) {
        match self {
            Self::Sphere(sphere) => sphere.update(transform),
            Self::Aabb(aabb) => aabb.update(transform),
            Self::Obb(obb) => obb.update(transform),
        }
    }

    /// Set the model-space reference point
    pub fn set_reference_point(&mut self, reference_point: Vec3) {
        match self {
            Self::Sphere(sphere) => sphere.reference_point = reference_point,
            Self::Aabb(aabb) => aabb.reference_point = reference_point,
            Self::Obb(obb) => obb.reference_point = reference_point,
        }
    }

    /// World-space bounding box
    pub fn bounds(&self) -> AABB {
        match self {
            Self::Sphere(sphere) => sphere.bounds(),
            Self::Aabb(aabb) => aabb.world,
            Self::Obb(obb) => obb.bounds(),
        }
    }

    /// World-space centre
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.center,
            Self::Aabb(aabb) => aabb.world.center(),
            Self::Obb(obb) => obb.center,
        }
    }

    /// Whether a world-space point lies inside the shape
    pub fn contains(&self, point: Vec3) -> bool {
        match self {
            Self::Sphere(sphere) => {
                (point - sphere.center).magnitude_squared() <= sphere.world_radius * sphere.world_radius
            }
            Self::Aabb(aabb) => aabb.world.contains_point(point),
            Self::Obb(obb) => {
                let local = obb.to_local(point);
                local.x.abs() <= obb.half_extents.x
                    && local.y.abs() <= obb.half_extents.y
                    && local.z.abs() <= obb.half_extents.z
            }
        }
    }

    /// Closest point on or inside the shape to a world-space point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        match self {
            Self::Sphere(sphere) => {
                let offset = point - sphere.center;
                let distance = offset.magnitude();
                if distance <= sphere.world_radius {
                    point
                } else {
                    sphere.center + offset * (sphere.world_radius / distance)
                }
            }
            Self::Aabb(aabb) => aabb.closest_point(point),
            Self::Obb(obb) => obb.closest_point(point),
        }
    }

    /// World-space bounding sphere, used to early-out the narrow phase
    pub fn bounding_sphere(&self) -> BoundingSphere {
        match self {
            Self::Sphere(sphere) => BoundingSphere::new(sphere.center, sphere.world_radius),
            Self::Aabb(aabb) => BoundingSphere::new(aabb.world.center(), aabb.world.extents().magnitude()),
            Self::Obb(obb) => BoundingSphere::new(obb.center, obb.half_extents.magnitude()),
        }
    }
}
