//! Narrow-phase shape intersection
//!
//! GEA 13.3.4: "The narrow phase performs detailed shape-to-shape tests."
//!
//! Every routine here is a pure function of the two world-space shapes, so
//! the parallel narrow phase can call it from any worker without locking.
//! The contact normal always points from the first collider toward the
//! second; mirrored combinations run the canonical test with swapped
//! arguments and negate the normal.

use crate::foundation::math::{constants::EPSILON, Vec3, AABB};
use crate::physics::collider::Collider;
use crate::physics::collision::{AabbShape, ColliderInfo, ColliderShape, ObbShape, SphereShape};

/// Stateless narrow-phase dispatcher
pub struct CollisionDetector;

impl CollisionDetector {
    /// Test two colliders for overlap
    ///
    /// Returns `None` when either collider has no shape or the shapes are
    /// apart.
    pub fn detect_collision(a: &Collider, b: &Collider) -> Option<ColliderInfo> {
        Self::detect_shapes(a.shape()?, b.shape()?)
    }

    /// Test two world-space shapes for overlap
    pub fn detect_shapes(a: &ColliderShape, b: &ColliderShape) -> Option<ColliderInfo> {
        if !a.bounding_sphere().intersects(&b.bounding_sphere()) {
            return None;
        }

        use ColliderShape::{Aabb, Obb, Sphere};
        match (a, b) {
            (Sphere(a), Sphere(b)) => sphere_sphere(a, b),
            (Sphere(a), Aabb(b)) => sphere_aabb(a, b),
            (Aabb(a), Sphere(b)) => sphere_aabb(b, a).map(ColliderInfo::flipped),
            (Sphere(a), Obb(b)) => sphere_obb(a, b),
            (Obb(a), Sphere(b)) => sphere_obb(b, a).map(ColliderInfo::flipped),
            (Aabb(a), Aabb(b)) => aabb_aabb(a.world(), b.world()),
            (Aabb(a), Obb(b)) => obb_obb(&a.as_obb(), b),
            (Obb(a), Aabb(b)) => obb_obb(&b.as_obb(), a).map(ColliderInfo::flipped),
            (Obb(a), Obb(b)) => obb_obb(a, b),
        }
    }
}

fn sphere_sphere(a: &SphereShape, b: &SphereShape) -> Option<ColliderInfo> {
    let direction = b.center() - a.center();
    let distance_sq = direction.magnitude_squared();
    let radius_sum = a.world_radius() + b.world_radius();
    if distance_sq > radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    // Coincident centres fall back to an up normal
    let normal = if distance > EPSILON { direction / distance } else { Vec3::y() };
    Some(ColliderInfo::hit(
        a.center() + normal * a.world_radius(),
        normal,
        radius_sum - distance,
    ))
}

/// Sphere against a box centred on the origin of its own frame
///
/// Returns the contact point and normal in the box frame plus the penetration.
fn sphere_box_local(center: Vec3, radius: f32, half_extents: Vec3) -> Option<(Vec3, Vec3, f32)> {
    let closest = center.sup(&-half_extents).inf(&half_extents);
    let offset = closest - center;
    let distance_sq = offset.magnitude_squared();
    if distance_sq > radius * radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    if distance > EPSILON {
        return Some((closest, offset / distance, radius - distance));
    }

    // Centre is inside the box: push out through the nearest face
    let mut best = (0, 1.0_f32, f32::MAX);
    for axis in 0..3 {
        for sign in [1.0_f32, -1.0] {
            let depth = half_extents[axis] - sign * center[axis];
            if depth < best.2 {
                best = (axis, sign, depth);
            }
        }
    }
    let (axis, sign, depth) = best;

    let mut normal = Vec3::zeros();
    normal[axis] = -sign;
    let mut contact = center;
    contact[axis] = sign * half_extents[axis];
    Some((contact, normal, radius + depth))
}

fn sphere_aabb(sphere: &SphereShape, aabb: &AabbShape) -> Option<ColliderInfo> {
    let world = aabb.world();
    let box_center = world.center();
    let (contact, normal, penetration) =
        sphere_box_local(sphere.center() - box_center, sphere.world_radius(), world.extents())?;
    Some(ColliderInfo::hit(contact + box_center, normal, penetration))
}

fn sphere_obb(sphere: &SphereShape, obb: &ObbShape) -> Option<ColliderInfo> {
    let local_center = obb.to_local(sphere.center());
    let (contact, normal, penetration) =
        sphere_box_local(local_center, sphere.world_radius(), obb.half_extents())?;
    let world_normal = obb.to_world(normal) - obb.center();
    Some(ColliderInfo::hit(obb.to_world(contact), world_normal, penetration))
}

fn aabb_aabb(a: &AABB, b: &AABB) -> Option<ColliderInfo> {
    if !a.intersects(b) {
        return None;
    }

    let overlap_min = a.min.sup(&b.min);
    let overlap_max = a.max.inf(&b.max);
    let overlap = overlap_max - overlap_min;
    let (center_a, center_b) = (a.center(), b.center());

    // Separate along the axis of least overlap
    let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        0
    } else if overlap.y <= overlap.z {
        1
    } else {
        2
    };

    let mut normal = Vec3::zeros();
    normal[axis] = if center_a[axis] <= center_b[axis] { 1.0 } else { -1.0 };
    Some(ColliderInfo::hit((overlap_min + overlap_max) * 0.5, normal, overlap[axis]))
}

/// Separating axis test over the 15 candidate axes of two boxes
fn obb_obb(a: &ObbShape, b: &ObbShape) -> Option<ColliderInfo> {
    let between = b.center() - a.center();

    let mut best_axis = Vec3::y();
    let mut best_overlap = f32::MAX;

    let mut test_axis = |axis: Vec3| -> bool {
        let length = axis.magnitude();
        if length < EPSILON {
            // Parallel edges give no new information
            return true;
        }
        let axis = axis / length;

        let distance = between.dot(&axis);
        let overlap = a.project_radius(&axis) + b.project_radius(&axis) - distance.abs();
        if overlap < 0.0 {
            return false;
        }
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = if distance < 0.0 { -axis } else { axis };
        }
        true
    };

    for axis in a.axes() {
        if !test_axis(*axis) {
            return None;
        }
    }
    for axis in b.axes() {
        if !test_axis(*axis) {
            return None;
        }
    }
    for axis_a in a.axes() {
        for axis_b in b.axes() {
            if !test_axis(axis_a.cross(axis_b)) {
                return None;
            }
        }
    }

    let on_a = a.closest_point(b.center());
    let on_b = b.closest_point(a.center());
    Some(ColliderInfo::hit((on_a + on_b) * 0.5, best_axis, best_overlap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::PI, Quat, Transform};
    use approx::assert_relative_eq;

    fn sphere_at(position: Vec3, radius: f32) -> Collider {
        let mut collider = Collider::sphere("Sphere", radius);
        collider.update_from(&Transform::from_position(position));
        collider
    }

    fn unit_box_at(position: Vec3) -> Collider {
        let mut collider = Collider::aabb("Box", Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        collider.update_from(&Transform::from_position(position));
        collider
    }

    fn rotated_cube(position: Vec3, yaw: f32) -> Collider {
        let mut collider = Collider::obb("Cube", Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
        collider.update_from(&Transform::from_position_rotation(position, rotation));
        collider
    }

    #[test]
    fn test_overlapping_spheres_collide() {
        let a = sphere_at(Vec3::zeros(), 1.0);
        let b = sphere_at(Vec3::new(1.5, 0.0, 0.0), 1.0);

        let info = CollisionDetector::detect_collision(&a, &b).unwrap();
        assert!(info.has_collision);
        assert_relative_eq!(info.contact_normal, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(info.penetration, 0.5);
        assert_relative_eq!(info.contact_point, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_distant_spheres_do_not_collide() {
        let a = sphere_at(Vec3::zeros(), 1.0);
        let b = sphere_at(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(CollisionDetector::detect_collision(&a, &b).is_none());
    }

    #[test]
    fn test_concentric_spheres_use_up_normal() {
        let a = sphere_at(Vec3::zeros(), 1.0);
        let b = sphere_at(Vec3::zeros(), 0.5);
        let info = CollisionDetector::detect_collision(&a, &b).unwrap();
        assert_eq!(info.contact_normal, Vec3::y());
    }

    #[test]
    fn test_sphere_box_normal_points_from_first_to_second() {
        let sphere = sphere_at(Vec3::new(1.3, 0.0, 0.0), 0.5);
        let cube = unit_box_at(Vec3::zeros());

        let forward = CollisionDetector::detect_collision(&sphere, &cube).unwrap();
        assert_relative_eq!(forward.contact_normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1.0e-5);
        assert_relative_eq!(forward.penetration, 0.2, epsilon = 1.0e-5);
        assert_relative_eq!(forward.contact_point, Vec3::new(1.0, 0.0, 0.0), epsilon = 1.0e-5);

        let mirrored = CollisionDetector::detect_collision(&cube, &sphere).unwrap();
        assert_eq!(mirrored.contact_normal, -forward.contact_normal);
        assert_eq!(mirrored.contact_point, forward.contact_point);
    }

    #[test]
    fn test_sphere_centre_inside_box_uses_nearest_face() {
        let sphere = sphere_at(Vec3::new(0.8, 0.0, 0.0), 0.5);
        let cube = unit_box_at(Vec3::zeros());

        let info = CollisionDetector::detect_collision(&sphere, &cube).unwrap();
        assert_relative_eq!(info.contact_normal, Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(info.penetration, 0.7, epsilon = 1.0e-5);
        assert_relative_eq!(info.contact_point, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_sphere_against_rotated_box() {
        let cube = rotated_cube(Vec3::zeros(), PI * 0.25);
        // The rotated corner reaches x = sqrt(2)
        let near = sphere_at(Vec3::new(1.8, 0.0, 0.0), 0.5);
        let far = sphere_at(Vec3::new(2.0, 0.0, 0.0), 0.5);

        let info = CollisionDetector::detect_collision(&near, &cube).unwrap();
        assert!(info.contact_normal.x < 0.0);
        assert!(CollisionDetector::detect_collision(&far, &cube).is_none());
    }

    #[test]
    fn test_aabb_pair_separates_along_least_overlap() {
        let a = unit_box_at(Vec3::zeros());
        let b = unit_box_at(Vec3::new(0.5, 1.8, 0.0));

        let info = CollisionDetector::detect_collision(&a, &b).unwrap();
        assert_eq!(info.contact_normal, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(info.penetration, 0.2, epsilon = 1.0e-5);
        assert_relative_eq!(info.contact_point, Vec3::new(0.25, 0.9, 0.0), epsilon = 1.0e-5);

        let mirrored = CollisionDetector::detect_collision(&b, &a).unwrap();
        assert_eq!(mirrored.contact_normal, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_rotated_boxes_separated_despite_overlapping_bounds() {
        let a = rotated_cube(Vec3::zeros(), PI * 0.25);
        let b = rotated_cube(Vec3::new(1.6, 0.0, 1.6), PI * 0.25);

        assert!(a.bounds().unwrap().intersects(&b.bounds().unwrap()));
        assert!(CollisionDetector::detect_collision(&a, &b).is_none());
    }

    #[test]
    fn test_obb_pair_normal_points_from_first_to_second() {
        let a = rotated_cube(Vec3::zeros(), PI * 0.25);
        let b = rotated_cube(Vec3::new(1.2, 0.0, 1.2), PI * 0.25);

        let info = CollisionDetector::detect_collision(&a, &b).unwrap();
        assert!(info.contact_normal.dot(&Vec3::new(1.0, 0.0, 1.0)) > 0.0);
        let mirrored = CollisionDetector::detect_collision(&b, &a).unwrap();
        assert_relative_eq!(mirrored.contact_normal, -info.contact_normal, epsilon = 1.0e-5);
    }

    #[test]
    fn test_aabb_against_obb_and_back() {
        let aabb = unit_box_at(Vec3::new(2.5, 0.0, 0.0));
        let obb = rotated_cube(Vec3::zeros(), PI * 0.25);

        // Rotated corner at sqrt(2) < 1.5: apart
        assert!(CollisionDetector::detect_collision(&aabb, &obb).is_none());

        let aabb = unit_box_at(Vec3::new(2.2, 0.0, 0.0));
        let info = CollisionDetector::detect_collision(&obb, &aabb).unwrap();
        assert!(info.contact_normal.x > 0.0);
        let mirrored = CollisionDetector::detect_collision(&aabb, &obb).unwrap();
        assert_relative_eq!(mirrored.contact_normal, -info.contact_normal, epsilon = 1.0e-5);
    }

    #[test]
    fn test_detection_is_pure() {
        let a = rotated_cube(Vec3::zeros(), 0.3);
        let b = sphere_at(Vec3::new(1.2, 0.3, 0.1), 0.6);

        let first = CollisionDetector::detect_collision(&a, &b);
        for _ in 0..10 {
            assert_eq!(CollisionDetector::detect_collision(&a, &b), first);
        }
    }

    #[test]
    fn test_unconfigured_collider_never_collides() {
        let a = Collider::new("Empty");
        let b = sphere_at(Vec3::zeros(), 1.0);
        assert!(CollisionDetector::detect_collision(&a, &b).is_none());
    }
}
