#![allow(missing_docs)]
//! Randomized checks of the collision invariants.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use collision_engine::foundation::math::{constants::PI, Quat, Transform, Unit, Vec2, Vec3, AABB};
use collision_engine::physics::{
    Collider, ColliderHandle, ColliderSet, CollisionDetector, CollisionEvent, CollisionLayers,
    CollisionManager,
};
use collision_engine::core::CollisionConfig;
use collision_engine::spatial::{QuadTree, SpiralHashGrid};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_collider(rng: &mut StdRng) -> Collider {
    let half = Vec3::new(rng.gen_range(0.2..2.0), rng.gen_range(0.2..2.0), rng.gen_range(0.2..2.0));
    let mut collider = match rng.gen_range(0..3) {
        0 => Collider::sphere("Sphere", half.x),
        1 => Collider::aabb("Aabb", -half, half),
        _ => Collider::obb("Obb", -half, half),
    };
    let axis = Vec3::new(rng.gen_range(-1.0..1.0), 1.0, rng.gen_range(-1.0..1.0));
    let rotation = Quat::from_axis_angle(&Unit::new_normalize(axis), rng.gen_range(0.0..PI));
    let position = Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
    collider.update_from(&Transform::from_position_rotation(position, rotation));
    collider
}

fn random_box(rng: &mut StdRng, min: f32, max: f32, max_half: f32) -> AABB {
    let center = Vec3::new(rng.gen_range(min..max), 0.0, rng.gen_range(min..max));
    let half = Vec3::new(rng.gen_range(0.1..max_half), 1.0, rng.gen_range(0.1..max_half));
    AABB::from_center_extents(center, half)
}

fn handles(count: usize) -> Vec<ColliderHandle> {
    let mut colliders = ColliderSet::new();
    (0..count).map(|_| colliders.insert(Collider::sphere("Key", 1.0))).collect()
}

#[test]
fn layer_exemption_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..10_000 {
        let (layer_a, mask_a, layer_b, mask_b) = (rng.gen(), rng.gen(), rng.gen(), rng.gen());
        assert_eq!(
            CollisionLayers::is_exempt(layer_a, mask_a, layer_b, mask_b),
            CollisionLayers::is_exempt(layer_b, mask_b, layer_a, mask_a)
        );
    }

    // Either side's mask is enough to veto
    assert!(CollisionLayers::is_exempt(0b01, 0, 0b10, 0b01));
    assert!(CollisionLayers::is_exempt(0b01, 0b10, 0b10, 0));
    assert!(!CollisionLayers::is_exempt(0b01, 0b100, 0b10, 0b100));
}

#[test]
fn narrow_phase_is_repeatable() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut hits = 0;
    for _ in 0..2_000 {
        let a = random_collider(&mut rng);
        let b = random_collider(&mut rng);
        let first = CollisionDetector::detect_collision(&a, &b);
        for _ in 0..3 {
            assert_eq!(CollisionDetector::detect_collision(&a, &b), first);
        }
        hits += usize::from(first.is_some());
    }
    // The sample exercises both outcomes
    assert!(hits > 0 && hits < 2_000);
}

#[test]
fn quad_tree_registers_at_deepest_containing_node() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut tree = QuadTree::new(Vec2::new(128.0, 128.0), 4, Vec2::zeros()).unwrap();
    let keys = handles(2_000);

    let contains = |(min, max): (Vec2, Vec2), (lo, hi): (Vec2, Vec2)| {
        min.x <= lo.x && min.y <= lo.y && hi.x <= max.x && hi.y <= max.y
    };

    for &key in &keys {
        let bounds = random_box(&mut rng, 6.0, 122.0, 6.0);
        let footprint = bounds.ground_footprint();
        let node = tree.register_obj(key, &bounds);

        let rect = tree.node_rect(node).unwrap();
        assert!(contains(rect, footprint), "node {} does not contain {:?}", node, footprint);
        assert!(tree.objects_at(node).contains(&key));

        if tree.node_level(node).unwrap() < tree.level() {
            for child in (1..=4).map(|i| node * 4 + i) {
                let child_rect = tree.node_rect(child).unwrap();
                assert!(!contains(child_rect, footprint), "child {} of {} also contains {:?}", child, node, footprint);
            }
        }
    }
    assert_eq!(tree.len(), keys.len());
}

#[test]
fn quad_tree_keeps_out_of_field_colliders_at_root() {
    let mut tree = QuadTree::new(Vec2::new(64.0, 64.0), 3, Vec2::zeros()).unwrap();
    let keys = handles(2);
    let outside = AABB::from_center_extents(Vec3::new(-40.0, 0.0, 10.0), Vec3::repeat(1.0));
    let inside = AABB::from_center_extents(Vec3::new(5.0, 0.0, 5.0), Vec3::repeat(1.0));

    assert_eq!(tree.register_obj(keys[0], &outside), 0);
    tree.register_obj(keys[1], &inside);
    assert_eq!(tree.collision_pairs().len(), 1);
}

#[test]
fn spiral_grid_finds_every_overlapping_static() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut grid = SpiralHashGrid::new(4.0).unwrap();
    let keys = handles(600);

    let statics: Vec<(ColliderHandle, AABB)> = keys[..500]
        .iter()
        .map(|&key| {
            // A few large walls among many small props
            let max_half = if rng.gen_bool(0.05) { 20.0 } else { 2.0 };
            (key, random_box(&mut rng, -100.0, 100.0, max_half))
        })
        .collect();
    for (key, bounds) in &statics {
        grid.add_collider(*key, bounds);
    }

    for &query_key in &keys[500..] {
        let query = random_box(&mut rng, -100.0, 100.0, 6.0);
        let found: HashSet<_> = grid.check_collision(&query, Some(query_key)).into_iter().collect();
        for (key, bounds) in &statics {
            if bounds.intersects(&query) {
                assert!(found.contains(key), "overlapping static {:?} missed", key);
            }
        }
    }
}

#[test]
fn unregistered_collider_is_never_tested_again() {
    let config = CollisionConfig::default().with_thread_count(3);
    let mut manager = CollisionManager::new(config).unwrap();
    let mut colliders = ColliderSet::new();
    let seen: Arc<Mutex<Vec<CollisionEvent>>> = Arc::new(Mutex::new(Vec::new()));

    let mut wall = Collider::aabb("Wall", Vec3::new(-5.0, -1.0, -1.0), Vec3::new(5.0, 1.0, 1.0));
    wall.update_from(&Transform::identity());
    let wall = colliders.insert(wall);

    // Every dynamic touching the wall asks for its removal
    let mut dynamics = Vec::new();
    for i in 0..5 {
        let mut ball = Collider::sphere("Ball", 0.8);
        ball.update_from(&Transform::from_position(Vec3::new(-4.0 + 2.0 * i as f32, 0.0, 1.0)));
        let sink = Arc::clone(&seen);
        ball.set_on_collision(move |event, commands| {
            sink.lock().unwrap().push(*event);
            commands.unregister(event.other);
        });
        dynamics.push(colliders.insert(ball));
    }

    manager.register_static_collider(&mut colliders, wall);
    for &ball in &dynamics {
        manager.register_collider(&colliders, ball);
    }
    manager.update(&mut colliders);
    assert_eq!(seen.lock().unwrap().len(), dynamics.len());
    assert_eq!(manager.pending_unregistrations(), &[wall]);

    // Still in place until the next frame starts
    assert!(manager.is_static_registered(wall));
    assert!(manager.hash_grid().contains(wall));

    seen.lock().unwrap().clear();
    for &ball in &dynamics {
        manager.register_collider(&colliders, ball);
    }
    manager.update(&mut colliders);

    // The balls only ever touched the wall
    assert!(seen.lock().unwrap().is_empty());
    assert!(!manager.is_static_registered(wall));
    assert!(!manager.hash_grid().contains(wall));
}

#[test]
fn every_pair_fires_two_mirrored_callbacks() {
    let mut rng = StdRng::seed_from_u64(6);
    let config = CollisionConfig::default()
        .with_field(Vec2::new(40.0, 40.0), 3, Vec2::new(-20.0, -20.0))
        .with_thread_count(4);
    let mut manager = CollisionManager::new(config).unwrap();
    let mut colliders = ColliderSet::new();
    let seen: Arc<Mutex<Vec<CollisionEvent>>> = Arc::new(Mutex::new(Vec::new()));

    let mut all = Vec::new();
    for _ in 0..60 {
        let mut collider = random_collider(&mut rng);
        let sink = Arc::clone(&seen);
        collider.set_on_collision(move |event, _| sink.lock().unwrap().push(*event));
        all.push(colliders.insert(collider));
    }
    for &handle in &all {
        manager.register_collider(&colliders, handle);
    }

    manager.check_collisions(&colliders);
    let pairs = manager.collision_pairs().to_vec();
    assert!(!pairs.is_empty());
    manager.update(&mut colliders);

    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 2 * pairs.len());
    for pair in &pairs {
        let forward: Vec<_> = events.iter().filter(|e| e.caller == pair.a && e.other == pair.b).collect();
        let backward: Vec<_> = events.iter().filter(|e| e.caller == pair.b && e.other == pair.a).collect();
        assert_eq!(forward.len(), 1);
        assert_eq!(backward.len(), 1);
        assert_eq!(forward[0].info.contact_normal, -backward[0].info.contact_normal);
    }
}
