#![allow(missing_docs)]
//! End-to-end collision frames through the manager.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use collision_engine::foundation::logging;
use collision_engine::foundation::math::{constants::PI, Quat, Transform, Vec2, Vec3};
use collision_engine::physics::{
    Collider, ColliderHandle, ColliderSet, CollisionDetector, CollisionEvent, CollisionManager,
};
use collision_engine::core::CollisionConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn manager(thread_count: usize) -> CollisionManager {
    logging::init_for_tests();
    let config = CollisionConfig::default()
        .with_field(Vec2::new(200.0, 200.0), 4, Vec2::new(-100.0, -100.0))
        .with_cell_size(10.0)
        .with_thread_count(thread_count);
    CollisionManager::new(config).unwrap()
}

fn sphere_at(colliders: &mut ColliderSet, name: &str, position: Vec3, radius: f32) -> ColliderHandle {
    let mut collider = Collider::sphere(name, radius);
    collider.update_from(&Transform::from_position(position));
    colliders.insert(collider)
}

fn counting(colliders: &mut ColliderSet, handle: ColliderHandle) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&count);
    colliders[handle].set_on_collision(move |_, _| {
        inner.fetch_add(1, Ordering::SeqCst);
    });
    count
}

#[test]
fn overlapping_spheres_collide() {
    let mut colliders = ColliderSet::new();
    let a = sphere_at(&mut colliders, "A", Vec3::zeros(), 1.0);
    let b = sphere_at(&mut colliders, "B", Vec3::new(1.5, 0.0, 0.0), 1.0);

    let info = CollisionDetector::detect_collision(&colliders[a], &colliders[b]).unwrap();
    assert!(info.has_collision);
    assert!(info.contact_normal.x > 0.0);
}

#[test]
fn separated_spheres_do_not_collide() {
    let mut colliders = ColliderSet::new();
    let a = sphere_at(&mut colliders, "A", Vec3::zeros(), 1.0);
    let b = sphere_at(&mut colliders, "B", Vec3::new(3.0, 0.0, 0.0), 1.0);

    assert!(CollisionDetector::detect_collision(&colliders[a], &colliders[b]).is_none());
}

#[test]
fn unregister_from_callback_waits_for_next_frame() {
    let mut manager = manager(2);
    let mut colliders = ColliderSet::new();

    let wall = sphere_at(&mut colliders, "Wall", Vec3::zeros(), 1.0);
    colliders[wall].set_on_collision(|event, commands| commands.unregister(event.caller));
    let player = sphere_at(&mut colliders, "Player", Vec3::new(1.5, 0.0, 0.0), 1.0);
    let player_hits = counting(&mut colliders, player);

    manager.register_static_collider(&mut colliders, wall);
    assert!(manager.is_static_registered(wall));

    manager.register_collider(&colliders, player);
    manager.update(&mut colliders);

    // Still registered after the frame that asked for removal
    assert_eq!(player_hits.load(Ordering::SeqCst), 1);
    assert!(manager.is_static_registered(wall));
    assert_eq!(manager.pending_unregistrations(), &[wall]);

    manager.register_collider(&colliders, player);
    manager.update(&mut colliders);

    assert!(!manager.is_static_registered(wall));
    assert!(manager.pending_unregistrations().is_empty());
    assert_eq!(player_hits.load(Ordering::SeqCst), 1);
    assert!(!colliders[player].is_colliding_with(wall));
    assert_eq!(colliders[player].exited(), &[wall]);
    // Both sides see the contact end
    assert!(!colliders[wall].is_hit());
    assert_eq!(colliders[wall].exited(), &[player]);
}

#[test]
fn same_cell_static_without_overlap_is_candidate_only() {
    let mut manager = manager(2);
    let mut colliders = ColliderSet::new();

    let rock = sphere_at(&mut colliders, "Rock", Vec3::new(1.0, 0.0, 1.0), 0.5);
    let rock_hits = counting(&mut colliders, rock);
    let player = sphere_at(&mut colliders, "Player", Vec3::new(8.0, 0.0, 8.0), 0.5);
    let player_hits = counting(&mut colliders, player);

    manager.register_static_collider(&mut colliders, rock);
    let player_bounds = colliders[player].bounds().unwrap();
    assert_eq!(manager.hash_grid().check_collision(&player_bounds, Some(player)), vec![rock]);
    assert!(CollisionDetector::detect_collision(&colliders[player], &colliders[rock]).is_none());

    manager.register_collider(&colliders, player);
    manager.update(&mut colliders);

    let stats = manager.stats();
    assert_eq!(stats.candidate_pairs, 1);
    assert_eq!(stats.active_pairs, 0);
    assert_eq!(rock_hits.load(Ordering::SeqCst), 0);
    assert_eq!(player_hits.load(Ordering::SeqCst), 0);
}

/// Ten thousand mixed colliders on a jittered lattice, no two overlapping
fn scattered_field(colliders: &mut ColliderSet, hits: &Arc<AtomicUsize>) -> Vec<ColliderHandle> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut handles = Vec::with_capacity(10_000);

    for i in 0..100 {
        for j in 0..100 {
            let position = Vec3::new(
                -495.0 + i as f32 * 10.0 + rng.gen_range(-2.5..2.5),
                rng.gen_range(-1.0..1.0),
                -495.0 + j as f32 * 10.0 + rng.gen_range(-2.5..2.5),
            );
            let rotation = Quat::from_axis_angle(&Vec3::y_axis(), rng.gen_range(0.0..PI));
            let mut collider = match rng.gen_range(0..3) {
                0 => Collider::sphere("Ball", rng.gen_range(0.2..1.0)),
                1 => Collider::aabb("Crate", Vec3::repeat(-0.8), Vec3::repeat(0.8)),
                _ => Collider::obb("Plank", Vec3::new(-1.0, -0.3, -0.5), Vec3::new(1.0, 0.3, 0.5)),
            };
            collider.update_from(&Transform::from_position_rotation(position, rotation));

            let hits = Arc::clone(hits);
            collider.set_on_collision(move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
            handles.push(colliders.insert(collider));
        }
    }
    handles
}

#[test]
fn ten_thousand_separated_colliders_yield_no_pairs() {
    logging::init_for_tests();
    for thread_count in [1, 4] {
        let config = CollisionConfig::default().with_thread_count(thread_count);
        let mut manager = CollisionManager::new(config).unwrap();
        let mut colliders = ColliderSet::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let handles = scattered_field(&mut colliders, &hits);

        for &handle in &handles {
            manager.register_collider(&colliders, handle);
        }
        manager.check_collisions(&colliders);

        assert!(!manager.potential_collisions().is_empty());
        assert!(manager.collision_pairs().is_empty(), "{} threads found pairs", thread_count);
        assert!(manager.pending_callbacks().is_empty());

        manager.update(&mut colliders);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn contacts_enter_stay_and_exit_over_frames() {
    let mut manager = manager(2);
    let mut colliders = ColliderSet::new();

    let owner = Arc::new(std::sync::RwLock::new(Transform::from_position(Vec3::new(1.5, 0.0, 0.0))));
    let mut mover = Collider::sphere("Mover", 1.0);
    mover.set_transform(&owner);
    let mover = colliders.insert(mover);
    let post = sphere_at(&mut colliders, "Post", Vec3::zeros(), 1.0);

    let frame = |manager: &mut CollisionManager, colliders: &mut ColliderSet| {
        manager.register_collider(colliders, mover);
        manager.register_collider(colliders, post);
        manager.update(colliders);
    };

    frame(&mut manager, &mut colliders);
    assert_eq!(colliders[mover].entered(), &[post]);
    assert!(colliders[post].is_hit());

    frame(&mut manager, &mut colliders);
    assert_eq!(colliders[mover].stayed(), &[post]);

    // The manager polls the owner's transform at the start of each frame
    owner.write().unwrap().position = Vec3::new(10.0, 0.0, 0.0);
    frame(&mut manager, &mut colliders);
    assert_eq!(colliders[mover].exited(), &[post]);
    assert!(!colliders[post].is_hit());
}

#[test]
fn callbacks_see_other_collider_layer() {
    let mut manager = manager(1);
    let mut colliders = ColliderSet::new();
    let registry = manager.layers_mut();
    let enemy_layer = registry.layer("enemy").unwrap();

    let seen: Arc<Mutex<Vec<CollisionEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let player = sphere_at(&mut colliders, "Player", Vec3::zeros(), 1.0);
    let sink = Arc::clone(&seen);
    colliders[player].set_on_collision(move |event, _| sink.lock().unwrap().push(*event));

    let enemy = sphere_at(&mut colliders, "Enemy", Vec3::new(0.0, 0.0, 1.0), 1.0);
    colliders[enemy].set_layer_bits(enemy_layer);

    manager.register_collider(&colliders, player);
    manager.register_collider(&colliders, enemy);
    manager.update(&mut colliders);

    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].other, enemy);
    assert_eq!(events[0].other_layer, enemy_layer);
    assert!(events[0].info.contact_normal.z > 0.0);
}
