//! Headless Collision Demo
//!
//! Runs the collision engine without a window:
//! - Ships drift across the quad-tree field and bounce off its edges
//! - Static asteroids (oriented boxes) sit in the spiral hash grid
//! - Static pickups unregister themselves when a ship touches them
//! - Ships bounce off asteroids using the contact normal of each new contact
//!
//! Usage: `collision_demo [config.toml|config.ron] [frames]`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use collision_engine::foundation::logging;
use collision_engine::foundation::math::constants::PI;
use collision_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Entity counts
const NUM_SHIPS: usize = 300;
const NUM_ASTEROIDS: usize = 80;
const NUM_PICKUPS: usize = 60;

// Movement
const SHIP_SPEED: f32 = 12.0;
const SHIP_RADIUS: f32 = 1.5;
const FRAME_TIME: f32 = 1.0 / 60.0;

const DEFAULT_FRAMES: u32 = 600;
const STATS_INTERVAL: u32 = 120;

struct Ship {
    handle: ColliderHandle,
    transform: Arc<RwLock<Transform>>,
    velocity: Vec3,
}

struct Layers {
    ship: u32,
    asteroid: u32,
    pickup: u32,
}

fn random_point(rng: &mut StdRng, min: Vec2, size: Vec2, margin: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(min.x + margin..min.x + size.x - margin),
        0.0,
        rng.gen_range(min.y + margin..min.y + size.y - margin),
    )
}

fn spawn_ships(
    rng: &mut StdRng,
    manager: &mut CollisionManager,
    colliders: &mut ColliderSet,
    min: Vec2,
    size: Vec2,
) -> Result<Vec<Ship>, CollisionError> {
    let mut ships = Vec::with_capacity(NUM_SHIPS);
    for i in 0..NUM_SHIPS {
        let transform = Arc::new(RwLock::new(Transform::from_position(random_point(rng, min, size, 5.0))));
        let heading = rng.gen_range(0.0..2.0 * PI);

        let mut collider = Collider::sphere(format!("Ship {i}"), SHIP_RADIUS);
        collider.set_attribute("ship", manager.layers_mut())?;
        collider.set_transform(&transform);

        ships.push(Ship {
            handle: colliders.insert(collider),
            transform,
            velocity: Vec3::new(heading.cos(), 0.0, heading.sin()) * SHIP_SPEED,
        });
    }
    Ok(ships)
}

fn spawn_asteroids(
    rng: &mut StdRng,
    manager: &mut CollisionManager,
    colliders: &mut ColliderSet,
    min: Vec2,
    size: Vec2,
) -> Result<(), CollisionError> {
    for i in 0..NUM_ASTEROIDS {
        let half = Vec3::new(rng.gen_range(1.0..6.0), 2.0, rng.gen_range(1.0..6.0));
        let yaw = Quat::from_axis_angle(&Vec3::y_axis(), rng.gen_range(0.0..PI));
        let transform = Transform::from_position_rotation(random_point(rng, min, size, 10.0), yaw);

        let mut collider = Collider::obb(format!("Asteroid {i}"), -half, half);
        collider.set_attribute("asteroid", manager.layers_mut())?;
        // Asteroids never react to each other
        collider.set_mask("asteroid", manager.layers_mut())?;
        collider.update_from(&transform);

        let handle = colliders.insert(collider);
        manager.register_static_collider(colliders, handle);
    }
    Ok(())
}

fn spawn_pickups(
    rng: &mut StdRng,
    manager: &mut CollisionManager,
    colliders: &mut ColliderSet,
    min: Vec2,
    size: Vec2,
    layers: &Layers,
    collected: &Arc<Mutex<Vec<ColliderHandle>>>,
) -> Result<(), CollisionError> {
    for i in 0..NUM_PICKUPS {
        let mut collider = Collider::aabb(format!("Pickup {i}"), Vec3::repeat(-0.75), Vec3::repeat(0.75));
        collider.set_attribute("pickup", manager.layers_mut())?;
        collider.set_masks(&["asteroid", "pickup"], manager.layers_mut())?;
        collider.update_from(&Transform::from_position(random_point(rng, min, size, 5.0)));

        let ship_layer = layers.ship;
        let collected = Arc::clone(collected);
        collider.set_on_collision(move |event, commands| {
            if event.other_layer & ship_layer == 0 {
                return;
            }
            commands.unregister(event.caller);
            if let Ok(mut collected) = collected.lock() {
                if !collected.contains(&event.caller) {
                    collected.push(event.caller);
                }
            }
        });

        let handle = colliders.insert(collider);
        manager.register_static_collider(colliders, handle);
    }
    Ok(())
}

/// Advance ships and keep them inside the field
fn move_ships(ships: &mut [Ship], min: Vec2, size: Vec2) {
    let max = min + size;
    for ship in ships {
        let Ok(mut transform) = ship.transform.write() else {
            continue;
        };
        transform.position += ship.velocity * FRAME_TIME;

        let position = &mut transform.position;
        if position.x - SHIP_RADIUS < min.x || position.x + SHIP_RADIUS > max.x {
            ship.velocity.x = -ship.velocity.x;
            position.x = position.x.clamp(min.x + SHIP_RADIUS, max.x - SHIP_RADIUS);
        }
        if position.z - SHIP_RADIUS < min.y || position.z + SHIP_RADIUS > max.y {
            ship.velocity.z = -ship.velocity.z;
            position.z = position.z.clamp(min.y + SHIP_RADIUS, max.y - SHIP_RADIUS);
        }
    }
}

/// Reflect ships off asteroids they started touching this frame
fn bounce_ships(ships: &mut [Ship], colliders: &ColliderSet, asteroid_layer: u32) -> usize {
    let mut bounces = 0;
    for ship in ships {
        let collider = &colliders[ship.handle];
        for other in collider.entered() {
            let is_asteroid = colliders.get(*other).is_some_and(|c| c.layer() & asteroid_layer != 0);
            let Some(info) = collider.contacts().get(other) else {
                continue;
            };
            let normal = info.contact_normal;
            let approach = ship.velocity.dot(&normal);
            if is_asteroid && approach > 0.0 {
                ship.velocity -= normal * (2.0 * approach);
                bounces += 1;
            }
        }
    }
    bounces
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "collision_demo.toml".to_string());
    let frames = args.next().map(|arg| arg.parse::<u32>()).transpose()?.unwrap_or(DEFAULT_FRAMES);

    let config = CollisionConfig::load_or_default(&config_path)?;
    let field_min = config.quad_tree.left_bottom();
    let field_size = config.quad_tree.field_size();
    let mut manager = CollisionManager::new(config)?;

    let layers = Layers {
        ship: manager.layers_mut().layer("ship")?,
        asteroid: manager.layers_mut().layer("asteroid")?,
        pickup: manager.layers_mut().layer("pickup")?,
    };
    log::info!(
        "Layers: ship {:#b}, asteroid {:#b}, pickup {:#b}",
        layers.ship,
        layers.asteroid,
        layers.pickup
    );

    let mut rng = StdRng::seed_from_u64(0xC011_1DE5);
    let mut colliders = ColliderSet::new();
    let collected = Arc::new(Mutex::new(Vec::new()));

    let mut ships = spawn_ships(&mut rng, &mut manager, &mut colliders, field_min, field_size)?;
    spawn_asteroids(&mut rng, &mut manager, &mut colliders, field_min, field_size)?;
    spawn_pickups(&mut rng, &mut manager, &mut colliders, field_min, field_size, &layers, &collected)?;

    let contacts = Arc::new(AtomicUsize::new(0));
    for ship in &ships {
        let contacts = Arc::clone(&contacts);
        colliders[ship.handle].set_on_collision(move |_, _| {
            contacts.fetch_add(1, Ordering::Relaxed);
        });
    }

    log::info!(
        "Spawned {} ships, {} asteroids, {} pickups; running {} frames",
        NUM_SHIPS,
        NUM_ASTEROIDS,
        NUM_PICKUPS,
        frames
    );

    let mut total_bounces = 0;
    let mut despawned = 0;
    for frame in 1..=frames {
        move_ships(&mut ships, field_min, field_size);

        for ship in &ships {
            manager.register_collider(&colliders, ship.handle);
        }
        manager.update(&mut colliders);

        total_bounces += bounce_ships(&mut ships, &colliders, layers.asteroid);

        // Pickups unregistered last frame are gone from the manager; free them
        if let Ok(mut collected) = collected.lock() {
            collected.retain(|&handle| {
                if manager.pending_unregistrations().contains(&handle) {
                    return true;
                }
                colliders.remove(handle);
                despawned += 1;
                false
            });
        }

        if manager.debug_draw_enabled() {
            log::debug!("Frame {}: {} debug lines", frame, manager.take_debug_lines().len());
        }
        if frame % STATS_INTERVAL == 0 {
            log::info!("Frame {}\n{}", frame, manager.stats());
        }
    }

    let probe = Ray::infinite(Vec3::new(field_min.x, 0.0, field_min.y), Vec3::new(1.0, 0.0, 1.0));
    match colliders.ray_cast_first(&probe, layers.asteroid) {
        Some(hit) => log::info!(
            "Diagonal probe hits '{}' at distance {:.2}",
            colliders[hit.collider].name(),
            hit.distance
        ),
        None => log::info!("Diagonal probe hits no asteroid"),
    }

    log::info!(
        "Done: {} ship contacts, {} asteroid bounces, {} of {} pickups collected",
        contacts.load(Ordering::Relaxed),
        total_bounces,
        despawned,
        NUM_PICKUPS
    );
    Ok(())
}
