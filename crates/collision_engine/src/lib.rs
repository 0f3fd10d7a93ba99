//! # Collision Engine
//!
//! The collision subsystem of a real-time 3D engine.
//!
//! ## Features
//!
//! - **Colliders**: sphere, axis-aligned box and oriented box volumes that
//!   follow their owner's transform
//! - **Broad Phase**: linear quad tree for dynamic colliders, spiral hash
//!   grid for static colliders
//! - **Narrow Phase**: exact shape tests spread over worker threads
//! - **Callbacks**: run on the calling thread after detection, with deferred
//!   unregistration
//! - **Ray Casting**: single, nearest and all-hits queries filtered by layer
//! - **Debug Drawing**: line-based collider visualisation (`debug-draw` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut manager = CollisionManager::new(CollisionConfig::default())?;
//!     let mut colliders = ColliderSet::new();
//!
//!     let mut ball = Collider::sphere("Ball", 1.0);
//!     ball.update_from(&Transform::from_position(Vec3::new(1.5, 0.0, 0.0)));
//!     let ball = colliders.insert(ball);
//!
//!     let mut crate_box = Collider::aabb("Crate", Vec3::repeat(-1.0), Vec3::repeat(1.0));
//!     crate_box.set_on_collision(|event, _commands| {
//!         assert!(event.info.has_collision);
//!     });
//!     crate_box.update_from(&Transform::identity());
//!     let crate_box = colliders.insert(crate_box);
//!
//!     // Dynamic colliders are registered every frame
//!     manager.register_collider(&colliders, ball);
//!     manager.register_collider(&colliders, crate_box);
//!     manager.update(&mut colliders);
//!
//!     assert!(colliders[crate_box].is_colliding_with(ball));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod physics;
pub mod spatial;
pub mod debug;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::CollisionConfig,
        config::Config,
        debug::CollisionStats,
        foundation::math::{Quat, Transform, Vec2, Vec3, AABB},
        physics::{
            BoundingBox, Collider, ColliderHandle, ColliderInfo, ColliderSet, CollisionCommands,
            CollisionDetector, CollisionError, CollisionEvent, CollisionLayerRegistry, CollisionLayers,
            CollisionManager, Ray, RayCastHit,
        },
        spatial::{QuadTree, SpiralHashGrid},
    };
}
