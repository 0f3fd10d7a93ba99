//! Physics module for collision detection
//!
//! Colliders and their shapes, the narrow-phase detector, collision layers,
//! ray casting, and the [`CollisionManager`] that drives a frame.

pub mod collision;
pub mod collider;
pub mod collision_detector;
pub mod collision_layers;
pub mod collision_manager;
pub mod error;
pub mod ray_cast;

pub use collision::{
    BoundingBox,
    ColliderShape,
    SphereShape,
    AabbShape,
    ObbShape,
    BoundingSphere,
    ColliderInfo,
    Ray,
};
pub use collider::{
    Collider,
    ColliderHandle,
    ColliderSet,
    CollisionCommands,
    CollisionEvent,
    OnCollisionFn,
};
pub use collision_detector::CollisionDetector;
pub use collision_layers::{CollisionLayers, CollisionLayerRegistry};
pub use collision_manager::{CollisionManager, CollisionPhase, CollisionPair, CollisionCallInfo};
pub use error::CollisionError;
pub use ray_cast::RayCastHit;
