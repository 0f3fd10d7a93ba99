//! Collision shapes and geometric primitives
//!
//! # Architecture
//!
//! This module follows Game Engine Architecture 3rd Edition (GEA 13.3.4):
//! - **Model Space Storage**: Shape parameters stored relative to the owner
//! - **Cached World Data**: World-space shape refreshed once per frame from the owner's transform
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, bounding spheres and the box slab test
//! - [`shape`] - Sphere, AABB and OBB collider shapes
//! - [`contact`] - Narrow-phase contact result

pub mod primitives;
pub mod shape;
pub mod contact;

// Re-export commonly used types
pub use primitives::{Ray, BoundingSphere};
pub use shape::{BoundingBox, ColliderShape, SphereShape, AabbShape, ObbShape};
pub use contact::ColliderInfo;
