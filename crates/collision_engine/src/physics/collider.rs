//! Colliders and the arena that owns them
//!
//! A [`Collider`] is a single collidable volume attached to a gameplay
//! object. Gameplay code owns every collider through a [`ColliderSet`] and
//! hands [`ColliderHandle`]s to the collision manager, which never owns or
//! frees colliders. A handle whose collider was removed from the set is
//! simply skipped.
//!
//! # Usage
//!
//! ```
//! use std::sync::{Arc, RwLock};
//! use collision_engine::foundation::math::{Transform, Vec3};
//! use collision_engine::physics::{BoundingBox, Collider, ColliderSet};
//!
//! let owner = Arc::new(RwLock::new(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))));
//!
//! let mut collider = Collider::new("Player");
//! collider.set_bounding_box(BoundingBox::Sphere);
//! collider.set_sphere(0.5);
//! collider.set_transform(&owner);
//!
//! let mut colliders = ColliderSet::new();
//! let handle = colliders.insert(collider);
//! assert_eq!(colliders[handle].center(), Some(Vec3::new(1.0, 0.0, 0.0)));
//! ```

use std::collections::HashMap;
use std::ops::{Index, IndexMut};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use slotmap::SlotMap;

use crate::foundation::math::{Transform, Vec3, AABB};
use crate::physics::collision::{
    AabbShape, BoundingBox, ColliderInfo, ColliderShape, ObbShape, SphereShape,
};
use crate::physics::collision_layers::{CollisionLayerRegistry, CollisionLayers};
use crate::physics::error::CollisionError;

slotmap::new_key_type! {
    /// Stable, generation-checked reference to a collider in a [`ColliderSet`]
    pub struct ColliderHandle;
}

/// One side of a detected contact, delivered to a collision callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The collider receiving the callback
    pub caller: ColliderHandle,
    /// The collider it touched
    pub other: ColliderHandle,
    /// Layer bits of the other collider
    pub other_layer: u32,
    /// Contact info; the normal points from `caller` toward `other`
    pub info: ColliderInfo,
}

/// Requests a collision callback can make of the manager
///
/// Callbacks run while the manager is dispatching, so any change to the
/// registries is recorded here and applied as a deferred operation.
#[derive(Debug, Default)]
pub struct CollisionCommands {
    unregister: Vec<ColliderHandle>,
    refresh_static: Vec<ColliderHandle>,
}

impl CollisionCommands {
    /// Create an empty command buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the manager to unregister a collider
    pub fn unregister(&mut self, handle: ColliderHandle) {
        if !self.unregister.contains(&handle) {
            self.unregister.push(handle);
        }
    }

    /// Ask the manager to re-insert a static collider that moved
    pub fn refresh_static(&mut self, handle: ColliderHandle) {
        if !self.refresh_static.contains(&handle) {
            self.refresh_static.push(handle);
        }
    }

    /// Whether no command was recorded
    pub fn is_empty(&self) -> bool {
        self.unregister.is_empty() && self.refresh_static.is_empty()
    }

    pub(crate) fn drain_unregistrations(&mut self) -> std::vec::Drain<'_, ColliderHandle> {
        self.unregister.drain(..)
    }

    pub(crate) fn drain_refreshes(&mut self) -> std::vec::Drain<'_, ColliderHandle> {
        self.refresh_static.drain(..)
    }
}

/// User collision callback
pub type OnCollisionFn = Box<dyn FnMut(&CollisionEvent, &mut CollisionCommands) + Send + Sync>;

/// A collidable volume
///
/// Configure the variant with [`Collider::set_bounding_box`] first, then set
/// its parameters with the matching shape setter. Calling a setter for a
/// different variant is a programming error.
pub struct Collider {
    name: String,
    bounding_box: BoundingBox,
    shape: Option<ColliderShape>,
    layer: u32,
    mask: u32,
    transform: Option<Weak<RwLock<Transform>>>,
    on_collision: Option<OnCollisionFn>,
    is_hit: bool,
    current_collisions: HashMap<ColliderHandle, ColliderInfo>,
    previous_collisions: HashMap<ColliderHandle, ColliderInfo>,
    entered: Vec<ColliderHandle>,
    stayed: Vec<ColliderHandle>,
    exited: Vec<ColliderHandle>,
}

impl std::fmt::Debug for Collider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collider")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("layer", &format_args!("{:#010x}", self.layer))
            .field("mask", &format_args!("{:#010x}", self.mask))
            .field("is_hit", &self.is_hit)
            .field("contacts", &self.previous_collisions.len())
            .finish_non_exhaustive()
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::new("")
    }
}

impl Collider {
    /// Create an unconfigured collider on every layer with an empty mask
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounding_box: BoundingBox::None,
            shape: None,
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::NONE,
            transform: None,
            on_collision: None,
            is_hit: false,
            current_collisions: HashMap::new(),
            previous_collisions: HashMap::new(),
            entered: Vec::new(),
            stayed: Vec::new(),
            exited: Vec::new(),
        }
    }

    /// Sphere collider centred on the owner
    pub fn sphere(name: impl Into<String>, radius: f32) -> Self {
        let mut collider = Self::new(name);
        collider.set_bounding_box(BoundingBox::Sphere);
        collider.set_sphere(radius);
        collider
    }

    /// Axis-aligned box collider
    pub fn aabb(name: impl Into<String>, min: Vec3, max: Vec3) -> Self {
        let mut collider = Self::new(name);
        collider.set_bounding_box(BoundingBox::Aabb);
        collider.set_aabb(min, max);
        collider
    }

    /// Oriented box collider
    pub fn obb(name: impl Into<String>, min: Vec3, max: Vec3) -> Self {
        let mut collider = Self::new(name);
        collider.set_bounding_box(BoundingBox::Obb);
        collider.set_obb(min, max);
        collider
    }

    // ---------------------------------------------------------------
    // Shape configuration
    // ---------------------------------------------------------------

    /// Select the shape variant; resets the shape to a zero-sized one
    pub fn set_bounding_box(&mut self, bounding_box: BoundingBox) {
        self.bounding_box = bounding_box;
        self.shape = match bounding_box {
            BoundingBox::None => None,
            BoundingBox::Sphere => Some(ColliderShape::Sphere(SphereShape::new(0.0))),
            BoundingBox::Aabb => Some(ColliderShape::Aabb(AabbShape::new(Vec3::zeros(), Vec3::zeros()))),
            BoundingBox::Obb => Some(ColliderShape::Obb(ObbShape::new(Vec3::zeros(), Vec3::zeros()))),
        };
    }

    /// Set the sphere radius
    pub fn set_sphere(&mut self, radius: f32) {
        match self.shape.as_mut() {
            Some(ColliderShape::Sphere(sphere)) => sphere.radius = radius,
            _ => return self.shape_mismatch("set_sphere"),
        }
        self.refresh_shape();
    }

    /// Set the axis-aligned box corners (model space)
    pub fn set_aabb(&mut self, min: Vec3, max: Vec3) {
        match self.shape.as_mut() {
            Some(ColliderShape::Aabb(aabb)) => {
                aabb.min = min;
                aabb.max = max;
            }
            _ => return self.shape_mismatch("set_aabb"),
        }
        self.refresh_shape();
    }

    /// Set the oriented box corners (model space)
    pub fn set_obb(&mut self, min: Vec3, max: Vec3) {
        match self.shape.as_mut() {
            Some(ColliderShape::Obb(obb)) => {
                obb.min = min;
                obb.max = max;
            }
            _ => return self.shape_mismatch("set_obb"),
        }
        self.refresh_shape();
    }

    /// Offset the shape from the owner's origin (model space)
    pub fn set_reference_point(&mut self, reference_point: Vec3) {
        match self.shape.as_mut() {
            Some(shape) => shape.set_reference_point(reference_point),
            None => return self.shape_mismatch("set_reference_point"),
        }
        self.refresh_shape();
    }

    fn shape_mismatch(&self, setter: &str) {
        debug_assert!(
            false,
            "{setter} does not match bounding box {:?} of collider '{}'",
            self.bounding_box, self.name
        );
        log::error!(
            "{} does not match bounding box {:?} of collider '{}'",
            setter, self.bounding_box, self.name
        );
    }

    fn refresh_shape(&mut self) {
        if self.transform.is_some() {
            self.update();
        } else if let Some(shape) = self.shape.as_mut() {
            shape.update(&Transform::identity());
        }
    }

    // ---------------------------------------------------------------
    // Layers
    // ---------------------------------------------------------------

    /// Set this collider's layer by name
    ///
    /// The first attribute set also becomes the collider's name if it has none.
    pub fn set_attribute(&mut self, name: &str, registry: &mut CollisionLayerRegistry) -> Result<(), CollisionError> {
        self.layer = registry.layer(name)?;
        if self.name.is_empty() {
            self.name = crate::physics::collision_layers::normalize_layer_name(name);
        }
        Ok(())
    }

    /// Ignore a single named layer
    pub fn set_mask(&mut self, name: &str, registry: &mut CollisionLayerRegistry) -> Result<(), CollisionError> {
        self.mask = registry.layer(name)?;
        Ok(())
    }

    /// Ignore every named layer
    pub fn set_masks<S: AsRef<str>>(&mut self, names: &[S], registry: &mut CollisionLayerRegistry) -> Result<(), CollisionError> {
        self.mask = registry.mask(names)?;
        Ok(())
    }

    /// Set raw layer bits
    pub fn set_layer_bits(&mut self, layer: u32) {
        self.layer = layer;
    }

    /// Set raw mask bits
    pub fn set_mask_bits(&mut self, mask: u32) {
        self.mask = mask;
    }

    /// Builder form of [`Collider::set_layer_bits`] and [`Collider::set_mask_bits`]
    pub fn with_layers(mut self, layer: u32, mask: u32) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    // ---------------------------------------------------------------
    // Owner link and callback
    // ---------------------------------------------------------------

    /// Follow an owner's world transform
    ///
    /// Only a weak reference is kept; once the owner drops its transform the
    /// collider keeps its last world shape.
    pub fn set_transform(&mut self, transform: &Arc<RwLock<Transform>>) {
        self.transform = Some(Arc::downgrade(transform));
        self.update();
    }

    /// Install the collision callback
    pub fn set_on_collision<F>(&mut self, callback: F)
    where
        F: FnMut(&CollisionEvent, &mut CollisionCommands) + Send + Sync + 'static,
    {
        self.on_collision = Some(Box::new(callback));
    }

    /// Builder form of [`Collider::set_on_collision`]
    pub fn with_on_collision<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&CollisionEvent, &mut CollisionCommands) + Send + Sync + 'static,
    {
        self.set_on_collision(callback);
        self
    }

    /// Refresh the world-space shape from the owner's transform
    pub fn update(&mut self) {
        let Some(owner) = self.transform.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let transform = owner.read().unwrap_or_else(|poisoned| {
            log::warn!("Transform of collider '{}' was poisoned; using last written value", self.name);
            PoisonError::into_inner(poisoned)
        });
        if let Some(shape) = self.shape.as_mut() {
            shape.update(&transform);
        }
    }

    /// Refresh the world-space shape from an explicit transform
    pub fn update_from(&mut self, transform: &Transform) {
        if let Some(shape) = self.shape.as_mut() {
            shape.update(transform);
        }
    }

    // ---------------------------------------------------------------
    // Collision bookkeeping
    // ---------------------------------------------------------------

    /// Record that `other` overlaps this collider in the current frame
    pub fn add_current_collision(&mut self, other: ColliderHandle, info: ColliderInfo) {
        self.current_collisions.insert(other, info);
    }

    /// Deliver one contact: sets the hit flag and runs the user callback
    pub fn on_collision(&mut self, event: &CollisionEvent, commands: &mut CollisionCommands) {
        self.is_hit = true;
        if let Some(callback) = self.on_collision.as_mut() {
            callback(event, commands);
        }
    }

    /// Close the frame: derive entered/stayed/exited from this frame's and
    /// last frame's contacts
    ///
    /// Afterwards [`Collider::contacts`] holds this frame's contacts and the
    /// hit flag reflects whether there were any.
    pub fn update_collision_state(&mut self) {
        self.entered.clear();
        self.stayed.clear();
        self.exited.clear();

        for other in self.current_collisions.keys() {
            if self.previous_collisions.contains_key(other) {
                self.stayed.push(*other);
            } else {
                self.entered.push(*other);
            }
        }
        self.exited.extend(
            self.previous_collisions
                .keys()
                .filter(|other| !self.current_collisions.contains_key(*other)),
        );

        self.previous_collisions = std::mem::take(&mut self.current_collisions);
        self.is_hit = !self.previous_collisions.is_empty();
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the collider
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Configured variant
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Configured shape, if any
    pub fn shape(&self) -> Option<&ColliderShape> {
        self.shape.as_ref()
    }

    /// Layer bits (what this collider is)
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Mask bits (layers this collider ignores)
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// World-space bounds of the configured shape
    pub fn bounds(&self) -> Option<AABB> {
        self.shape.as_ref().map(ColliderShape::bounds)
    }

    /// World-space centre of the configured shape
    pub fn center(&self) -> Option<Vec3> {
        self.shape.as_ref().map(ColliderShape::center)
    }

    /// Whether a world-space point is inside the shape
    pub fn contains(&self, point: Vec3) -> bool {
        self.shape.as_ref().is_some_and(|shape| shape.contains(point))
    }

    /// Closest point on the shape to a world-space point
    pub fn closest_point(&self, point: Vec3) -> Option<Vec3> {
        self.shape.as_ref().map(|shape| shape.closest_point(point))
    }

    /// Whether this collider was hit in the latest frame
    pub fn is_hit(&self) -> bool {
        self.is_hit
    }

    /// Contacts of the latest completed frame
    pub fn contacts(&self) -> &HashMap<ColliderHandle, ColliderInfo> {
        &self.previous_collisions
    }

    /// Whether `other` touched this collider in the latest completed frame
    pub fn is_colliding_with(&self, other: ColliderHandle) -> bool {
        self.previous_collisions.contains_key(&other)
    }

    /// Colliders that started touching in the latest frame
    pub fn entered(&self) -> &[ColliderHandle] {
        &self.entered
    }

    /// Colliders that kept touching in the latest frame
    pub fn stayed(&self) -> &[ColliderHandle] {
        &self.stayed
    }

    /// Colliders that stopped touching in the latest frame
    pub fn exited(&self) -> &[ColliderHandle] {
        &self.exited
    }
}

/// Arena of colliders owned by gameplay code
#[derive(Debug, Default)]
pub struct ColliderSet {
    colliders: SlotMap<ColliderHandle, Collider>,
}

impl ColliderSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a collider
    pub fn insert(&mut self, collider: Collider) -> ColliderHandle {
        self.colliders.insert(collider)
    }

    /// Destroy a collider; its handle becomes stale
    pub fn remove(&mut self, handle: ColliderHandle) -> Option<Collider> {
        self.colliders.remove(handle)
    }

    /// Look up a collider
    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// Look up a collider mutably
    pub fn get_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(handle)
    }

    /// Whether the handle is live
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains_key(handle)
    }

    /// Number of live colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Iterate over live colliders
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.colliders.iter()
    }

    /// Iterate mutably over live colliders
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ColliderHandle, &mut Collider)> {
        self.colliders.iter_mut()
    }
}

impl Index<ColliderHandle> for ColliderSet {
    type Output = Collider;

    fn index(&self, handle: ColliderHandle) -> &Collider {
        &self.colliders[handle]
    }
}

impl IndexMut<ColliderHandle> for ColliderSet {
    fn index_mut(&mut self, handle: ColliderHandle) -> &mut Collider {
        &mut self.colliders[handle]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_collider_follows_owner_transform() {
        let owner = Arc::new(RwLock::new(Transform::identity()));
        let mut collider = Collider::sphere("Ball", 1.0);
        collider.set_transform(&owner);

        owner.write().unwrap().position = Vec3::new(3.0, 0.0, 0.0);
        collider.update();
        assert_relative_eq!(collider.center().unwrap(), Vec3::new(3.0, 0.0, 0.0));

        // Once the owner is gone the last world shape is kept
        drop(owner);
        collider.update();
        assert_relative_eq!(collider.center().unwrap(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_reference_point_is_offset_from_owner() {
        let mut collider = Collider::aabb("Crate", Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        collider.set_reference_point(Vec3::new(0.0, 1.0, 0.0));
        collider.update_from(&Transform::from_position(Vec3::new(0.0, 0.0, 5.0)));

        let bounds = collider.bounds().unwrap();
        assert_relative_eq!(bounds.min, Vec3::new(-1.0, 0.0, 4.0));
        assert_relative_eq!(bounds.max, Vec3::new(1.0, 2.0, 6.0));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "does not match bounding box"))]
    fn test_mismatched_shape_setter_asserts() {
        let mut collider = Collider::new("Wrong");
        collider.set_bounding_box(BoundingBox::Sphere);
        collider.set_aabb(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        // Release builds keep the sphere untouched
        assert_eq!(collider.bounding_box(), BoundingBox::Sphere);
    }

    #[test]
    fn test_attribute_names_collider_and_sets_layer() {
        let mut registry = CollisionLayerRegistry::new();
        let mut collider = Collider::sphere("", 1.0);
        collider.set_attribute("player", &mut registry).unwrap();
        collider.set_masks(&["Pickup", "Player"], &mut registry).unwrap();

        assert_eq!(collider.name(), "Player");
        assert_eq!(collider.layer(), 0b01);
        assert_eq!(collider.mask(), 0b11);
    }

    #[test]
    fn test_collision_state_tracks_enter_stay_exit() {
        let mut colliders = ColliderSet::new();
        let a = colliders.insert(Collider::sphere("A", 1.0));
        let b = colliders.insert(Collider::sphere("B", 1.0));
        let c = colliders.insert(Collider::sphere("C", 1.0));

        let collider = &mut colliders[a];
        collider.add_current_collision(b, ColliderInfo::default());
        collider.update_collision_state();
        assert_eq!(collider.entered(), &[b]);
        assert!(collider.is_hit());

        collider.add_current_collision(b, ColliderInfo::default());
        collider.add_current_collision(c, ColliderInfo::default());
        collider.update_collision_state();
        assert_eq!(collider.entered(), &[c]);
        assert_eq!(collider.stayed(), &[b]);

        collider.update_collision_state();
        assert_eq!(collider.exited().len(), 2);
        assert!(!collider.is_hit());
        assert!(collider.contacts().is_empty());
    }

    #[test]
    fn test_on_collision_runs_callback_and_records_commands() {
        let mut colliders = ColliderSet::new();
        let a = colliders.insert(Collider::sphere("A", 1.0));
        let b = colliders.insert(Collider::sphere("B", 1.0));

        colliders[a].set_on_collision(|event, commands| commands.unregister(event.caller));

        let event = CollisionEvent {
            caller: a,
            other: b,
            other_layer: CollisionLayers::ALL,
            info: ColliderInfo::default(),
        };
        let mut commands = CollisionCommands::new();
        colliders[a].on_collision(&event, &mut commands);
        colliders[a].on_collision(&event, &mut commands);

        assert!(colliders[a].is_hit());
        assert_eq!(commands.drain_unregistrations().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut colliders = ColliderSet::new();
        let handle = colliders.insert(Collider::sphere("Gone", 1.0));
        colliders.remove(handle);
        assert!(colliders.get(handle).is_none());
        assert!(!colliders.contains(handle));
    }
}
