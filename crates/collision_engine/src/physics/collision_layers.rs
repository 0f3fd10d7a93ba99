//! Collision layer system for filtering collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."
//!
//! A collider's *layer* is what it is; its *mask* is the set of layers it
//! ignores. Layer bits are handed out by name through
//! [`CollisionLayerRegistry`], which is an explicitly owned object rather
//! than a process-wide singleton.

use std::collections::HashMap;

use crate::core::config::CollisionLayerConfig;
use crate::physics::error::CollisionError;

/// Bit constants and the pair filter
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Maximum number of named layers (one bit each)
    pub const MAX_LAYERS: usize = 32;

    /// Check whether a pair is exempt from detection
    ///
    /// Either side's mask vetoes the pair. The result is symmetric: swapping
    /// A and B never changes it.
    ///
    /// # Example
    /// ```
    /// use collision_engine::physics::CollisionLayers;
    ///
    /// let player = 1 << 0;
    /// let bullet = 1 << 1;
    ///
    /// // Bullets ignore other bullets
    /// assert!(CollisionLayers::is_exempt(bullet, bullet, bullet, bullet));
    /// // ...but still hit the player
    /// assert!(!CollisionLayers::is_exempt(bullet, bullet, player, CollisionLayers::NONE));
    /// ```
    pub const fn is_exempt(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        (layer_a & mask_b) != 0 || (layer_b & mask_a) != 0
    }

    /// Helper to combine several layer bits into one mask
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}

/// Normalise a layer name: first letter upper case, the rest lower case
pub fn normalize_layer_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Name to bit mapping for collision layers
///
/// Bits are allocated in first-use order. Names are normalised, so
/// `"enemy"`, `"Enemy"` and `"ENEMY"` share one bit.
#[derive(Debug, Clone, Default)]
pub struct CollisionLayerRegistry {
    layers: HashMap<String, u32>,
    names: Vec<String>,
}

impl CollisionLayerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the configured names preassigned in order
    pub fn from_config(config: &CollisionLayerConfig) -> Result<Self, CollisionError> {
        let mut registry = Self::new();
        for name in &config.names {
            registry.layer(name)?;
        }
        Ok(registry)
    }

    /// Snapshot the registered names so they can be saved
    pub fn to_config(&self) -> CollisionLayerConfig {
        CollisionLayerConfig {
            names: self.names.clone(),
        }
    }

    /// Get the bit for a layer, registering it on first use
    pub fn layer(&mut self, name: &str) -> Result<u32, CollisionError> {
        let key = normalize_layer_name(name);
        if let Some(&bit) = self.layers.get(&key) {
            return Ok(bit);
        }

        if self.names.len() >= CollisionLayers::MAX_LAYERS {
            return Err(CollisionError::TooManyLayers(key));
        }

        let bit = 1u32 << self.names.len();
        log::debug!("Registered collision layer '{}' as bit {:#010x}", key, bit);
        self.layers.insert(key.clone(), bit);
        self.names.push(key);
        Ok(bit)
    }

    /// Combine several named layers into one mask, registering as needed
    pub fn mask<S: AsRef<str>>(&mut self, names: &[S]) -> Result<u32, CollisionError> {
        names
            .iter()
            .try_fold(CollisionLayers::NONE, |acc, name| Ok(acc | self.layer(name.as_ref())?))
    }

    /// Look up a layer without registering it
    pub fn get(&self, name: &str) -> Option<u32> {
        self.layers.get(&normalize_layer_name(name)).copied()
    }

    /// Name of a single-bit layer
    pub fn name_of(&self, bit: u32) -> Option<&str> {
        if !bit.is_power_of_two() {
            return None;
        }
        self.names.get(bit.trailing_zeros() as usize).map(String::as_str)
    }

    /// Registered names in bit order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of registered layers
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no layer has been registered yet
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
