//! Spiral hash grid for static colliders
//!
//! An unbounded uniform grid on the XZ ground plane, keyed by integer cell
//! coordinates. Static colliders are inserted once, into the cell containing
//! their centre, and stay until removed. A query walks outward from the
//! query's own cell ring by ring (ring 0 is the cell itself, ring `r` the
//! `8r` cells at Chebyshev distance `r`) and stops after the last ring that
//! can still hold an overlapping collider.

use std::collections::HashMap;

use crate::core::config::HashGridConfig;
use crate::foundation::math::{Vec3, AABB};
use crate::physics::collider::ColliderHandle;
use crate::physics::error::CollisionError;

/// Integer grid coordinate (X, Z)
pub type CellKey = (i32, i32);

/// Offset of the `k`-th cell on ring `r` (`r > 0`, `k < 8r`)
fn ring_offset(r: i32, k: i32) -> CellKey {
    let side = k / (2 * r);
    let off = k % (2 * r);
    match side {
        0 => (-r + off, -r),
        1 => (r, -r + off),
        2 => (r - off, r),
        _ => (-r, r - off),
    }
}

/// Uniform hash grid over static colliders
#[derive(Debug, Clone)]
pub struct SpiralHashGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<ColliderHandle>>,
    locations: HashMap<ColliderHandle, CellKey>,
    /// Largest XZ half extent of any collider added since the last clear
    max_static_extent: f32,
}

impl SpiralHashGrid {
    /// Create an empty grid
    pub fn new(cell_size: f32) -> Result<Self, CollisionError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(CollisionError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
            locations: HashMap::new(),
            max_static_extent: 0.0,
        })
    }

    /// Create an empty grid from configuration
    pub fn from_config(config: &HashGridConfig) -> Result<Self, CollisionError> {
        Self::new(config.cell_size)
    }

    /// Cell containing a world-space point
    pub fn cell_key(&self, point: Vec3) -> CellKey {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.z / self.cell_size).floor() as i32,
        )
    }

    /// Insert a static collider; re-adding a collider moves it
    pub fn add_collider(&mut self, handle: ColliderHandle, bounds: &AABB) {
        self.remove_collider(handle);

        let key = self.cell_key(bounds.center());
        self.cells.entry(key).or_default().push(handle);
        self.locations.insert(handle, key);

        let extents = bounds.extents();
        self.max_static_extent = self.max_static_extent.max(extents.x).max(extents.z);
    }

    /// Remove a static collider; returns whether it was present
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        let Some(key) = self.locations.remove(&handle) else {
            return false;
        };
        if let Some(cell) = self.cells.get_mut(&key) {
            if let Some(position) = cell.iter().position(|&h| h == handle) {
                cell.swap_remove(position);
            }
            if cell.is_empty() {
                self.cells.remove(&key);
            }
        }
        true
    }

    /// Static colliders that may overlap `bounds`
    ///
    /// Returns every collider whose cell lies within the influence radius of
    /// the query cell. The result is a superset of the colliders that
    /// actually overlap; `exclude` is never returned.
    pub fn check_collision(&self, bounds: &AABB, exclude: Option<ColliderHandle>) -> Vec<ColliderHandle> {
        let mut found = Vec::new();
        self.check_collision_into(bounds, exclude, &mut found);
        found
    }

    /// Like [`SpiralHashGrid::check_collision`], appending to `found`
    pub fn check_collision_into(
        &self,
        bounds: &AABB,
        exclude: Option<ColliderHandle>,
        found: &mut Vec<ColliderHandle>,
    ) {
        if self.cells.is_empty() {
            return;
        }

        let (cx, cz) = self.cell_key(bounds.center());
        let extents = bounds.extents();
        let reach = extents.x.max(extents.z) + self.max_static_extent;
        // Saturates for unbounded extents; NaN collapses to the own cell
        let rings = (reach / self.cell_size).ceil().max(0.0) as u64;

        let mut collect = |key: CellKey| {
            if let Some(cell) = self.cells.get(&key) {
                found.extend(cell.iter().copied().filter(|&h| Some(h) != exclude));
            }
        };

        // Walking more cells than are occupied: scan the occupied ones instead
        let side = rings.saturating_mul(2).saturating_add(1);
        if side.saturating_mul(side) > self.cells.len() as u64 {
            for &(x, z) in self.cells.keys() {
                if u64::from(x.abs_diff(cx)) <= rings && u64::from(z.abs_diff(cz)) <= rings {
                    collect((x, z));
                }
            }
            return;
        }

        // Bounded by the occupied cell count here
        let rings = rings as i32;
        collect((cx, cz));
        for r in 1..=rings {
            for k in 0..8 * r {
                let (dx, dz) = ring_offset(r, k);
                if let (Some(x), Some(z)) = (cx.checked_add(dx), cz.checked_add(dz)) {
                    collect((x, z));
                }
            }
        }
    }

    /// Remove every collider
    pub fn clear(&mut self) {
        self.cells.clear();
        self.locations.clear();
        self.max_static_extent = 0.0;
    }

    /// Whether a collider is in the grid
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.locations.contains_key(&handle)
    }

    /// Every stored collider
    pub fn handles(&self) -> impl Iterator<Item = ColliderHandle> + '_ {
        self.locations.keys().copied()
    }

    /// Number of stored colliders
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell edge length
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }
}
