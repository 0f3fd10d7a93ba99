//! Linear quad-tree over the XZ ground plane
//!
//! Broad phase for dynamic colliders. The field is subdivided `level` times
//! into a regular grid; every node at every level lives in one flat array
//! indexed by `(4^L - 1) / 3 + morton`, where `morton` interleaves the node's
//! X and Z cell coordinates. A collider is stored in the deepest node that
//! fully contains its ground footprint, found by XOR-ing the Morton codes of
//! its two footprint corners.
//!
//! Node geometry never changes after construction. Only occupancy is rebuilt
//! each frame: [`QuadTree::reset`] empties every node, then colliders are
//! registered again.

use crate::core::config::{QuadTreeConfig, MAX_QUAD_TREE_LEVEL};
use crate::foundation::math::{Vec2, AABB};
use crate::physics::collider::ColliderHandle;
use crate::physics::error::CollisionError;

/// Index of a node in the linear cell array (0 is the root)
pub type NodeIndex = usize;

/// Number of nodes in a complete quad-tree with `level` subdivisions
pub const fn cell_count(level: u32) -> usize {
    (4usize.pow(level + 1) - 1) / 3
}

/// Index of the first node at `level`
const fn level_offset(level: u32) -> usize {
    (4usize.pow(level) - 1) / 3
}

/// Interleave the low `level` bits of `x` (even bits) and `y` (odd bits)
fn morton_encode(x: u32, y: u32, level: u32) -> u32 {
    (0..level).fold(0, |code, bit| {
        code | ((x >> bit) & 1) << (2 * bit) | ((y >> bit) & 1) << (2 * bit + 1)
    })
}

/// Inverse of [`morton_encode`]
fn morton_decode(code: u32, level: u32) -> (u32, u32) {
    (0..level).fold((0, 0), |(x, y), bit| {
        (
            x | ((code >> (2 * bit)) & 1) << bit,
            y | ((code >> (2 * bit + 1)) & 1) << bit,
        )
    })
}

#[derive(Debug, Clone, Default)]
struct Cell {
    objects: Vec<ColliderHandle>,
}

/// Linear quad-tree
#[derive(Debug, Clone)]
pub struct QuadTree {
    field_size: Vec2,
    level: u32,
    left_bottom: Vec2,
    min_cell_size: Vec2,
    cells: Vec<Option<Cell>>,
    registered: usize,
}

impl QuadTree {
    /// Create a quad-tree covering `field_size` starting at `left_bottom`
    pub fn new(field_size: Vec2, level: u32, left_bottom: Vec2) -> Result<Self, CollisionError> {
        let mut tree = Self {
            field_size: Vec2::zeros(),
            level: 0,
            left_bottom: Vec2::zeros(),
            min_cell_size: Vec2::zeros(),
            cells: Vec::new(),
            registered: 0,
        };
        tree.initialize(field_size, level, left_bottom)?;
        Ok(tree)
    }

    /// Create a quad-tree from configuration
    pub fn from_config(config: &QuadTreeConfig) -> Result<Self, CollisionError> {
        Self::new(config.field_size(), config.level, config.left_bottom())
    }

    /// Redefine the field, discarding every registration
    ///
    /// Only the root node is allocated; deeper nodes are created the first
    /// time a collider lands in them or below them.
    pub fn initialize(&mut self, field_size: Vec2, level: u32, left_bottom: Vec2) -> Result<(), CollisionError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(field_size.x) || !valid(field_size.y) {
            return Err(CollisionError::InvalidFieldSize {
                width: field_size.x,
                depth: field_size.y,
            });
        }
        if level > MAX_QUAD_TREE_LEVEL {
            return Err(CollisionError::LevelTooDeep {
                level,
                max: MAX_QUAD_TREE_LEVEL,
            });
        }

        let count = cell_count(level);
        self.field_size = field_size;
        self.level = level;
        self.left_bottom = left_bottom;
        self.min_cell_size = field_size / (1u32 << level) as f32;
        self.cells = vec![None; count];
        self.cells[0] = Some(Cell::default());
        self.registered = 0;

        log::debug!(
            "QuadTree initialized: field {}x{} at ({}, {}), level {}, {} cells, min cell {}x{}",
            field_size.x, field_size.y, left_bottom.x, left_bottom.y,
            level, count, self.min_cell_size.x, self.min_cell_size.y
        );
        Ok(())
    }

    /// Deepest-level cells holding the corners of a ground footprint
    ///
    /// Cells are closed: a max edge lying exactly on a cell boundary stays in
    /// the lower cell, so the footprint is contained by the deeper node.
    fn cell_span(&self, min: Vec2, max: Vec2) -> Option<((u32, u32), (u32, u32))> {
        let side = i64::from(1u32 << self.level);
        let lower = |v: f32, origin: f32, size: f32| ((v - origin) / size).floor() as i64;
        let upper = |v: f32, origin: f32, size: f32| ((v - origin) / size).ceil() as i64 - 1;

        let lo = (
            lower(min.x, self.left_bottom.x, self.min_cell_size.x),
            lower(min.y, self.left_bottom.y, self.min_cell_size.y),
        );
        let hi = (
            upper(max.x, self.left_bottom.x, self.min_cell_size.x).max(lo.0),
            upper(max.y, self.left_bottom.y, self.min_cell_size.y).max(lo.1),
        );

        let inside = |c: i64| (0..side).contains(&c);
        (inside(lo.0) && inside(lo.1) && inside(hi.0) && inside(hi.1))
            .then(|| ((lo.0 as u32, lo.1 as u32), (hi.0 as u32, hi.1 as u32)))
    }

    /// Node that a box would be registered at, without registering it
    ///
    /// Boxes whose footprint leaves the field map to the root.
    pub fn locate(&self, bounds: &AABB) -> NodeIndex {
        let (min, max) = bounds.ground_footprint();
        let Some((lo, hi)) = self.cell_span(min, max) else {
            return 0;
        };

        let lo = morton_encode(lo.0, lo.1, self.level);
        let hi = morton_encode(hi.0, hi.1, self.level);
        let diff = lo ^ hi;
        if diff == 0 {
            return level_offset(self.level) + lo as usize;
        }

        // Each differing bit pair above the lowest moves the node one level up
        let highest_bit = 31 - diff.leading_zeros();
        let shift = (highest_bit / 2 + 1) * 2;
        let node_level = self.level - shift / 2;
        level_offset(node_level) + (hi >> shift) as usize
    }

    /// Register a collider at the deepest node containing its bounds
    pub fn register_obj(&mut self, handle: ColliderHandle, bounds: &AABB) -> NodeIndex {
        let index = self.locate(bounds);
        self.create_cell(index);
        if let Some(cell) = self.cells[index].as_mut() {
            cell.objects.push(handle);
            self.registered += 1;
        }
        index
    }

    /// Allocate a node and every missing ancestor
    fn create_cell(&mut self, mut index: NodeIndex) {
        while index < self.cells.len() && self.cells[index].is_none() {
            self.cells[index] = Some(Cell::default());
            if index == 0 {
                break;
            }
            index = (index - 1) >> 2;
        }
    }

    /// Collect candidate pairs in the subtree rooted at `index`
    ///
    /// Every collider is paired with the others in its node and with every
    /// collider on `ancestors`, the stack of colliders in the nodes above.
    /// Sibling subtrees are never paired with each other.
    pub fn get_collision_pair(
        &self,
        index: NodeIndex,
        pairs: &mut Vec<(ColliderHandle, ColliderHandle)>,
        ancestors: &mut Vec<ColliderHandle>,
    ) {
        let Some(Some(cell)) = self.cells.get(index) else {
            return;
        };

        for (i, &object) in cell.objects.iter().enumerate() {
            pairs.extend(cell.objects[i + 1..].iter().map(|&other| (object, other)));
            pairs.extend(ancestors.iter().map(|&ancestor| (object, ancestor)));
        }

        let mut pushed = false;
        for child in (1..=4).map(|i| index * 4 + i) {
            if !matches!(self.cells.get(child), Some(Some(_))) {
                continue;
            }
            if !pushed {
                ancestors.extend_from_slice(&cell.objects);
                pushed = true;
            }
            self.get_collision_pair(child, pairs, ancestors);
        }

        if pushed {
            ancestors.truncate(ancestors.len() - cell.objects.len());
        }
    }

    /// All candidate pairs in the tree
    pub fn collision_pairs(&self) -> Vec<(ColliderHandle, ColliderHandle)> {
        let mut pairs = Vec::new();
        let mut ancestors = Vec::new();
        self.get_collision_pair(0, &mut pairs, &mut ancestors);
        pairs
    }

    /// Empty every node; node allocation and geometry are kept
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.objects.clear();
        }
        self.registered = 0;
    }

    /// Subdivision level of a node
    pub fn node_level(&self, index: NodeIndex) -> Option<u32> {
        if index >= self.cells.len() {
            return None;
        }
        (0..=self.level).rev().find(|&level| index >= level_offset(level))
    }

    /// Ground rectangle `(min, max)` covered by a node
    pub fn node_rect(&self, index: NodeIndex) -> Option<(Vec2, Vec2)> {
        let level = self.node_level(index)?;
        let (x, y) = morton_decode((index - level_offset(level)) as u32, level);
        let size = self.field_size / (1u32 << level) as f32;
        let min = self.left_bottom + Vec2::new(x as f32 * size.x, y as f32 * size.y);
        Some((min, min + size))
    }

    /// Colliders registered at a node
    pub fn objects_at(&self, index: NodeIndex) -> &[ColliderHandle] {
        match self.cells.get(index) {
            Some(Some(cell)) => &cell.objects,
            _ => &[],
        }
    }

    /// Nodes currently holding at least one collider
    pub fn occupied_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.as_ref().is_some_and(|cell| !cell.objects.is_empty()))
            .map(|(index, _)| index)
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.registered
    }

    /// Whether no collider is registered
    pub fn is_empty(&self) -> bool {
        self.registered == 0
    }

    /// Size of the linear node array
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Subdivision depth
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Field width and depth
    pub fn field_size(&self) -> Vec2 {
        self.field_size
    }

    /// Minimum X/Z corner of the field
    pub fn left_bottom(&self) -> Vec2 {
        self.left_bottom
    }
}
