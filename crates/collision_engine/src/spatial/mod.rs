//! Spatial partitioning data structures
//!
//! Broad-phase indices over the XZ ground plane: a linear quad tree for
//! dynamic colliders and an unbounded hash grid for static ones.

mod quad_tree;
mod spiral_hash_grid;

pub use quad_tree::{cell_count, NodeIndex, QuadTree};
pub use spiral_hash_grid::{CellKey, SpiralHashGrid};
