//! Collision telemetry panel
//!
//! Read-only counters a debug UI can show each frame.

use std::fmt;

/// Live collision counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Registered dynamic colliders
    pub registered: usize,
    /// Registered static colliders
    pub static_registered: usize,
    /// Broad-phase candidate pairs of the latest frame
    pub candidate_pairs: usize,
    /// Overlapping pairs of the latest frame
    pub active_pairs: usize,
    /// Narrow-phase worker count
    pub thread_count: usize,
    /// Unregistrations waiting for the next frame
    pub pending_unregistrations: usize,
}

impl fmt::Display for CollisionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collision")?;
        writeln!(f, "  colliders:   {} dynamic / {} static", self.registered, self.static_registered)?;
        writeln!(f, "  pairs:       {} candidate / {} active", self.candidate_pairs, self.active_pairs)?;
        writeln!(f, "  threads:     {}", self.thread_count)?;
        write!(f, "  pending:     {}", self.pending_unregistrations)
    }
}
