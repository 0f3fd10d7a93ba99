//! Collision manager: broad phase, parallel narrow phase and callback dispatch
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! One [`CollisionManager::update`] call runs a whole frame:
//!
//! 1. apply unregistrations deferred during the previous frame
//! 2. broad phase: dynamic colliders go through the [`QuadTree`], each
//!    dynamic collider also queries the [`SpiralHashGrid`] of static colliders
//! 3. narrow phase: candidate pairs are split into contiguous slices, one per
//!    worker, run inside a [`std::thread::scope`] and merged under a mutex
//! 4. callback dispatch on the calling thread
//! 5. enter/stay/exit bookkeeping on every collider touched this frame
//! 6. optional debug draw, then the per-frame lists are cleared
//!
//! Dynamic colliders must be registered again every frame; static colliders
//! stay registered until they are unregistered.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::config::CollisionConfig;
use crate::foundation::math::Vec2;
use crate::physics::collider::{
    Collider, ColliderHandle, ColliderSet, CollisionCommands, CollisionEvent,
};
use crate::physics::collision::ColliderInfo;
use crate::physics::collision_detector::CollisionDetector;
use crate::physics::collision_layers::{CollisionLayerRegistry, CollisionLayers};
use crate::physics::error::CollisionError;
use crate::spatial::{QuadTree, SpiralHashGrid};
use crate::debug::CollisionStats;

#[cfg(feature = "debug-draw")]
use crate::debug::{CollisionDebugVisualizer, DebugLine};

/// Where the manager is within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionPhase {
    /// Between frames; registration and unregistration apply immediately
    #[default]
    Idle,
    /// Building the candidate pair list
    BroadPhase,
    /// Exact tests running on worker threads
    NarrowPhase,
    /// Running user callbacks on the calling thread
    CallbackDispatch,
    /// Reconciling per-collider contact sets
    StateUpdate,
}

impl CollisionPhase {
    /// Whether detection is running; registration is dropped in this window
    pub fn is_collision_phase(self) -> bool {
        matches!(self, Self::BroadPhase | Self::NarrowPhase)
    }
}

/// Two overlapping colliders found this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    /// First collider
    pub a: ColliderHandle,
    /// Second collider
    pub b: ColliderHandle,
    /// Contact info; the normal points from `a` toward `b`
    pub info: ColliderInfo,
}

/// One queued callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionCallInfo {
    /// Collider whose callback runs
    pub caller: ColliderHandle,
    /// Collider it touched
    pub other: ColliderHandle,
    /// Contact info; the normal points from `caller` toward `other`
    pub info: ColliderInfo,
}

fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("Collision {} lock was poisoned; recovering", what);
        poisoned.into_inner()
    })
}

/// Order-independent key of a candidate pair
fn pair_key(a: ColliderHandle, b: ColliderHandle) -> (ColliderHandle, ColliderHandle) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Exact tests over one slice of candidate pairs
///
/// Runs on a worker thread; reads the collider set and writes only to its
/// own buffers.
fn detect_pairs(
    colliders: &ColliderSet,
    candidates: &[(ColliderHandle, ColliderHandle)],
) -> (Vec<CollisionPair>, Vec<CollisionCallInfo>) {
    let mut pairs = Vec::new();
    let mut calls = Vec::new();

    for &(a, b) in candidates {
        let (Some(collider_a), Some(collider_b)) = (colliders.get(a), colliders.get(b)) else {
            continue;
        };
        if CollisionLayers::is_exempt(collider_a.layer(), collider_a.mask(), collider_b.layer(), collider_b.mask()) {
            continue;
        }
        let Some(info) = CollisionDetector::detect_collision(collider_a, collider_b) else {
            continue;
        };

        pairs.push(CollisionPair { a, b, info });
        calls.push(CollisionCallInfo { caller: a, other: b, info });
        calls.push(CollisionCallInfo { caller: b, other: a, info: info.flipped() });
    }

    (pairs, calls)
}

/// Orchestrates collision detection for one collision world
///
/// The manager stores only [`ColliderHandle`]s; the colliders themselves live
/// in a [`ColliderSet`] owned by gameplay code and passed in by reference.
/// Handles that are stale in that set are skipped everywhere.
pub struct CollisionManager {
    config: CollisionConfig,
    quad_tree: QuadTree,
    hash_grid: SpiralHashGrid,
    layers: CollisionLayerRegistry,

    colliders: Vec<ColliderHandle>,
    collider_index: HashSet<ColliderHandle>,
    static_colliders: Vec<ColliderHandle>,
    static_index: HashSet<ColliderHandle>,

    potential_collisions: Vec<(ColliderHandle, ColliderHandle)>,
    collision_pairs: Mutex<Vec<CollisionPair>>,
    collision_call_queue: Mutex<Vec<CollisionCallInfo>>,
    pending_unregister: Vec<ColliderHandle>,
    pending_refresh: Vec<ColliderHandle>,
    /// Colliders whose contact state was closed by the latest frame
    closed_last_frame: HashSet<ColliderHandle>,

    phase: CollisionPhase,
    thread_count: usize,
    last_registered: usize,
    last_candidate_pairs: usize,
    last_active_pairs: usize,

    debug_draw: bool,
    #[cfg(feature = "debug-draw")]
    visualizer: CollisionDebugVisualizer,
}

impl std::fmt::Debug for CollisionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionManager")
            .field("phase", &self.phase)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl CollisionManager {
    /// Create a manager from configuration
    pub fn new(config: CollisionConfig) -> Result<Self, CollisionError> {
        let quad_tree = QuadTree::from_config(&config.quad_tree)?;
        let hash_grid = SpiralHashGrid::from_config(&config.hash_grid)?;
        let layers = CollisionLayerRegistry::from_config(&config.layers)?;
        let thread_count = config.resolved_thread_count();

        log::info!(
            "Collision manager: field {:?} at {:?}, level {} ({} cells), grid cell {}, {} threads",
            config.quad_tree.field_size,
            config.quad_tree.left_bottom,
            quad_tree.level(),
            quad_tree.cell_count(),
            hash_grid.cell_size(),
            thread_count
        );

        Ok(Self {
            #[cfg(feature = "debug-draw")]
            visualizer: CollisionDebugVisualizer::new(&config.debug),
            debug_draw: config.debug.draw_colliders,
            quad_tree,
            hash_grid,
            layers,
            colliders: Vec::new(),
            collider_index: HashSet::new(),
            static_colliders: Vec::new(),
            static_index: HashSet::new(),
            potential_collisions: Vec::new(),
            collision_pairs: Mutex::new(Vec::new()),
            collision_call_queue: Mutex::new(Vec::new()),
            pending_unregister: Vec::new(),
            pending_refresh: Vec::new(),
            closed_last_frame: HashSet::new(),
            phase: CollisionPhase::Idle,
            thread_count,
            last_registered: 0,
            last_candidate_pairs: 0,
            last_active_pairs: 0,
            config,
        })
    }

    /// Rebuild the spatial structures for a new field
    ///
    /// Every registration is dropped. On error the manager is left as it was.
    pub fn initialize(
        &mut self,
        field_size: Vec2,
        level: u32,
        left_bottom: Vec2,
        cell_size: f32,
    ) -> Result<(), CollisionError> {
        let quad_tree = QuadTree::new(field_size, level, left_bottom)?;
        let hash_grid = SpiralHashGrid::new(cell_size)?;

        self.clear();
        self.quad_tree = quad_tree;
        self.hash_grid = hash_grid;
        self.config = self.config.clone().with_field(field_size, level, left_bottom).with_cell_size(cell_size);

        log::info!(
            "Collision manager initialized: field {}x{} at ({}, {}), level {} ({} cells), grid cell {}, {} threads",
            field_size.x,
            field_size.y,
            left_bottom.x,
            left_bottom.y,
            level,
            self.quad_tree.cell_count(),
            cell_size,
            self.thread_count
        );
        Ok(())
    }

    /// Drop every registration and every per-frame result
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.collider_index.clear();
        self.static_colliders.clear();
        self.static_index.clear();
        self.hash_grid.clear();
        self.quad_tree.reset();
        self.potential_collisions.clear();
        self.collision_pairs.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        self.collision_call_queue.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        self.pending_unregister.clear();
        self.pending_refresh.clear();
        self.phase = CollisionPhase::Idle;
        self.last_registered = 0;
        self.last_candidate_pairs = 0;
        self.last_active_pairs = 0;
    }

    // ---------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------

    /// Whether a registration request should be ignored
    fn rejects_registration(&self, colliders: &ColliderSet, handle: ColliderHandle) -> bool {
        if self.phase.is_collision_phase() {
            log::trace!("Registration of {:?} during {:?} dropped", handle, self.phase);
            return true;
        }
        match colliders.get(handle) {
            None => {
                log::trace!("Registration of stale handle {:?} ignored", handle);
                true
            }
            Some(collider) if collider.shape().is_none() => {
                log::trace!("Collider '{}' has no shape; registration ignored", collider.name());
                true
            }
            Some(_) => false,
        }
    }

    /// Register a dynamic collider for this frame
    ///
    /// Ignored for stale handles, colliders without a shape, duplicates and
    /// calls made while detection is running.
    pub fn register_collider(&mut self, colliders: &ColliderSet, handle: ColliderHandle) {
        if self.rejects_registration(colliders, handle) {
            return;
        }
        if !self.collider_index.insert(handle) {
            log::trace!("Collider {:?} already registered", handle);
            return;
        }
        self.colliders.push(handle);
    }

    /// Register a static collider until it is unregistered
    ///
    /// The collider's world shape is refreshed from its owner before it is
    /// placed in the hash grid.
    pub fn register_static_collider(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle) {
        if self.rejects_registration(colliders, handle) {
            return;
        }
        if self.static_index.contains(&handle) {
            log::trace!("Static collider {:?} already registered", handle);
            return;
        }

        let Some(bounds) = colliders.get_mut(handle).and_then(|collider| {
            collider.update();
            collider.bounds()
        }) else {
            return;
        };
        self.hash_grid.add_collider(handle, &bounds);
        self.static_index.insert(handle);
        self.static_colliders.push(handle);
    }

    /// Unregister a collider from every registry
    ///
    /// Outside a frame the removal is immediate. While a frame is running
    /// (including from inside a collision callback) it is deferred to the
    /// start of the next [`CollisionManager::update`].
    pub fn unregister_collider(&mut self, handle: ColliderHandle) {
        if self.phase != CollisionPhase::Idle {
            if !self.pending_unregister.contains(&handle) {
                self.pending_unregister.push(handle);
            }
            return;
        }
        self.remove_everywhere(handle);
    }

    /// Re-insert a static collider whose owner moved
    ///
    /// Deferred like [`CollisionManager::unregister_collider`] while a frame
    /// is running.
    pub fn refresh_static_collider(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle) {
        if !self.static_index.contains(&handle) {
            return;
        }
        if self.phase != CollisionPhase::Idle {
            if !self.pending_refresh.contains(&handle) {
                self.pending_refresh.push(handle);
            }
            return;
        }

        match colliders.get_mut(handle).and_then(|collider| {
            collider.update();
            collider.bounds()
        }) {
            Some(bounds) => self.hash_grid.add_collider(handle, &bounds),
            None => log::trace!("Refresh of stale static collider {:?} ignored", handle),
        }
    }

    fn remove_everywhere(&mut self, handle: ColliderHandle) {
        if self.collider_index.remove(&handle) {
            self.colliders.retain(|&h| h != handle);
        }
        if self.static_index.remove(&handle) {
            self.static_colliders.retain(|&h| h != handle);
            self.hash_grid.remove_collider(handle);
        }
        self.pending_refresh.retain(|&h| h != handle);
        self.potential_collisions.retain(|&(a, b)| a != handle && b != handle);
        self.collision_pairs
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|pair| pair.a != handle && pair.b != handle);
        self.collision_call_queue
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|call| call.caller != handle && call.other != handle);
    }

    fn process_pending_unregistrations(&mut self, colliders: &mut ColliderSet) {
        for handle in std::mem::take(&mut self.pending_unregister) {
            self.remove_everywhere(handle);
        }
        for handle in std::mem::take(&mut self.pending_refresh) {
            self.refresh_static_collider(colliders, handle);
        }
    }

    // ---------------------------------------------------------------
    // Frame
    // ---------------------------------------------------------------

    /// Run one collision frame
    ///
    /// Registered dynamic colliders have their world shape refreshed from
    /// their owners before the broad phase. Afterwards the dynamic list is
    /// empty and must be filled again for the next frame.
    pub fn update(&mut self, colliders: &mut ColliderSet) {
        self.process_pending_unregistrations(colliders);

        for &handle in &self.colliders {
            if let Some(collider) = colliders.get_mut(handle) {
                collider.update();
            }
        }

        self.check_collisions(colliders);
        self.process_collision_callbacks(colliders);
        self.update_collision_states(colliders);

        #[cfg(feature = "debug-draw")]
        if self.debug_draw {
            self.draw_colliders(colliders);
        }

        log::trace!(
            "Collision frame: {} dynamic, {} static, {} candidates, {} hits",
            self.last_registered,
            self.static_colliders.len(),
            self.last_candidate_pairs,
            self.last_active_pairs
        );

        self.colliders.clear();
        self.collider_index.clear();
        self.potential_collisions.clear();
        self.collision_pairs.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        self.quad_tree.reset();
        self.phase = CollisionPhase::Idle;
    }

    /// Broad phase followed by the parallel narrow phase
    ///
    /// Fills the pair list and the callback queue without running any
    /// callback. Blocks until every worker has finished.
    pub fn check_collisions(&mut self, colliders: &ColliderSet) {
        self.collision_pairs.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        self.collision_call_queue.get_mut().unwrap_or_else(PoisonError::into_inner).clear();

        self.phase = CollisionPhase::BroadPhase;
        self.update_broad_phase(colliders);

        self.phase = CollisionPhase::NarrowPhase;
        self.narrow_phase(colliders);

        self.last_registered = self.colliders.len();
        self.last_candidate_pairs = self.potential_collisions.len();
        self.last_active_pairs = self.collision_pairs.get_mut().unwrap_or_else(PoisonError::into_inner).len();
        self.phase = CollisionPhase::Idle;
    }

    fn update_broad_phase(&mut self, colliders: &ColliderSet) {
        self.potential_collisions.clear();
        if !self.quad_tree.is_empty() {
            self.quad_tree.reset();
        }

        for &handle in &self.colliders {
            if let Some(bounds) = colliders.get(handle).and_then(Collider::bounds) {
                self.quad_tree.register_obj(handle, &bounds);
            }
        }

        let mut seen = HashSet::new();
        for (a, b) in self.quad_tree.collision_pairs() {
            if a != b && seen.insert(pair_key(a, b)) {
                self.potential_collisions.push((a, b));
            }
        }

        if self.hash_grid.is_empty() {
            return;
        }
        let mut nearby = Vec::new();
        for &handle in &self.colliders {
            let Some(bounds) = colliders.get(handle).and_then(Collider::bounds) else {
                continue;
            };
            nearby.clear();
            self.hash_grid.check_collision_into(&bounds, Some(handle), &mut nearby);
            for &other in &nearby {
                if colliders.contains(other) && seen.insert(pair_key(handle, other)) {
                    self.potential_collisions.push((handle, other));
                }
            }
        }
    }

    fn narrow_phase(&self, colliders: &ColliderSet) {
        let candidates = self.potential_collisions.as_slice();
        if candidates.is_empty() {
            return;
        }

        let workers = self.thread_count.min(candidates.len()).max(1);
        let pairs_out = &self.collision_pairs;
        let calls_out = &self.collision_call_queue;
        let merge = |(pairs, calls): (Vec<CollisionPair>, Vec<CollisionCallInfo>)| {
            if !pairs.is_empty() {
                lock_or_recover(pairs_out, "pair").extend(pairs);
                lock_or_recover(calls_out, "callback queue").extend(calls);
            }
        };

        if workers == 1 {
            merge(detect_pairs(colliders, candidates));
            return;
        }

        let chunk_size = candidates.len().div_ceil(workers);
        std::thread::scope(|s| {
            let handles: Vec<_> = candidates
                .chunks(chunk_size)
                .map(|slice| s.spawn(move || merge(detect_pairs(colliders, slice))))
                .collect();

            for handle in handles {
                if let Err(panic) = handle.join() {
                    std::panic::resume_unwind(panic);
                }
            }
        });
    }

    /// Run every queued callback on the calling thread
    ///
    /// Each contact is first recorded on the caller with
    /// [`Collider::add_current_collision`]. Commands issued by callbacks are
    /// applied once the queue is drained.
    fn process_collision_callbacks(&mut self, colliders: &mut ColliderSet) {
        self.phase = CollisionPhase::CallbackDispatch;

        let queue = std::mem::take(self.collision_call_queue.get_mut().unwrap_or_else(PoisonError::into_inner));
        let mut commands = CollisionCommands::new();

        for call in &queue {
            let Some(other_layer) = colliders.get(call.other).map(Collider::layer) else {
                continue;
            };
            let Some(caller) = colliders.get_mut(call.caller) else {
                continue;
            };

            caller.add_current_collision(call.other, call.info);
            let event = CollisionEvent {
                caller: call.caller,
                other: call.other,
                other_layer,
                info: call.info,
            };
            caller.on_collision(&event, &mut commands);
        }

        let unregistrations: Vec<_> = commands.drain_unregistrations().collect();
        for handle in unregistrations {
            self.unregister_collider(handle);
        }
        let refreshes: Vec<_> = commands.drain_refreshes().collect();
        for handle in refreshes {
            self.refresh_static_collider(colliders, handle);
        }
    }

    /// Close the frame on every registered collider exactly once
    ///
    /// A collider that was closed last frame but is no longer registered is
    /// closed too, so its contacts move to `exited` like its partners' do. It
    /// keeps being closed until it has no edges left to report.
    fn update_collision_states(&mut self, colliders: &mut ColliderSet) {
        self.phase = CollisionPhase::StateUpdate;

        let mut closed = HashSet::with_capacity(self.colliders.len() + self.static_colliders.len());
        for &handle in self.colliders.iter().chain(&self.static_colliders) {
            if !closed.insert(handle) {
                continue;
            }
            if let Some(collider) = colliders.get_mut(handle) {
                collider.update_collision_state();
            }
        }

        for handle in std::mem::take(&mut self.closed_last_frame) {
            if closed.contains(&handle) {
                continue;
            }
            let Some(collider) = colliders.get_mut(handle) else {
                continue;
            };
            collider.update_collision_state();
            if !collider.exited().is_empty() {
                closed.insert(handle);
            }
        }

        self.closed_last_frame = closed;
    }

    #[cfg(feature = "debug-draw")]
    fn draw_colliders(&mut self, colliders: &ColliderSet) {
        self.visualizer.begin_frame();
        for &handle in &self.colliders {
            if let Some(collider) = colliders.get(handle) {
                self.visualizer.draw_collider(collider, false);
            }
        }
        for &handle in &self.static_colliders {
            if let Some(collider) = colliders.get(handle) {
                self.visualizer.draw_collider(collider, true);
            }
        }
        for pair in self.collision_pairs.get_mut().unwrap_or_else(PoisonError::into_inner).iter() {
            self.visualizer.draw_contact(&pair.info);
        }
        self.visualizer.draw_quad_tree(&self.quad_tree);
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    /// Pairs found by the latest [`CollisionManager::check_collisions`]
    ///
    /// Empty again once [`CollisionManager::update`] returns.
    pub fn collision_pairs(&mut self) -> &[CollisionPair] {
        self.collision_pairs.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Callbacks waiting for dispatch
    pub fn pending_callbacks(&mut self) -> &[CollisionCallInfo] {
        self.collision_call_queue.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Candidate pairs of the latest broad phase
    pub fn potential_collisions(&self) -> &[(ColliderHandle, ColliderHandle)] {
        &self.potential_collisions
    }

    /// Whether a dynamic collider is registered for this frame
    pub fn is_registered(&self, handle: ColliderHandle) -> bool {
        self.collider_index.contains(&handle)
    }

    /// Whether a static collider is registered
    pub fn is_static_registered(&self, handle: ColliderHandle) -> bool {
        self.static_index.contains(&handle)
    }

    /// Registered dynamic colliders
    pub fn colliders(&self) -> &[ColliderHandle] {
        &self.colliders
    }

    /// Registered static colliders
    pub fn static_colliders(&self) -> &[ColliderHandle] {
        &self.static_colliders
    }

    /// Unregistrations waiting for the next frame
    pub fn pending_unregistrations(&self) -> &[ColliderHandle] {
        &self.pending_unregister
    }

    /// Current frame phase
    pub fn phase(&self) -> CollisionPhase {
        self.phase
    }

    /// Live counters for a debug panel
    ///
    /// Dynamic and pair counts describe the latest collision pass.
    pub fn stats(&self) -> CollisionStats {
        CollisionStats {
            registered: self.last_registered.max(self.colliders.len()),
            static_registered: self.static_colliders.len(),
            candidate_pairs: self.last_candidate_pairs,
            active_pairs: self.last_active_pairs,
            thread_count: self.thread_count,
            pending_unregistrations: self.pending_unregister.len(),
        }
    }

    /// Set the narrow-phase worker count (at least one)
    pub fn set_thread_count(&mut self, thread_count: usize) {
        self.thread_count = thread_count.max(1);
        log::debug!("Collision narrow phase uses {} threads", self.thread_count);
    }

    /// Narrow-phase worker count
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Toggle collider debug drawing
    pub fn set_debug_draw(&mut self, enabled: bool) {
        self.debug_draw = enabled;
    }

    /// Whether collider debug drawing is on
    pub fn debug_draw_enabled(&self) -> bool {
        self.debug_draw
    }

    /// Debug lines produced by the latest frame
    #[cfg(feature = "debug-draw")]
    pub fn debug_lines(&self) -> &[DebugLine] {
        self.visualizer.lines()
    }

    /// Hand the latest frame's debug lines to a renderer
    #[cfg(feature = "debug-draw")]
    pub fn take_debug_lines(&mut self) -> Vec<DebugLine> {
        self.visualizer.take_lines()
    }

    /// Collider visualizer, for changing what is drawn
    #[cfg(feature = "debug-draw")]
    pub fn visualizer_mut(&mut self) -> &mut CollisionDebugVisualizer {
        &mut self.visualizer
    }

    /// Layer name registry
    pub fn layers(&self) -> &CollisionLayerRegistry {
        &self.layers
    }

    /// Layer name registry, for naming new layers
    pub fn layers_mut(&mut self) -> &mut CollisionLayerRegistry {
        &mut self.layers
    }

    /// Dynamic-collider quad tree
    pub fn quad_tree(&self) -> &QuadTree {
        &self.quad_tree
    }

    /// Static-collider hash grid
    pub fn hash_grid(&self) -> &SpiralHashGrid {
        &self.hash_grid
    }

    /// Configuration the manager was built from
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }
}
