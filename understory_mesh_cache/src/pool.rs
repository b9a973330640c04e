// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two bounded mesh stores: content-addressed persistent entries and per-frame scratch.

use alloc::vec::Vec;

use understory_tess::Mesh;

use crate::config::Capacities;
use crate::error::PoolError;

/// Slot in the persistent store.
///
/// Valid until the next [`MeshPool::clear_persistent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PersistentId(pub(crate) u32);

impl PersistentId {
    /// Slot index in the persistent store.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Slot in the frame-scratch store.
///
/// Valid only until the next [`MeshPool::reset_frame`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameSlot(pub(crate) u32);

impl FrameSlot {
    /// Slot index in the frame-scratch store.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a mesh held by a [`MeshPool`].
///
/// The variant is the lifetime class of the mesh. A handle carries no ownership; it is a key into
/// whichever store it names, and only the pool hands them out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MeshRef {
    /// Survives frames; keyed by content hash.
    Persistent(PersistentId),
    /// This frame only.
    Frame(FrameSlot),
}

impl MeshRef {
    /// Slot index within the tagged store.
    pub const fn index(self) -> usize {
        match self {
            Self::Persistent(id) => id.index(),
            Self::Frame(slot) => slot.index(),
        }
    }

    /// Returns `true` for a persistent handle.
    pub const fn is_persistent(self) -> bool {
        matches!(self, Self::Persistent(_))
    }
}

/// Counters describing how the pool has been used since it was created.
///
/// These are not reset by [`MeshPool::reset_frame`] or [`MeshPool::clear_persistent`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Persistent requests answered by an existing entry.
    pub persistent_hits: u64,
    /// Persistent requests that stored a new entry.
    pub persistent_misses: u64,
    /// Persistent requests refused because the store was full.
    pub persistent_full: u64,
    /// Successful frame-scratch allocations.
    pub frame_allocations: u64,
    /// Frame-scratch allocations refused because the store was full.
    pub frame_full: u64,
}

/// Owner of every mesh a scene can reference.
///
/// Both stores are allocated once at their capacity and never grow. A full store refuses new
/// entries with a [`PoolError`]; nothing is ever evicted to make room.
///
/// The frame store keeps its slots across frames. [`MeshPool::reset_frame`] only zeroes the
/// logical length, and the next allocation overwrites the slot at that length.
pub struct MeshPool {
    hashes: Vec<u64>,
    persistent: Vec<Mesh>,
    frame: Vec<Mesh>,
    frame_len: usize,
    capacities: Capacities,
    stats: PoolStats,
}

impl core::fmt::Debug for MeshPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeshPool")
            .field("persistent", &self.persistent.len())
            .field("frame", &self.frame_len)
            .field("capacities", &self.capacities)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Default for MeshPool {
    fn default() -> Self {
        Self::with_capacities(Capacities::default())
    }
}

impl MeshPool {
    /// Create a pool with the default capacities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool with custom capacities.
    ///
    /// Panics if a store capacity is zero.
    pub fn with_capacities(capacities: Capacities) -> Self {
        capacities.validate();
        Self {
            hashes: Vec::with_capacity(capacities.persistent_meshes),
            persistent: Vec::with_capacity(capacities.persistent_meshes),
            frame: Vec::with_capacity(capacities.frame_meshes),
            frame_len: 0,
            capacities,
            stats: PoolStats::default(),
        }
    }

    /// Capacities this pool was created with.
    pub fn capacities(&self) -> Capacities {
        self.capacities
    }

    /// Usage counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Number of persistent entries.
    pub fn persistent_len(&self) -> usize {
        self.persistent.len()
    }

    /// Number of frame-scratch entries allocated this frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Find the persistent entry stored under `hash`.
    ///
    /// Callers use this to skip tessellation entirely on a hit.
    pub fn lookup_persistent(&self, hash: u64) -> Option<MeshRef> {
        self.hashes
            .iter()
            .position(|&h| h == hash)
            .map(|i| MeshRef::Persistent(PersistentId(slot_index(i))))
    }

    /// Return the persistent entry for `hash`, storing `mesh` under it on a miss.
    ///
    /// On a hit `mesh` is dropped and the existing handle is returned, so repeated calls with
    /// the same hash are idempotent. On a miss with the store full this fails with
    /// [`PoolError::MeshPoolFull`]; the usual fallback is [`MeshPool::allocate_frame`], which
    /// [`MeshPool::cache_or_allocate_frame`] does in one call.
    pub fn get_or_create_persistent(&mut self, mesh: Mesh, hash: u64) -> Result<MeshRef, PoolError> {
        self.insert_persistent(mesh, hash).map_err(|(err, _)| err)
    }

    /// Cache `mesh` under `hash`, falling back to a frame-scratch slot when the persistent store
    /// is full.
    ///
    /// Fails only when both stores are full, with [`PoolError::FrameMeshPoolFull`].
    pub fn cache_or_allocate_frame(&mut self, mesh: Mesh, hash: u64) -> Result<MeshRef, PoolError> {
        match self.insert_persistent(mesh, hash) {
            Ok(r) => Ok(r),
            Err((_, mesh)) => {
                log::debug!("persistent mesh store full, hash {hash:#018x} drawn from frame scratch");
                self.allocate_frame(mesh)
            }
        }
    }

    /// Store `mesh` in the frame-scratch store.
    ///
    /// The handle is valid until the next [`MeshPool::reset_frame`].
    pub fn allocate_frame(&mut self, mesh: Mesh) -> Result<MeshRef, PoolError> {
        let slot = self.frame_len;
        if slot == self.capacities.frame_meshes {
            self.stats.frame_full += 1;
            return Err(PoolError::FrameMeshPoolFull {
                capacity: self.capacities.frame_meshes,
            });
        }
        if slot < self.frame.len() {
            self.frame[slot] = mesh;
        } else {
            self.frame.push(mesh);
        }
        self.frame_len = slot + 1;
        self.stats.frame_allocations += 1;
        Ok(MeshRef::Frame(FrameSlot(slot_index(slot))))
    }

    /// Resolve a handle to its mesh.
    ///
    /// The handle must be live: a persistent handle from before the last
    /// [`MeshPool::clear_persistent`], or a frame handle from before the last
    /// [`MeshPool::reset_frame`], is a caller bug. Debug builds assert on it; see
    /// [`MeshPool::try_get_mesh`] for a checked lookup.
    pub fn get_mesh(&self, mesh: MeshRef) -> &Mesh {
        match mesh {
            MeshRef::Persistent(id) => {
                debug_assert!(
                    id.index() < self.persistent.len(),
                    "stale persistent mesh handle {} (store holds {})",
                    id.index(),
                    self.persistent.len()
                );
                &self.persistent[id.index()]
            }
            MeshRef::Frame(slot) => {
                debug_assert!(
                    slot.index() < self.frame_len,
                    "stale frame mesh handle {} (frame holds {})",
                    slot.index(),
                    self.frame_len
                );
                &self.frame[slot.index()]
            }
        }
    }

    /// Resolve a handle, returning `None` if it is outside its store's current length.
    pub fn try_get_mesh(&self, mesh: MeshRef) -> Option<&Mesh> {
        match mesh {
            MeshRef::Persistent(id) => self.persistent.get(id.index()),
            MeshRef::Frame(slot) => self.frame[..self.frame_len].get(slot.index()),
        }
    }

    /// Start a new frame: every frame handle handed out so far becomes invalid.
    ///
    /// Constant time; old meshes stay in their slots until overwritten.
    pub fn reset_frame(&mut self) {
        self.frame_len = 0;
    }

    /// Drop every persistent entry.
    ///
    /// Use this when cached source geometry changes; nothing frame-related clears the
    /// persistent store implicitly.
    pub fn clear_persistent(&mut self) {
        log::debug!("clearing {} persistent meshes", self.persistent.len());
        self.hashes.clear();
        self.persistent.clear();
    }

    fn insert_persistent(&mut self, mesh: Mesh, hash: u64) -> Result<MeshRef, (PoolError, Mesh)> {
        if let Some(r) = self.lookup_persistent(hash) {
            self.stats.persistent_hits += 1;
            return Ok(r);
        }
        let slot = self.persistent.len();
        if slot == self.capacities.persistent_meshes {
            self.stats.persistent_full += 1;
            let err = PoolError::MeshPoolFull {
                capacity: self.capacities.persistent_meshes,
            };
            return Err((err, mesh));
        }
        self.hashes.push(hash);
        self.persistent.push(mesh);
        self.stats.persistent_misses += 1;
        Ok(MeshRef::Persistent(PersistentId(slot_index(slot))))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "store capacities are validated to fit u32 at construction"
)]
const fn slot_index(i: usize) -> u32 {
    i as u32
}
