// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capacity contract for the mesh stores and the per-frame instance list.

/// Default capacity of the persistent (content-addressed) mesh store.
pub const MAX_PERSISTENT_MESHES: usize = 512;

/// Default capacity of the frame-scratch mesh store.
pub const MAX_FRAME_MESHES: usize = 256;

/// Default capacity of the per-frame instance list.
pub const MAX_PATHS_PER_FRAME: usize = 4096;

/// Default depth of the clip stack.
pub const MAX_CLIP_DEPTH: usize = 32;

/// Fixed capacities for a [`MeshPool`](crate::MeshPool) and a [`FrameScene`](crate::FrameScene).
///
/// These are observable failure thresholds, not tuning hints: each store is allocated once at
/// this size and a full store reports an error instead of growing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capacities {
    /// Persistent store entries.
    pub persistent_meshes: usize,
    /// Frame-scratch store entries.
    pub frame_meshes: usize,
    /// Instances per frame.
    pub instances: usize,
    /// Nested clip rectangles.
    pub clip_depth: usize,
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            persistent_meshes: MAX_PERSISTENT_MESHES,
            frame_meshes: MAX_FRAME_MESHES,
            instances: MAX_PATHS_PER_FRAME,
            clip_depth: MAX_CLIP_DEPTH,
        }
    }
}

impl Capacities {
    /// Panic unless every capacity is non-zero and fits a `u32` slot index.
    pub(crate) fn validate(&self) {
        for (name, cap) in [
            ("persistent_meshes", self.persistent_meshes),
            ("frame_meshes", self.frame_meshes),
            ("instances", self.instances),
            ("clip_depth", self.clip_depth),
        ] {
            assert!(cap > 0, "capacity `{name}` must be non-zero");
            assert!(
                u32::try_from(cap).is_ok(),
                "capacity `{name}` must fit a 32-bit slot index"
            );
        }
    }
}
