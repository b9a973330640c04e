// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capacity errors for the mesh stores and the frame scene.

use thiserror::Error;

/// A mesh store refused an entry.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The persistent store is full and the hash was not present.
    ///
    /// Callers fall back to a frame-scratch allocation for this one request.
    #[error("persistent mesh store is full ({capacity} entries)")]
    MeshPoolFull {
        /// Store capacity.
        capacity: usize,
    },
    /// The frame-scratch store is full for this frame.
    ///
    /// Callers drop the draw for this frame.
    #[error("frame mesh store is full ({capacity} entries)")]
    FrameMeshPoolFull {
        /// Store capacity.
        capacity: usize,
    },
}

/// A scene insertion or clip operation failed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The per-frame instance list is full; the instance was dropped.
    #[error("instance list is full ({capacity} instances)")]
    InstanceListFull {
        /// List capacity.
        capacity: usize,
    },
    /// Too many nested clip rectangles.
    #[error("clip stack is full ({capacity} levels)")]
    ClipStackOverflow {
        /// Stack capacity.
        capacity: usize,
    },
    /// A mesh store refused the mesh backing the instance.
    #[error(transparent)]
    Pool(#[from] PoolError),
}
