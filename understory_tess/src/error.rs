// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while buffering, triangulating, or building a path mesh.

use thiserror::Error;

/// Failure to tessellate one path.
///
/// Every variant is local to the path that raised it. Inputs are deterministic, so retrying
/// with the same input reproduces the same error; callers skip the path for this frame.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TessError {
    /// The contour has fewer than three points (or the build was given no contours).
    #[error("degenerate polygon: {len} points, need at least 3")]
    DegeneratePolygon {
        /// Number of points in the offending contour.
        len: usize,
    },
    /// A contour or point buffer exceeds the vertex capacity.
    #[error("too many vertices: {len} exceeds the limit of {max}")]
    TooManyVertices {
        /// Requested vertex count.
        len: usize,
        /// Capacity that was exceeded.
        max: usize,
    },
    /// The accumulated index list would exceed the index capacity.
    #[error("too many indices: {len} exceeds the limit of {max}")]
    TooManyIndices {
        /// Requested index count.
        len: usize,
        /// Capacity that was exceeded.
        max: usize,
    },
    /// The path buffer already holds the maximum number of contours.
    #[error("too many contours: the limit is {max}")]
    TooManyContours {
        /// Capacity that was exceeded.
        max: usize,
    },
    /// A contour range reaches past the end of the point buffer.
    #[error("contour ends at {end} but the point buffer has {len} points")]
    ContourOutOfBounds {
        /// Exclusive end of the contour range.
        end: usize,
        /// Length of the point buffer.
        len: usize,
    },
    /// The ear search ran out of candidates or hit its iteration bound.
    ///
    /// Typical causes are self-intersecting contours and contours that fold back on themselves.
    #[error("ear clipping failed with {remaining} vertices left after {iterations} iterations")]
    EarClippingFailed {
        /// Vertices still unclipped when the search gave up.
        remaining: usize,
        /// Candidate vertices examined before giving up.
        iterations: usize,
    },
}
