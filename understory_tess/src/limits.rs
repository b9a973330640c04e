// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capacity limits.
//!
//! These are part of the observable contract: every buffer in this crate is pre-sized to one of
//! them at construction and an input that would exceed it fails with a typed error instead of
//! growing the buffer.

/// Maximum number of vertices in one contour, and in one mesh's point buffer.
pub const MAX_PATH_VERTICES: usize = 1024;

/// Maximum number of indices produced for one mesh (`3 * (MAX_PATH_VERTICES - 2)`).
pub const MAX_PATH_INDICES: usize = 3 * (MAX_PATH_VERTICES - 2);

/// Maximum number of contours a [`PathBuffer`](crate::PathBuffer) holds.
pub const MAX_PATH_CONTOURS: usize = 64;
