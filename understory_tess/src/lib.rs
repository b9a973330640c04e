// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tess --heading-base-level=0

//! Understory Tess: bounded tessellation of flattened 2D contours into triangle meshes.
//!
//! Understory Tess is the geometry half of a path renderer for immediate-mode UIs.
//!
//! - Takes already-flattened polygon data: a shared point buffer plus [`Contour`] index ranges.
//! - Triangulates each contour independently with ear clipping ([`Triangulator`]).
//! - Assembles a GPU-ready [`Mesh`]: 16-byte [`Vertex`]es with bounds-normalized UVs, `u32`
//!   indices with a stride of three, and the mesh [`Bounds`].
//!
//! It does not parse path commands or subdivide curves. [`PathBuffer::push_bez_path`] accepts a
//! Kurbo [`BezPath`](kurbo::BezPath) and leans on [`kurbo::flatten`] for that.
//!
//! ## Fixed capacity
//!
//! Every buffer is sized once, from the limits in this crate ([`MAX_PATH_VERTICES`],
//! [`MAX_PATH_INDICES`], [`MAX_PATH_CONTOURS`]), and never grows. Input that would not fit fails
//! with a [`TessError`] instead. Together with the `n²` bound on the ear search this gives every
//! call a predictable worst case, which is what a frame-synchronous renderer needs.
//!
//! ## Failure model
//!
//! Errors are local to one path. A caller that hits [`TessError`] should log, skip that path for
//! the frame, and keep going; nothing here is fatal to the rest of the scene.
//!
//! ## Winding
//!
//! Each contour's [`Winding`] is the sign of its shoelace area (positive is counter-clockwise in
//! y-up coordinates). Emitted triangles keep the input winding, so reversing a contour flips the
//! orientation of every triangle it produces.
//!
//! # Example
//!
//! ```rust
//! use understory_tess::{MeshBuilder, PathBuffer, Point};
//!
//! // An L-shaped (concave) contour.
//! let mut path = PathBuffer::new();
//! path.push_contour([
//!     Point::new(0.0, 0.0),
//!     Point::new(2.0, 0.0),
//!     Point::new(2.0, 1.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(1.0, 2.0),
//!     Point::new(0.0, 2.0),
//! ])
//! .unwrap();
//!
//! let mut builder = MeshBuilder::new();
//! let mesh = builder.build_path(&path).unwrap();
//! assert_eq!(mesh.triangle_count(), 4);
//! assert_eq!(mesh.vertices()[1].uv, [1.0, 0.0]);
//!
//! // Content hash for a persistent cache key.
//! let key = path.content_hash();
//! # let _ = key;
//! ```
//!
//! Triangulating a contour directly:
//!
//! ```rust
//! use understory_tess::{Contour, Point, Triangulator};
//!
//! let points = [
//!     Point::new(0.0, 0.0),
//!     Point::new(1.0, 0.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(0.0, 1.0),
//! ];
//! let mut tri = Triangulator::new();
//! let out = tri.triangulate(&points, Contour::new(0, 4)).unwrap();
//! assert_eq!(out.indices.len(), 6);
//! assert!(out.winding.is_ccw());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod builder;
pub mod error;
pub mod limits;
pub mod path;
pub mod triangulate;
pub mod types;

pub use builder::{Mesh, MeshBuilder};
pub use error::TessError;
pub use limits::{MAX_PATH_CONTOURS, MAX_PATH_INDICES, MAX_PATH_VERTICES};
pub use path::{PathBuffer, content_hash};
pub use triangulate::{Triangulation, Triangulator, signed_area};
pub use types::{Bounds, Contour, Point, Vertex, Winding};
