// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_mesh_cache --heading-base-level=0

//! Understory Mesh Cache: bounded mesh storage and the per-frame path instance list.
//!
//! This crate sits between [`understory_tess`], which turns flattened paths into [`Mesh`]es, and
//! a renderer that submits them to the GPU.
//!
//! - [`MeshPool`] owns two fixed-capacity stores. The persistent store is keyed by a 64-bit
//!   content hash and survives frames until [`MeshPool::clear_persistent`]. The frame-scratch
//!   store is truncated in constant time at the start of each frame.
//! - [`MeshRef`] is a tagged handle into one of the two stores. The tag is the lifetime class:
//!   a [`MeshRef::Frame`] is only valid during the frame it was allocated in.
//! - [`FrameScene`] collects [`Instance`]s for one frame. Each insert takes a [`DrawOrder`] token
//!   from a counter shared with every other primitive kind and snapshots the current clip.
//!
//! ## Capacities
//!
//! All stores and lists are allocated once from [`Capacities`] (defaults:
//! [`MAX_PERSISTENT_MESHES`], [`MAX_FRAME_MESHES`], [`MAX_PATHS_PER_FRAME`], [`MAX_CLIP_DEPTH`]).
//! A full container reports an error and nothing grows. Errors are per draw: callers log or
//! ignore them and carry on with the rest of the frame.
//!
//! | Condition | Error | Policy |
//! |---|---|---|
//! | persistent store full on a miss | [`PoolError::MeshPoolFull`] | fall back to frame scratch |
//! | frame store full | [`PoolError::FrameMeshPoolFull`] | drop the draw this frame |
//! | instance list full | [`SceneError::InstanceListFull`] | drop the instance |
//! | clip stack full | [`SceneError::ClipStackOverflow`] | leave the clip unchanged |
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Rect, Vec2};
//! use peniko::Color;
//! use understory_mesh_cache::{FrameScene, Placement};
//! use understory_tess::{MeshBuilder, PathBuffer, Point};
//!
//! let mut path = PathBuffer::new();
//! path.push_contour([
//!     Point::new(0.0, 0.0),
//!     Point::new(16.0, 0.0),
//!     Point::new(16.0, 16.0),
//!     Point::new(0.0, 16.0),
//! ])
//! .unwrap();
//! let hash = path.content_hash();
//!
//! let mut builder = MeshBuilder::new();
//! let mut scene = FrameScene::new();
//!
//! for _frame in 0..2 {
//!     scene.begin_frame(Rect::new(0.0, 0.0, 640.0, 480.0));
//!     let blue = Color::from_rgba8(0, 0, 255, 255);
//!
//!     // A static icon: only tessellated on the first frame.
//!     let icon = match scene.pool().lookup_persistent(hash) {
//!         Some(icon) => icon,
//!         None => scene.cache_mesh(builder.build_path(&path).unwrap(), hash).unwrap(),
//!     };
//!     scene.insert_path(icon, Placement::new(Vec2::new(8.0, 8.0), blue)).unwrap();
//!
//!     // Something that changes every frame goes through frame scratch.
//!     scene.push_clip(Rect::new(0.0, 0.0, 320.0, 240.0)).unwrap();
//!     let live = builder.build_path(&path).unwrap();
//!     scene.insert_path_with_mesh(live, Placement::default()).unwrap();
//!     scene.pop_clip();
//!
//!     for (instance, mesh) in scene.draw_list() {
//!         // A renderer would upload `mesh.vertex_bytes()` and draw here.
//!         let _ = (instance.draw_order, instance.clip, mesh.triangle_count());
//!     }
//! }
//!
//! assert_eq!(scene.stats().persistent_meshes, 1);
//! assert_eq!(scene.stats().frame_meshes, 1);
//! ```
//!
//! All operations run synchronously on the paint thread; nothing here locks.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod pool;
pub mod scene;

pub use config::{
    Capacities, MAX_CLIP_DEPTH, MAX_FRAME_MESHES, MAX_PATHS_PER_FRAME, MAX_PERSISTENT_MESHES,
};
pub use error::{PoolError, SceneError};
pub use pool::{FrameSlot, MeshPool, MeshRef, PersistentId, PoolStats};
pub use scene::{DrawOrder, FrameScene, FrameStats, Instance, Placement};

pub use understory_tess::Mesh;
