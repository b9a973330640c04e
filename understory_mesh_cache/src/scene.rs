// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame instance list: draw order, clip snapshots, and the mesh pool behind them.

use alloc::vec::Vec;

use kurbo::{Affine, Rect, Vec2};
use peniko::Color;
use understory_tess::Mesh;

use crate::config::Capacities;
use crate::error::SceneError;
use crate::pool::{MeshPool, MeshRef};

/// Position of a primitive in the frame's back-to-front submission order.
///
/// Tokens come from one counter per frame shared by every primitive kind, so paths interleave
/// correctly with rects, text, and anything else the renderer draws. Higher is drawn later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawOrder(pub(crate) u64);

impl DrawOrder {
    /// Raw token value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Caller-provided part of an [`Instance`]: where and in what color to draw a mesh.
#[derive(Copy, Clone, Debug)]
pub struct Placement {
    /// Translation applied after scaling.
    pub offset: Vec2,
    /// Per-axis scale.
    pub scale: Vec2,
    /// Fill color.
    pub color: Color,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            color: Color::WHITE,
        }
    }
}

impl Placement {
    /// Unscaled placement at `offset`.
    pub fn new(offset: Vec2, color: Color) -> Self {
        Self {
            offset,
            color,
            ..Self::default()
        }
    }

    /// Replace the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Mesh-to-scene transform: scale, then translate.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

/// One mesh drawn once in the current frame.
#[derive(Copy, Clone, Debug)]
pub struct Instance {
    /// Mesh to draw.
    pub mesh: MeshRef,
    /// Placement and fill.
    pub placement: Placement,
    /// Clip rectangle in effect when the instance was inserted.
    pub clip: Rect,
    /// Submission order within the frame.
    pub draw_order: DrawOrder,
}

/// Counters for the current frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames begun so far.
    pub frame: u64,
    /// Instances in the list.
    pub instances: usize,
    /// Instances dropped this frame because a list or store was full.
    pub dropped_instances: usize,
    /// Frame-scratch meshes allocated this frame.
    pub frame_meshes: usize,
    /// Persistent meshes held.
    pub persistent_meshes: usize,
}

/// The per-frame scene a paint pass fills and a renderer consumes.
///
/// A frame starts with [`FrameScene::begin_frame`], which resets the frame-scratch store, the
/// instance list, the draw-order counter, and the clip stack together. Inserts then append
/// [`Instance`]s in draw order until the renderer walks [`FrameScene::draw_list`].
///
/// Every container is sized once. A full instance list drops the new instance and reports
/// [`SceneError::InstanceListFull`]; the rest of the frame is unaffected.
pub struct FrameScene {
    pool: MeshPool,
    instances: Vec<Instance>,
    clips: Vec<Rect>,
    viewport: Rect,
    next_order: u64,
    frame: u64,
    dropped: usize,
    capacities: Capacities,
}

impl core::fmt::Debug for FrameScene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameScene")
            .field("frame", &self.frame)
            .field("instances", &self.instances.len())
            .field("clip_depth", &self.clips.len())
            .field("viewport", &self.viewport)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Default for FrameScene {
    fn default() -> Self {
        Self::with_capacities(Capacities::default())
    }
}

impl FrameScene {
    /// Create a scene with the default capacities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene with custom capacities.
    ///
    /// Panics if any capacity is zero.
    pub fn with_capacities(capacities: Capacities) -> Self {
        capacities.validate();
        Self {
            pool: MeshPool::with_capacities(capacities),
            instances: Vec::with_capacity(capacities.instances),
            clips: Vec::with_capacity(capacities.clip_depth),
            viewport: Rect::ZERO,
            next_order: 0,
            frame: 0,
            dropped: 0,
            capacities,
        }
    }

    /// Start a frame covering `viewport`, which becomes the base clip.
    ///
    /// Invalidates every frame-scratch [`MeshRef`] and every instance from the previous frame.
    /// Persistent meshes are kept.
    pub fn begin_frame(&mut self, viewport: Rect) {
        if self.dropped > 0 {
            log::warn!(
                "frame {} dropped {} path instances",
                self.frame,
                self.dropped
            );
        }
        self.pool.reset_frame();
        self.instances.clear();
        self.clips.clear();
        self.viewport = viewport;
        self.next_order = 0;
        self.dropped = 0;
        self.frame += 1;
    }

    /// Take the next draw-order token.
    ///
    /// Path inserts take theirs automatically; other primitive kinds call this so they sort
    /// against paths.
    pub fn next_draw_order(&mut self) -> DrawOrder {
        let order = DrawOrder(self.next_order);
        self.next_order += 1;
        order
    }

    /// Narrow the clip to its intersection with `rect`.
    pub fn push_clip(&mut self, rect: Rect) -> Result<(), SceneError> {
        if self.clips.len() == self.capacities.clip_depth {
            return Err(SceneError::ClipStackOverflow {
                capacity: self.capacities.clip_depth,
            });
        }
        let clip = self.current_clip().intersect(rect);
        self.clips.push(clip);
        Ok(())
    }

    /// Restore the clip in effect before the matching [`FrameScene::push_clip`].
    ///
    /// Returns the removed clip, or `None` when only the viewport is left.
    pub fn pop_clip(&mut self) -> Option<Rect> {
        self.clips.pop()
    }

    /// Clip that the next insert will snapshot.
    pub fn current_clip(&self) -> Rect {
        self.clips.last().copied().unwrap_or(self.viewport)
    }

    /// Append an instance of an already pooled mesh.
    ///
    /// Stamps the next draw-order token and copies the current clip by value; later clip changes
    /// do not affect it. When the list is full the instance is dropped and no token is consumed.
    pub fn insert_path(
        &mut self,
        mesh: MeshRef,
        placement: Placement,
    ) -> Result<DrawOrder, SceneError> {
        self.check_instance_capacity()?;
        let draw_order = self.next_draw_order();
        self.instances.push(Instance {
            mesh,
            placement,
            clip: self.current_clip(),
            draw_order,
        });
        Ok(draw_order)
    }

    /// Draw a mesh that is only needed this frame.
    ///
    /// The mesh goes into frame scratch and is then inserted as with
    /// [`FrameScene::insert_path`]. Capacity is checked before a scratch slot is taken.
    pub fn insert_path_with_mesh(
        &mut self,
        mesh: Mesh,
        placement: Placement,
    ) -> Result<DrawOrder, SceneError> {
        self.check_instance_capacity()?;
        let mesh = self.pool.allocate_frame(mesh).map_err(|err| self.drop_instance(err))?;
        self.insert_path(mesh, placement)
    }

    /// Cache `mesh` under `hash` in the persistent store.
    ///
    /// When the persistent store is full the mesh goes into frame scratch instead, for this frame
    /// only. Use [`MeshPool::lookup_persistent`] through [`FrameScene::pool`] first to skip
    /// building meshes that are already cached.
    pub fn cache_mesh(&mut self, mesh: Mesh, hash: u64) -> Result<MeshRef, SceneError> {
        Ok(self.pool.cache_or_allocate_frame(mesh, hash)?)
    }

    /// Draw a mesh cached by content hash.
    ///
    /// Combines [`FrameScene::cache_mesh`] and [`FrameScene::insert_path`]; a persistent hit
    /// discards `mesh`.
    pub fn insert_cached_path(
        &mut self,
        mesh: Mesh,
        hash: u64,
        placement: Placement,
    ) -> Result<DrawOrder, SceneError> {
        self.check_instance_capacity()?;
        let mesh = self
            .pool
            .cache_or_allocate_frame(mesh, hash)
            .map_err(|err| self.drop_instance(err))?;
        self.insert_path(mesh, placement)
    }

    /// Instances of the current frame, in draw order.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Instances paired with their meshes, in draw order.
    pub fn draw_list(&self) -> impl Iterator<Item = (&Instance, &Mesh)> + '_ {
        self.instances
            .iter()
            .map(|instance| (instance, self.pool.get_mesh(instance.mesh)))
    }

    /// The mesh pool.
    pub fn pool(&self) -> &MeshPool {
        &self.pool
    }

    /// Store a mesh in this frame's scratch store without drawing it.
    pub fn allocate_frame(&mut self, mesh: Mesh) -> Result<MeshRef, SceneError> {
        Ok(self.pool.allocate_frame(mesh)?)
    }

    /// Store a mesh in the persistent store without drawing it, or return the existing entry
    /// for `hash`.
    ///
    /// Unlike [`FrameScene::cache_mesh`] a full store is an error, not a frame fallback.
    pub fn get_or_create_persistent(
        &mut self,
        mesh: Mesh,
        hash: u64,
    ) -> Result<MeshRef, SceneError> {
        Ok(self.pool.get_or_create_persistent(mesh, hash)?)
    }

    /// Drop every persistent mesh, and every instance of this frame that referenced one.
    pub fn clear_persistent(&mut self) {
        self.pool.clear_persistent();
        let before = self.instances.len();
        self.instances.retain(|i| !i.mesh.is_persistent());
        let removed = before - self.instances.len();
        if removed > 0 {
            log::debug!("removed {removed} instances of cleared persistent meshes");
        }
    }

    /// Counters for the current frame.
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frame: self.frame,
            instances: self.instances.len(),
            dropped_instances: self.dropped,
            frame_meshes: self.pool.frame_len(),
            persistent_meshes: self.pool.persistent_len(),
        }
    }

    /// Capacities this scene was created with.
    pub fn capacities(&self) -> Capacities {
        self.capacities
    }

    fn check_instance_capacity(&mut self) -> Result<(), SceneError> {
        if self.instances.len() < self.capacities.instances {
            return Ok(());
        }
        Err(self.drop_instance(SceneError::InstanceListFull {
            capacity: self.capacities.instances,
        }))
    }

    fn drop_instance(&mut self, err: impl Into<SceneError>) -> SceneError {
        let err = err.into();
        self.dropped += 1;
        log::debug!("dropping path instance in frame {}: {err}", self.frame);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoolError;
    use crate::pool::FrameSlot;
    use understory_tess::{Contour, MeshBuilder, Point};

    fn triangle(dx: f32) -> Mesh {
        let p = [
            Point::new(dx, 0.0),
            Point::new(dx + 1.0, 0.0),
            Point::new(dx, 1.0),
        ];
        MeshBuilder::new().build(&p, &[Contour::new(0, 3)]).unwrap()
    }

    fn scene(instances: usize) -> FrameScene {
        let mut s = FrameScene::with_capacities(Capacities {
            instances,
            ..Capacities::default()
        });
        s.begin_frame(Rect::new(0.0, 0.0, 800.0, 600.0));
        s
    }

    #[test]
    fn draw_order_is_shared_and_monotonic() {
        let mut s = scene(16);
        let a = s.insert_path_with_mesh(triangle(0.0), Placement::default()).unwrap();
        let rect = s.next_draw_order();
        let b = s.insert_path_with_mesh(triangle(1.0), Placement::default()).unwrap();
        assert!(a < rect && rect < b);
        assert_eq!((a.get(), rect.get(), b.get()), (0, 1, 2));

        s.begin_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(s.next_draw_order().get(), 0);
    }

    #[test]
    fn clip_is_copied_by_value() {
        let mut s = scene(16);
        s.push_clip(Rect::new(10.0, 10.0, 100.0, 100.0)).unwrap();
        s.insert_path_with_mesh(triangle(0.0), Placement::default()).unwrap();
        s.pop_clip();
        s.push_clip(Rect::new(50.0, 50.0, 60.0, 60.0)).unwrap();
        s.insert_path_with_mesh(triangle(0.0), Placement::default()).unwrap();
        s.pop_clip();
        s.insert_path_with_mesh(triangle(0.0), Placement::default()).unwrap();

        let clips: Vec<Rect> = s.instances().iter().map(|i| i.clip).collect();
        assert_eq!(
            clips,
            [
                Rect::new(10.0, 10.0, 100.0, 100.0),
                Rect::new(50.0, 50.0, 60.0, 60.0),
                Rect::new(0.0, 0.0, 800.0, 600.0),
            ]
        );
    }

    #[test]
    fn nested_clips_intersect() {
        let mut s = scene(16);
        s.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        s.push_clip(Rect::new(50.0, -20.0, 300.0, 80.0)).unwrap();
        assert_eq!(s.current_clip(), Rect::new(50.0, 0.0, 100.0, 80.0));
        assert_eq!(s.pop_clip(), Some(Rect::new(50.0, 0.0, 100.0, 80.0)));
        assert_eq!(s.current_clip(), Rect::new(0.0, 0.0, 100.0, 100.0));
        s.pop_clip();
        assert_eq!(s.pop_clip(), None);
        assert_eq!(s.current_clip(), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn clip_stack_is_bounded() {
        let mut s = FrameScene::with_capacities(Capacities {
            clip_depth: 2,
            ..Capacities::default()
        });
        s.begin_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        s.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0)).unwrap();
        s.push_clip(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
        assert_eq!(
            s.push_clip(Rect::new(0.0, 0.0, 3.0, 3.0)),
            Err(SceneError::ClipStackOverflow { capacity: 2 })
        );
        assert_eq!(s.current_clip(), Rect::new(0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn full_instance_list_drops_the_extra_instance() {
        let mut s = scene(crate::MAX_PATHS_PER_FRAME);
        let mesh = s.cache_mesh(triangle(0.0), 1).unwrap();
        for i in 0..crate::MAX_PATHS_PER_FRAME {
            let placement = Placement::new(Vec2::new(i as f64, 0.0), Color::WHITE);
            s.insert_path(mesh, placement).unwrap();
        }
        let extra = Placement::new(Vec2::new(-1.0, 0.0), Color::BLACK);
        assert_eq!(
            s.insert_path(mesh, extra),
            Err(SceneError::InstanceListFull {
                capacity: crate::MAX_PATHS_PER_FRAME
            })
        );
        assert_eq!(s.instances().len(), crate::MAX_PATHS_PER_FRAME);
        for (i, instance) in s.instances().iter().enumerate() {
            assert_eq!(instance.placement.offset.x, i as f64);
            assert_eq!(instance.draw_order.get(), i as u64);
        }
        assert_eq!(s.stats().dropped_instances, 1);
        // The failed insert consumed no token.
        assert_eq!(s.next_draw_order().get(), crate::MAX_PATHS_PER_FRAME as u64);
    }

    #[test]
    fn full_list_does_not_take_a_scratch_slot() {
        let mut s = scene(1);
        s.insert_path_with_mesh(triangle(0.0), Placement::default()).unwrap();
        assert!(s.insert_path_with_mesh(triangle(1.0), Placement::default()).is_err());
        assert_eq!(s.pool().frame_len(), 1);
    }

    #[test]
    fn full_frame_store_drops_the_draw() {
        let mut s = FrameScene::with_capacities(Capacities {
            frame_meshes: 1,
            ..Capacities::default()
        });
        s.begin_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        s.insert_path_with_mesh(triangle(0.0), Placement::default()).unwrap();
        assert_eq!(
            s.insert_path_with_mesh(triangle(1.0), Placement::default()),
            Err(SceneError::Pool(PoolError::FrameMeshPoolFull { capacity: 1 }))
        );
        assert_eq!(s.instances().len(), 1);
        assert_eq!(s.stats().dropped_instances, 1);
    }

    #[test]
    fn cached_paths_survive_frames() {
        let mut s = scene(16);
        s.insert_cached_path(triangle(0.0), 99, Placement::default()).unwrap();
        s.begin_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        let hit = s.pool().lookup_persistent(99).unwrap();
        s.insert_path(hit, Placement::default()).unwrap();
        s.insert_cached_path(triangle(5.0), 99, Placement::default()).unwrap();
        assert_eq!(s.stats().persistent_meshes, 1);
        for (instance, mesh) in s.draw_list() {
            assert_eq!(instance.mesh, hit);
            assert_eq!(mesh, &triangle(0.0));
        }
    }

    #[test]
    fn full_persistent_store_falls_back_for_one_frame() {
        let mut s = FrameScene::with_capacities(Capacities {
            persistent_meshes: 1,
            ..Capacities::default()
        });
        s.begin_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        s.insert_cached_path(triangle(0.0), 1, Placement::default()).unwrap();
        s.insert_cached_path(triangle(1.0), 2, Placement::default()).unwrap();
        let refs: Vec<MeshRef> = s.instances().iter().map(|i| i.mesh).collect();
        assert!(refs[0].is_persistent());
        assert_eq!(refs[1], MeshRef::Frame(FrameSlot(0)));
        let meshes: Vec<&Mesh> = s.draw_list().map(|(_, m)| m).collect();
        assert_eq!(meshes[1], &triangle(1.0));
    }

    #[test]
    fn begin_frame_resets_frame_state_only() {
        let mut s = scene(16);
        s.push_clip(Rect::new(1.0, 1.0, 2.0, 2.0)).unwrap();
        s.insert_path_with_mesh(triangle(0.0), Placement::default()).unwrap();
        s.cache_mesh(triangle(1.0), 3).unwrap();
        s.begin_frame(Rect::new(0.0, 0.0, 50.0, 50.0));
        let stats = s.stats();
        assert_eq!(stats.frame, 2);
        assert_eq!(stats.instances, 0);
        assert_eq!(stats.frame_meshes, 0);
        assert_eq!(stats.persistent_meshes, 1);
        assert_eq!(s.current_clip(), Rect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn clear_persistent_removes_dependent_instances() {
        let mut s = scene(16);
        s.insert_cached_path(triangle(0.0), 1, Placement::default()).unwrap();
        s.insert_path_with_mesh(triangle(1.0), Placement::default()).unwrap();
        s.clear_persistent();
        assert_eq!(s.instances().len(), 1);
        assert!(!s.instances()[0].mesh.is_persistent());
        assert_eq!(s.draw_list().count(), 1);
        assert_eq!(s.pool().lookup_persistent(1), None);
    }

    #[test]
    fn pool_entries_added_through_the_scene_stay_drawable() {
        let mut s = scene(16);
        let cached = s.get_or_create_persistent(triangle(0.0), 9).unwrap();
        let scratch = s.allocate_frame(triangle(2.0)).unwrap();
        assert_eq!(s.get_or_create_persistent(triangle(5.0), 9).unwrap(), cached);
        s.insert_path(cached, Placement::default()).unwrap();
        s.insert_path(scratch, Placement::default()).unwrap();

        s.clear_persistent();
        let drawn: Vec<_> = s.draw_list().map(|(i, m)| (i.mesh, m.bounds().min)).collect();
        assert_eq!(drawn, [(scratch, Point::new(2.0, 0.0))]);
        assert_eq!(s.stats().persistent_meshes, 0);
    }

    #[test]
    fn full_persistent_store_is_an_error_without_fallback() {
        let mut s = FrameScene::with_capacities(Capacities {
            persistent_meshes: 1,
            ..Capacities::default()
        });
        s.begin_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
        s.get_or_create_persistent(triangle(0.0), 1).unwrap();
        assert!(matches!(
            s.get_or_create_persistent(triangle(1.0), 2),
            Err(SceneError::Pool(PoolError::MeshPoolFull { .. }))
        ));
        assert_eq!(s.stats().frame_meshes, 0);
    }

    #[test]
    fn placement_keeps_color_and_transform() {
        let mut s = scene(4);
        let red = Color::from_rgba8(255, 0, 0, 255);
        let placement =
            Placement::new(Vec2::new(10.0, 20.0), red).with_scale(Vec2::new(2.0, 3.0));
        s.insert_path_with_mesh(triangle(0.0), placement).unwrap();
        let stored = s.instances()[0].placement;
        assert_eq!(stored.color.components, red.components);
        let p = stored.transform() * kurbo::Point::new(1.0, 1.0);
        assert_eq!(p, kurbo::Point::new(12.0, 23.0));
    }

    #[test]
    fn containers_never_grow() {
        let mut s = FrameScene::with_capacities(Capacities {
            instances: 8,
            frame_meshes: 4,
            clip_depth: 2,
            ..Capacities::default()
        });
        let caps = (s.instances.capacity(), s.clips.capacity());
        for frame in 0..5 {
            s.begin_frame(Rect::new(0.0, 0.0, 10.0, 10.0));
            for i in 0..20 {
                let _ = s.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
                let _ = s.insert_path_with_mesh(triangle(i as f32), Placement::default());
                let _ = s.insert_cached_path(triangle(0.0), frame, Placement::default());
            }
        }
        assert_eq!(caps, (s.instances.capacity(), s.clips.capacity()));
        assert_eq!(s.instances().len(), 8);
    }
}
