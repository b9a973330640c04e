// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame mesh cache.
//!
//! Run a few frames of an immediate-mode paint loop: static icons are tessellated once and
//! cached by content hash, a live sparkline is rebuilt each frame into frame scratch, and a
//! rect primitive shares the draw-order counter with the paths.
//!
//! Run:
//! - `cargo run -p understory_examples --example frame_mesh_cache`

use kurbo::{Rect, Vec2};
use peniko::Color;
use understory_mesh_cache::{Capacities, FrameScene, MeshRef, Placement};
use understory_tess::{MeshBuilder, PathBuffer, Point};

fn chevron() -> PathBuffer {
    let mut path = PathBuffer::new();
    path.push_contour([
        Point::new(0.0, 0.0),
        Point::new(6.0, 0.0),
        Point::new(12.0, 8.0),
        Point::new(6.0, 16.0),
        Point::new(0.0, 16.0),
        Point::new(6.0, 8.0),
    ])
    .unwrap();
    path
}

/// A filled area chart whose top edge moves every frame.
fn sparkline(frame: u32) -> PathBuffer {
    let mut points = vec![Point::new(0.0, 40.0)];
    for i in 0..=20_u32 {
        let phase = (i + frame) as f32 * 0.6;
        points.push(Point::new(i as f32 * 5.0, 20.0 + 10.0 * phase.sin()));
    }
    points.push(Point::new(100.0, 40.0));
    let mut path = PathBuffer::new();
    path.push_contour(points).unwrap();
    path
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    // Room for the icons only: the chart is dropped each frame and the drop is logged.
    let mut scene = FrameScene::with_capacities(Capacities {
        instances: 10,
        ..Capacities::default()
    });
    let mut builder = MeshBuilder::new();
    let icon = chevron();
    let icon_hash = icon.content_hash();
    let grey = Color::from_rgba8(90, 90, 90, 255);
    let accent = Color::from_rgba8(30, 120, 220, 255);

    for frame in 0..3 {
        scene.begin_frame(Rect::new(0.0, 0.0, 320.0, 200.0));

        // Background rect drawn by some other primitive pipeline.
        let background = scene.next_draw_order();

        // Toolbar icons: only the first frame tessellates.
        let cached = match scene.pool().lookup_persistent(icon_hash) {
            Some(r) => r,
            None => {
                let mesh = builder.build_path(&icon).unwrap();
                scene.cache_mesh(mesh, icon_hash).unwrap()
            }
        };
        for i in 0..10 {
            let placement = Placement::new(Vec2::new(8.0 + i as f64 * 20.0, 8.0), grey);
            if let Err(err) = scene.insert_path(cached, placement) {
                println!("frame {frame}: icon {i} skipped: {err}");
            }
        }

        // A chart clipped to its panel.
        scene.push_clip(Rect::new(10.0, 40.0, 90.0, 100.0)).unwrap();
        match builder.build_path(&sparkline(frame)) {
            Ok(mesh) => {
                let placement = Placement::new(Vec2::new(10.0, 50.0), accent);
                if let Err(err) = scene.insert_path_with_mesh(mesh, placement) {
                    println!("frame {frame}: chart skipped: {err}");
                }
            }
            Err(err) => println!("frame {frame}: chart not tessellated: {err}"),
        }
        scene.pop_clip();

        // The renderer walks the list in draw order.
        println!("frame {frame}: background at {background:?}");
        for (instance, mesh) in scene.draw_list() {
            let kind = match instance.mesh {
                MeshRef::Persistent(_) => "cached",
                MeshRef::Frame(_) => "scratch",
            };
            println!(
                "  #{:<3} {kind:<7} {:>3} tris at {:?} clip {:?}",
                instance.draw_order.get(),
                mesh.triangle_count(),
                instance.placement.offset,
                instance.clip
            );
        }
        println!("  {:?}", scene.stats());
    }

    println!("pool: {:?}", scene.pool().stats());
}
