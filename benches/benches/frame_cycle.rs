// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use peniko::Color;
use understory_mesh_cache::{FrameScene, MeshPool, Placement};
use understory_tess::{Mesh, MeshBuilder, PathBuffer, Point};

fn icon(seed: u32) -> PathBuffer {
    let s = 8.0 + (seed % 16) as f32;
    let mut path = PathBuffer::new();
    path.push_contour([
        Point::new(0.0, 0.0),
        Point::new(s, 0.0),
        Point::new(s, s * 0.5),
        Point::new(s * 0.5, s * 0.5),
        Point::new(s * 0.5, s),
        Point::new(0.0, s),
    ])
    .unwrap();
    path
}

fn mesh(builder: &mut MeshBuilder, seed: u32) -> Mesh {
    builder.build_path(&icon(seed)).unwrap()
}

fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_pool");
    let mut builder = MeshBuilder::new();
    let template = mesh(&mut builder, 0);

    group.throughput(Throughput::Elements(256));
    group.bench_function("reset_and_fill_frame_store", |b| {
        let mut pool = MeshPool::new();
        b.iter(|| {
            pool.reset_frame();
            for _ in 0..256 {
                black_box(pool.allocate_frame(template.clone()).unwrap());
            }
        });
    });

    group.throughput(Throughput::Elements(512));
    group.bench_function("persistent_lookup_full_store", |b| {
        let mut pool = MeshPool::new();
        for h in 0..512_u64 {
            pool.get_or_create_persistent(template.clone(), h).unwrap();
        }
        b.iter(|| {
            for h in 0..512_u64 {
                black_box(pool.lookup_persistent(black_box(h)));
            }
        });
    });
    group.finish();
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_scene");
    let viewport = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    let mut builder = MeshBuilder::new();
    let icons: Vec<(u64, Mesh)> = (0..64)
        .map(|i| (icon(i).content_hash(), mesh(&mut builder, i)))
        .collect();
    let live = mesh(&mut builder, 7);

    // Mixed UI frame: cached icons, per-frame paths, and other primitives sharing draw order.
    group.throughput(Throughput::Elements(4096));
    group.bench_function("mixed_frame_4096", |b| {
        let mut scene = FrameScene::new();
        b.iter(|| {
            scene.begin_frame(viewport);
            for i in 0..4096_usize {
                let placement = Placement::new(
                    Vec2::new((i % 64) as f64 * 30.0, (i / 64) as f64 * 16.0),
                    Color::from_rgba8(40, 40, 40, 255),
                );
                match i % 4 {
                    0 | 1 => {
                        let (hash, m) = &icons[i % icons.len()];
                        let r = match scene.pool().lookup_persistent(*hash) {
                            Some(r) => r,
                            None => scene.cache_mesh(m.clone(), *hash).unwrap(),
                        };
                        let _ = scene.insert_path(r, placement);
                    }
                    2 if i % 16 == 2 => {
                        let _ = scene.insert_path_with_mesh(live.clone(), placement);
                    }
                    _ => {
                        black_box(scene.next_draw_order());
                    }
                }
            }
            black_box(scene.draw_list().count());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_pool, bench_scene);
criterion_main!(benches);
