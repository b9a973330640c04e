// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_tess::{Contour, MeshBuilder, PathBuffer, Point, Triangulator};

fn regular_polygon(n: usize, radius: f32) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let a = i as f32 / n as f32 * core::f32::consts::TAU;
            Point::new(radius * a.cos(), radius * a.sin())
        })
        .collect()
}

/// A star with `n` spikes: every other vertex is reflex.
fn star(n: usize, outer: f32, inner: f32) -> Vec<Point> {
    (0..2 * n)
        .map(|i| {
            let a = i as f32 / (2 * n) as f32 * core::f32::consts::TAU;
            let r = if i % 2 == 0 { outer } else { inner };
            Point::new(r * a.cos(), r * a.sin())
        })
        .collect()
}

/// A rounded-rectangle outline flattened into many collinear-heavy points.
fn rounded_rect_path() -> PathBuffer {
    let shape = kurbo::RoundedRect::new(0.0, 0.0, 240.0, 48.0, 12.0);
    let mut path = PathBuffer::new();
    let _ = path.push_bez_path(&kurbo::Shape::to_path(&shape, 0.1), 0.05);
    path
}

fn bench_convex(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate_convex");
    for &n in &[16_usize, 64, 256, 1024] {
        let points = regular_polygon(n, 100.0);
        let contour = Contour::new(0, n as u32);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n{n}"), |b| {
            let mut tri = Triangulator::new();
            b.iter(|| {
                tri.clear();
                let out = tri.triangulate(black_box(&points), contour).unwrap();
                black_box(out.indices.len());
            });
        });
    }
    group.finish();
}

fn bench_concave(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate_star");
    for &n in &[8_usize, 32, 128, 512] {
        let points = star(n, 100.0, 40.0);
        let contour = Contour::new(0, points.len() as u32);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("spikes{n}"), |b| {
            let mut tri = Triangulator::new();
            b.iter(|| {
                tri.clear();
                let out = tri.triangulate(black_box(&points), contour).unwrap();
                black_box(out.indices.len());
            });
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_build");
    let path = rounded_rect_path();
    group.throughput(Throughput::Elements(path.points().len() as u64));
    group.bench_function("rounded_rect", |b| {
        let mut builder = MeshBuilder::new();
        b.iter(|| {
            let mesh = builder.build_path(black_box(&path)).unwrap();
            black_box(mesh.triangle_count());
        });
    });
    group.bench_function("rounded_rect_flatten_and_build", |b| {
        let shape = kurbo::Shape::to_path(&kurbo::RoundedRect::new(0.0, 0.0, 240.0, 48.0, 12.0), 0.1);
        b.iter_batched(
            || (PathBuffer::new(), MeshBuilder::new()),
            |(mut path, mut builder)| {
                path.push_bez_path(black_box(&shape), 0.05).unwrap();
                black_box(builder.build_path(&path).unwrap());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_convex, bench_concave, bench_build);
criterion_main!(benches);
