// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessellation basics.
//!
//! Triangulate a concave contour, flatten Kurbo paths into one mesh, and show what
//! happens with malformed input.
//!
//! Run:
//! - `cargo run -p understory_examples --example tess_basics`

use kurbo::{BezPath, Circle, Shape};
use understory_tess::{Contour, MeshBuilder, PathBuffer, Point, TessError, Triangulator};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    // An L-shaped contour: one reflex vertex, four triangles.
    let l_shape = [
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(2.0, 1.0),
        Point::new(1.0, 1.0),
        Point::new(1.0, 2.0),
        Point::new(0.0, 2.0),
    ];
    let mut tri = Triangulator::new();
    let out = tri.triangulate(&l_shape, Contour::new(0, 6)).unwrap();
    println!(
        "L-shape: {} triangles, ccw = {}, indices = {:?}",
        out.triangle_count(),
        out.winding.is_ccw(),
        out.indices
    );
    assert_eq!(out.indices.len(), 12);

    // Flatten two shapes into one buffer; each closed subpath becomes a contour.
    let mut path = PathBuffer::new();
    let circle = Circle::new((50.0, 50.0), 20.0).to_path(0.1);
    let mut tab = BezPath::new();
    tab.move_to((100.0, 40.0));
    tab.line_to((140.0, 40.0));
    tab.quad_to((150.0, 50.0), (140.0, 60.0));
    tab.line_to((100.0, 60.0));
    tab.close_path();
    let added = path.push_bez_path(&circle, 0.25).unwrap() + path.push_bez_path(&tab, 0.25).unwrap();
    println!(
        "flattened {added} contours into {} points",
        path.points().len()
    );

    let mut builder = MeshBuilder::new();
    let mesh = builder.build_path(&path).unwrap();
    println!(
        "mesh: {} vertices, {} triangles, bounds {:?}, {} vertex bytes",
        mesh.vertices().len(),
        mesh.triangle_count(),
        mesh.bounds().to_rect(),
        mesh.vertex_bytes().len()
    );
    println!("content hash: {:#018x}", path.content_hash());

    // Malformed input fails per path; a renderer would skip it and keep drawing.
    let two = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
    assert_eq!(
        tri.triangulate(&two, Contour::new(0, 2)).unwrap_err(),
        TessError::DegeneratePolygon { len: 2 }
    );
    let folded = [
        Point::new(0.0, 0.0),
        Point::new(3.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(4.0, 0.0),
    ];
    match builder.build(&folded, &[Contour::new(0, 4)]) {
        Ok(mesh) => println!("unexpected mesh with {} triangles", mesh.triangle_count()),
        Err(err) => println!("skipped path: {err}"),
    }
}
