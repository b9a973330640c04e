// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mesh assembly: point buffer + contours → [`Mesh`].

use alloc::vec::Vec;

use crate::error::TessError;
use crate::limits::MAX_PATH_VERTICES;
use crate::path::PathBuffer;
use crate::triangulate::Triangulator;
use crate::types::{Bounds, Contour, Point, Vertex};

/// An immutable triangle mesh for one path.
///
/// Indices are `u32`, three per triangle, and reference [`Mesh::vertices`] directly. The mesh
/// owns no external resources; dropping it only frees its two buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    bounds: Bounds,
}

impl Mesh {
    /// Vertex data.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index data, three per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Bounds of all vertices.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Vertex data as bytes, ready for a vertex buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as bytes, ready for an index buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Builds [`Mesh`]es, reusing one [`Triangulator`] across builds.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    triangulator: Triangulator,
}

impl MeshBuilder {
    /// Create a builder with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder around a triangulator with custom limits.
    pub fn with_triangulator(triangulator: Triangulator) -> Self {
        Self { triangulator }
    }

    /// Build one mesh from a point buffer and the contours indexing into it.
    ///
    /// Every point in `points` becomes a vertex (indices stay absolute, no renumbering). Each
    /// contour is triangulated independently and the index lists are concatenated in contour
    /// order. Triangulation errors are returned as-is.
    ///
    /// Bounds and UVs cover only the points the contours reference; a point outside every
    /// contour still gets a vertex, with a UV relative to those bounds.
    ///
    /// The point buffer is limited by the triangulator's
    /// [`max_vertices`](Triangulator::max_vertices), which is [`MAX_PATH_VERTICES`] by default.
    pub fn build(&mut self, points: &[Point], contours: &[Contour]) -> Result<Mesh, TessError> {
        if contours.is_empty() {
            return Err(TessError::DegeneratePolygon { len: 0 });
        }
        let max = self.triangulator.max_vertices();
        if points.len() > max {
            return Err(TessError::TooManyVertices {
                len: points.len(),
                max,
            });
        }

        self.triangulator.clear();
        for &contour in contours {
            self.triangulator.triangulate(points, contour)?;
        }

        // Ranges were checked against `points` by the triangulator.
        let bounds = contours.iter().fold(Bounds::EMPTY, |b, c| {
            b.union(&Bounds::from_points(&points[c.range()]))
        });
        let du = bounds.width().max(1.0);
        let dv = bounds.height().max(1.0);
        let mut vertices = Vec::with_capacity(points.len());
        vertices.extend(points.iter().map(|p| Vertex {
            position: [p.x, p.y],
            uv: [(p.x - bounds.min.x) / du, (p.y - bounds.min.y) / dv],
        }));

        Ok(Mesh {
            vertices,
            indices: self.triangulator.indices().to_vec(),
            bounds,
        })
    }

    /// Build one mesh from a [`PathBuffer`].
    pub fn build_path(&mut self, path: &PathBuffer) -> Result<Mesh, TessError> {
        self.build(path.points(), path.contours())
    }
}
