// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ear-clipping triangulation of one simple contour.
//!
//! ## Algorithm
//!
//! 1. Classify the contour's [`Winding`] by its shoelace area.
//! 2. Keep the contour's remaining vertex indices in a bounded array.
//! 3. Scan the array for the first *ear*: a vertex whose triangle with its two neighbours turns
//!    the same way as the contour and has no other remaining vertex inside it or on its
//!    boundary. Vertices at the same position as a corner do not count.
//! 4. Emit that triangle, remove the vertex (ordered removal, tail shifted left), repeat.
//! 5. Emit the last three vertices as the final triangle.
//!
//! When a scan finds no strict ear, the first *pass-through* vertex (collinear with its
//! neighbours and lying between them) is clipped instead as a zero-area triangle. Removing it
//! leaves the outline unchanged, so runs of collinear points never starve the search.
//! Collinear spikes, where the outline folds back on itself, are never clipped.
//!
//! ## Termination
//!
//! Every candidate examined counts against a bound of `n²` for an `n`-vertex contour. A scan
//! that finds nothing, or a run that exceeds the bound, fails with
//! [`TessError::EarClippingFailed`]. Simple polygons clip in at most `n²/2` candidates.
//!
//! Predicates are evaluated in `f64` to keep sign tests stable for `f32` input.

use alloc::vec::Vec;

use crate::error::TessError;
use crate::limits::{MAX_PATH_INDICES, MAX_PATH_VERTICES};
use crate::types::{Contour, Point, Winding};

/// Output of one [`Triangulator::triangulate`] call.
#[derive(Clone, Copy, Debug)]
pub struct Triangulation<'a> {
    /// Indices appended by this call: absolute into the point buffer, three per triangle.
    pub indices: &'a [u32],
    /// Winding detected for the contour. Every emitted triangle shares it.
    pub winding: Winding,
}

impl Triangulation<'_> {
    /// Number of triangles emitted.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Reusable ear-clipping triangulator.
///
/// Owns a remaining-vertex list sized for [`MAX_PATH_VERTICES`] and an index accumulation buffer
/// sized for [`MAX_PATH_INDICES`]. Neither ever grows; a contour that would not fit fails with a
/// capacity error before any work is done.
pub struct Triangulator {
    remaining: Vec<u32>,
    indices: Vec<u32>,
    max_vertices: usize,
    max_indices: usize,
}

impl core::fmt::Debug for Triangulator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Triangulator")
            .field("indices", &self.indices.len())
            .field("max_vertices", &self.max_vertices)
            .field("max_indices", &self.max_indices)
            .finish_non_exhaustive()
    }
}

impl Default for Triangulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Triangulator {
    /// Create a triangulator with the default capacity limits.
    pub fn new() -> Self {
        Self::with_limits(MAX_PATH_VERTICES, MAX_PATH_INDICES)
    }

    /// Create a triangulator with custom limits.
    ///
    /// # Panics
    ///
    /// Panics if `max_vertices < 3` or `max_indices < 3`.
    pub fn with_limits(max_vertices: usize, max_indices: usize) -> Self {
        assert!(max_vertices >= 3, "a triangulator must fit one triangle");
        assert!(max_indices >= 3, "a triangulator must fit one triangle");
        Self {
            remaining: Vec::with_capacity(max_vertices),
            indices: Vec::with_capacity(max_indices),
            max_vertices,
            max_indices,
        }
    }

    /// Vertex limit per contour.
    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    /// Index limit for the accumulation buffer.
    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    /// All indices accumulated since the last [`clear`](Self::clear).
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Drop accumulated indices, keeping the allocation.
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Triangulate one contour of `points`, appending `3 * (n - 2)` indices.
    ///
    /// Returns the appended slice and the detected winding. On error nothing is appended.
    pub fn triangulate(
        &mut self,
        points: &[Point],
        contour: Contour,
    ) -> Result<Triangulation<'_>, TessError> {
        let n = contour.len();
        if n < 3 {
            return Err(TessError::DegeneratePolygon { len: n });
        }
        if n > self.max_vertices {
            return Err(TessError::TooManyVertices {
                len: n,
                max: self.max_vertices,
            });
        }
        if contour.end as usize > points.len() {
            return Err(TessError::ContourOutOfBounds {
                end: contour.end as usize,
                len: points.len(),
            });
        }
        let wanted = self.indices.len() + 3 * (n - 2);
        if wanted > self.max_indices {
            return Err(TessError::TooManyIndices {
                len: wanted,
                max: self.max_indices,
            });
        }

        let winding = Winding::from_signed_area(signed_area(&points[contour.range()]));
        let first = self.indices.len();

        if n == 3 {
            self.indices
                .extend_from_slice(&[contour.start, contour.start + 1, contour.start + 2]);
        } else if let Err(e) = self.clip_ears(points, contour, winding) {
            self.indices.truncate(first);
            return Err(e);
        }

        Ok(Triangulation {
            indices: &self.indices[first..],
            winding,
        })
    }

    fn clip_ears(
        &mut self,
        points: &[Point],
        contour: Contour,
        winding: Winding,
    ) -> Result<(), TessError> {
        let n = contour.len();
        self.remaining.clear();
        self.remaining.extend(contour.start..contour.end);

        let max_iterations = n * n;
        let mut iterations = 0_usize;

        while self.remaining.len() > 3 {
            let m = self.remaining.len();
            let mut ear = None;
            let mut pass_through = None;
            for i in 0..m {
                iterations += 1;
                if iterations > max_iterations {
                    return Err(self.failed(iterations));
                }
                match self.classify(points, i, winding) {
                    Candidate::Ear => {
                        ear = Some(i);
                        break;
                    }
                    Candidate::PassThrough if pass_through.is_none() => pass_through = Some(i),
                    _ => {}
                }
            }
            let Some(i) = ear.or(pass_through) else {
                return Err(self.failed(iterations));
            };
            let prev = self.remaining[(i + m - 1) % m];
            let next = self.remaining[(i + 1) % m];
            self.indices.extend_from_slice(&[prev, self.remaining[i], next]);
            self.remaining.remove(i);
        }

        self.indices.extend_from_slice(&self.remaining);
        Ok(())
    }

    fn classify(&self, points: &[Point], i: usize, winding: Winding) -> Candidate {
        let m = self.remaining.len();
        let ip = self.remaining[(i + m - 1) % m];
        let iv = self.remaining[i];
        let inx = self.remaining[(i + 1) % m];
        let (a, b, c) = (
            points[ip as usize],
            points[iv as usize],
            points[inx as usize],
        );

        let turn = winding.sign() * orient(a, b, c);
        if turn < 0.0 {
            return Candidate::Reflex;
        }
        if turn == 0.0 {
            // Collinear: removable only when `b` lies on the segment from `a` to `c`.
            let along = (f64::from(b.x) - f64::from(a.x)) * (f64::from(c.x) - f64::from(b.x))
                + (f64::from(b.y) - f64::from(a.y)) * (f64::from(c.y) - f64::from(b.y));
            return if along >= 0.0 {
                Candidate::PassThrough
            } else {
                Candidate::Reflex
            };
        }

        let blocked = self.remaining.iter().any(|&j| {
            let p = points[j as usize];
            let corner = j == ip || j == iv || j == inx || p == a || p == b || p == c;
            !corner && covers(a, b, c, p, winding)
        });
        if blocked {
            Candidate::Blocked
        } else {
            Candidate::Ear
        }
    }

    fn failed(&self, iterations: usize) -> TessError {
        let remaining = self.remaining.len();
        #[cfg(debug_assertions)]
        log::debug!(
            "ear clipping gave up: {remaining} vertices remaining after {iterations} iterations"
        );
        TessError::EarClippingFailed {
            remaining,
            iterations,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Candidate {
    Ear,
    PassThrough,
    Blocked,
    Reflex,
}

/// Signed area of a closed polyline (shoelace formula), accumulated in `f64`.
///
/// Positive for counter-clockwise order in y-up coordinates.
pub fn signed_area(points: &[Point]) -> f64 {
    let Some(&last) = points.last() else {
        return 0.0;
    };
    let mut acc = 0.0_f64;
    let mut j = last;
    for &i in points {
        acc += f64::from(j.x) * f64::from(i.y) - f64::from(i.x) * f64::from(j.y);
        j = i;
    }
    0.5 * acc
}

/// Twice the signed area of triangle `(a, b, c)`; positive for a counter-clockwise turn.
#[inline]
fn orient(a: Point, b: Point, c: Point) -> f64 {
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    (f64::from(b.x) - ax) * (f64::from(c.y) - ay) - (f64::from(b.y) - ay) * (f64::from(c.x) - ax)
}

/// True if `p` lies inside triangle `(a, b, c)` wound as `winding`, boundary included.
///
/// Boundary points count: a reflex vertex on the diagonal `c -> a` blocks the ear.
#[inline]
fn covers(a: Point, b: Point, c: Point, p: Point, winding: Winding) -> bool {
    let s = winding.sign();
    s * orient(a, b, p) >= 0.0 && s * orient(b, c, p) >= 0.0 && s * orient(c, a, p) >= 0.0
}
