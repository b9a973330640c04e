// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded point buffer and contour list for one flattened path.

use alloc::vec::Vec;

use kurbo::{BezPath, PathEl};

use crate::error::TessError;
use crate::limits::{MAX_PATH_CONTOURS, MAX_PATH_VERTICES};
use crate::types::{Contour, Point};

/// The flattened form of one path: a shared point buffer plus the contours that index into it.
///
/// Both buffers are sized at construction and never grow; appends past capacity fail and leave
/// the buffer as it was before the call. Reuse one `PathBuffer` across paths with
/// [`clear`](Self::clear).
pub struct PathBuffer {
    points: Vec<Point>,
    contours: Vec<Contour>,
    max_points: usize,
    max_contours: usize,
}

impl core::fmt::Debug for PathBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PathBuffer")
            .field("points", &self.points.len())
            .field("contours", &self.contours)
            .field("max_points", &self.max_points)
            .field("max_contours", &self.max_contours)
            .finish()
    }
}

impl Default for PathBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuffer {
    /// Create a buffer with the default limits.
    pub fn new() -> Self {
        Self::with_limits(MAX_PATH_VERTICES, MAX_PATH_CONTOURS)
    }

    /// Create a buffer holding at most `max_points` points and `max_contours` contours.
    ///
    /// # Panics
    ///
    /// Panics if either limit is zero, or if `max_points` does not fit a `u32` index.
    pub fn with_limits(max_points: usize, max_contours: usize) -> Self {
        assert!(max_points > 0, "point capacity must be non-zero");
        assert!(max_contours > 0, "contour capacity must be non-zero");
        assert!(
            u32::try_from(max_points).is_ok(),
            "point indices are 32-bit"
        );
        Self {
            points: Vec::with_capacity(max_points),
            contours: Vec::with_capacity(max_contours),
            max_points,
            max_contours,
        }
    }

    /// The point buffer.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The contours, in insertion order.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// True if no contour has been added.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Forget all points and contours, keeping the allocations.
    pub fn clear(&mut self) {
        self.points.clear();
        self.contours.clear();
    }

    /// Append one closed contour.
    ///
    /// The contour is implicitly closed; do not repeat the first point at the end.
    pub fn push_contour<I>(&mut self, points: I) -> Result<Contour, TessError>
    where
        I: IntoIterator<Item = Point>,
    {
        let start = self.points.len();
        for p in points {
            if let Err(e) = self.push_point(p) {
                self.points.truncate(start);
                return Err(e);
            }
        }
        let len = self.points.len() - start;
        if len < 3 {
            self.points.truncate(start);
            return Err(TessError::DegeneratePolygon { len });
        }
        if self.contours.len() >= self.max_contours {
            self.points.truncate(start);
            return Err(TessError::TooManyContours {
                max: self.max_contours,
            });
        }
        let contour = Contour::new(index(start), index(self.points.len()));
        self.contours.push(contour);
        Ok(contour)
    }

    /// Flatten `path` with [`kurbo::flatten`] and append each subpath as a contour.
    ///
    /// Open subpaths are closed implicitly, an explicit closing point equal to the start is
    /// dropped, and subpaths with fewer than three points are skipped. Returns the number of
    /// contours appended. On error the buffer is left unchanged.
    pub fn push_bez_path(&mut self, path: &BezPath, tolerance: f64) -> Result<usize, TessError> {
        let points_mark = self.points.len();
        let contours_mark = self.contours.len();
        let mut start = points_mark;
        let mut error = None;

        kurbo::flatten(path.iter(), tolerance, |el| {
            if error.is_some() {
                return;
            }
            let res = match el {
                PathEl::MoveTo(p) => self
                    .finish_subpath(&mut start)
                    .and_then(|()| self.push_point(p.into())),
                PathEl::LineTo(p) => self.push_point(p.into()),
                PathEl::ClosePath => self.finish_subpath(&mut start),
                // `flatten` only emits moves, lines and closes.
                _ => Ok(()),
            };
            if let Err(e) = res {
                error = Some(e);
            }
        });

        let res = match error {
            Some(e) => Err(e),
            None => self.finish_subpath(&mut start),
        };
        match res {
            Ok(()) => Ok(self.contours.len() - contours_mark),
            Err(e) => {
                self.points.truncate(points_mark);
                self.contours.truncate(contours_mark);
                Err(e)
            }
        }
    }

    /// Hash of the buffer's content, suitable as a persistent mesh key.
    pub fn content_hash(&self) -> u64 {
        content_hash(&self.points, &self.contours)
    }

    fn push_point(&mut self, p: Point) -> Result<(), TessError> {
        if self.points.len() >= self.max_points {
            return Err(TessError::TooManyVertices {
                len: self.points.len() + 1,
                max: self.max_points,
            });
        }
        self.points.push(p);
        Ok(())
    }

    /// Close the subpath that began at `*start` and start a new one at the current end.
    fn finish_subpath(&mut self, start: &mut usize) -> Result<(), TessError> {
        let mut end = self.points.len();
        if end - *start >= 2 && self.points[end - 1] == self.points[*start] {
            self.points.pop();
            end -= 1;
        }
        if end - *start < 3 {
            self.points.truncate(*start);
        } else {
            if self.contours.len() >= self.max_contours {
                return Err(TessError::TooManyContours {
                    max: self.max_contours,
                });
            }
            self.contours.push(Contour::new(index(*start), index(end)));
        }
        *start = self.points.len();
        Ok(())
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Buffer capacity is checked against u32 at construction."
)]
const fn index(i: usize) -> u32 {
    i as u32
}

/// Deterministic 64-bit hash over the bit patterns of `points` and the `contours` ranges.
///
/// Bit-identical input always hashes the same, across runs and platforms. Use it to key the
/// persistent mesh store by content rather than by identity.
pub fn content_hash(points: &[Point], contours: &[Contour]) -> u64 {
    let mut h = 0xCBF2_9CE4_8422_2325_u64;
    h = mix(h, points.len() as u64);
    for p in points {
        h = mix(h, (u64::from(p.x.to_bits()) << 32) | u64::from(p.y.to_bits()));
    }
    h = mix(h, contours.len() as u64);
    for c in contours {
        h = mix(h, (u64::from(c.start) << 32) | u64::from(c.end));
    }
    // Final avalanche so nearby inputs spread over the whole key space.
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h
}

#[inline]
fn mix(h: u64, v: u64) -> u64 {
    (h ^ v.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .rotate_left(27)
        .wrapping_mul(0xD6E8_FEB8_6659_FD93)
}
