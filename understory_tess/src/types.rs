// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: points, contour ranges, bounds, and mesh vertices.

use core::ops::Range;

use bytemuck::{Pod, Zeroable};

/// A 2D coordinate in path space.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Mesh data is single precision; path space is expected to fit in f32."
    )]
    fn from(p: kurbo::Point) -> Self {
        Self {
            x: p.x as f32,
            y: p.y as f32,
        }
    }
}

/// A half-open range `[start, end)` of a shared point buffer forming one closed polyline.
///
/// The last point connects back to the first; the buffer should not repeat the start point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Contour {
    /// First point of the contour.
    pub start: u32,
    /// One past the last point of the contour.
    pub end: u32,
}

impl Contour {
    /// Create a contour over `[start, end)`.
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of points in the contour (zero for inverted ranges).
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    /// True if the contour has no points.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The contour as a range into the point buffer.
    pub const fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Axis-aligned bounding box over [`Point`]s.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Point,
    /// Maximum corner.
    pub max: Point,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    /// Inverted bounds that become the first included point's box.
    pub const EMPTY: Self = Self {
        min: Point::new(f32::INFINITY, f32::INFINITY),
        max: Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Create bounds from min/max corners.
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Bounds of a set of points; [`Bounds::EMPTY`] for an empty set.
    pub fn from_points(points: &[Point]) -> Self {
        let mut b = Self::EMPTY;
        for &p in points {
            b.include(p);
        }
        b
    }

    /// Grow to include `p`.
    #[inline]
    pub fn include(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// True if no point has been included. Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    /// Horizontal extent (zero when empty).
    pub fn width(&self) -> f32 {
        (self.max.x - self.min.x).max(0.0)
    }

    /// Vertical extent (zero when empty).
    pub fn height(&self) -> f32 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// Convert to a Kurbo rectangle.
    pub fn to_rect(&self) -> kurbo::Rect {
        if self.is_empty() {
            return kurbo::Rect::ZERO;
        }
        kurbo::Rect::new(
            f64::from(self.min.x),
            f64::from(self.min.y),
            f64::from(self.max.x),
            f64::from(self.max.y),
        )
    }
}

/// A mesh vertex: position plus a UV normalized to the mesh's own bounds.
///
/// The UV is meant for gradient and pattern sampling downstream.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in path space.
    pub position: [f32; 2],
    /// `(position - bounds.min) / max(bounds.size, 1)`.
    pub uv: [f32; 2],
}

const _: () = assert!(
    size_of::<Vertex>() == 16,
    "Vertex layout is shared with GPU pipelines"
);

/// Rotational orientation of a contour.
///
/// Uses the mathematical (y-up) convention: a positive shoelace area is counter-clockwise.
/// In a y-down screen space the visual direction is mirrored, but the relation between
/// winding and emitted triangle orientation is unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Winding {
    /// Positive signed area.
    CounterClockwise,
    /// Negative or zero signed area.
    Clockwise,
}

impl Winding {
    /// Classify a signed area.
    pub fn from_signed_area(area: f64) -> Self {
        if area > 0.0 {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }

    /// True for [`Winding::CounterClockwise`].
    pub const fn is_ccw(self) -> bool {
        matches!(self, Self::CounterClockwise)
    }

    /// The opposite winding.
    pub const fn reversed(self) -> Self {
        match self {
            Self::CounterClockwise => Self::Clockwise,
            Self::Clockwise => Self::CounterClockwise,
        }
    }

    /// `1.0` for counter-clockwise, `-1.0` for clockwise.
    #[inline]
    pub(crate) const fn sign(self) -> f64 {
        match self {
            Self::CounterClockwise => 1.0,
            Self::Clockwise => -1.0,
        }
    }
}
