//! Plain geometric value types produced by the extraction pipeline.
//!
//! All types are `#[repr(C)]` so they can cross the C boundary by value.

use serde::{Deserialize, Serialize};

/// Tolerance in pixels used by the membership helpers when callers have no better value.
pub const DEFAULT_TOLERANCE: f64 = 2.0;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A line segment in extraction order. Direction carries no meaning.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2D,
    pub end: Point2D,
}

impl Line {
    pub const fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Perpendicular distance from `point` to the infinite line through the segment.
    ///
    /// Falls back to the distance from `start` when the segment has zero length.
    pub fn distance_to_point(&self, point: &Point2D) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len = dx.hypot(dy);
        if len == 0.0 {
            return self.start.distance(point);
        }
        (dy * point.x - dx * point.y + self.end.x * self.start.y - self.end.y * self.start.x).abs()
            / len
    }

    pub fn contains_point(&self, point: &Point2D, tolerance: f64) -> bool {
        self.distance_to_point(point) <= tolerance
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2D,
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: Point2D, radius: f64) -> Self {
        Self { center, radius }
    }

    /// True when `point` lies within `tolerance` of the circumference.
    pub fn contains_point(&self, point: &Point2D, tolerance: f64) -> bool {
        (self.center.distance(point) - self.radius).abs() <= tolerance
    }
}

/// A circular arc. Angles are radians from `center` in `atan2` convention.
///
/// No ordering between `start_angle` and `end_angle` is implied; the sweep
/// direction is up to the consumer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc {
    pub center: Point2D,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    pub fn start_point(&self) -> Point2D {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Point2D {
        self.point_at(self.end_angle)
    }

    fn point_at(&self, angle: f64) -> Point2D {
        Point2D::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }
}

/// Everything extracted from one image. Order inside each list is extraction order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometricPrimitives {
    pub lines: Vec<Line>,
    pub circles: Vec<Circle>,
    pub arcs: Vec<Arc>,
}

impl GeometricPrimitives {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.circles.is_empty() && self.arcs.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.lines.len() + self.circles.len() + self.arcs.len()
    }
}
