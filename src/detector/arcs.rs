//! Circle and arc fitting over feature point triples.
//!
//! Every unordered triple of feature points is tried. A triple whose triangle
//! has an internal angle outside the configured bounds is rejected, otherwise
//! its circumscribed circle becomes an arc spanning from the first point to
//! the third. Near-identical arcs from different triples are all kept.

use log::trace;

use crate::config::ArcConfig;
use crate::geometry::{Arc, Circle, Point2D};

/// Fits arcs to all plausible triples of `points`, in `(i, j, k)` lexicographic order.
pub fn fit_arcs(points: &[Point2D], config: &ArcConfig) -> Vec<Arc> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut arcs = Vec::new();
    let mut implausible = 0usize;
    let mut degenerate = 0usize;
    for i in 0..n - 2 {
        for j in i + 1..n - 1 {
            for k in j + 1..n {
                let (p1, p2, p3) = (points[i], points[j], points[k]);
                if !is_plausible_triangle(&p1, &p2, &p3, config) {
                    implausible += 1;
                    continue;
                }
                match circumscribed_circle(&p1, &p2, &p3, config.collinear_epsilon) {
                    Some(circle) => arcs.push(arc_through(&circle, &p1, &p3)),
                    None => degenerate += 1,
                }
            }
        }
    }

    trace!(
        "arc fit over {n} points: {} arcs, {implausible} implausible, {degenerate} collinear",
        arcs.len()
    );
    arcs
}

/// Internal angles in degrees at `p1`, `p2` and `p3`.
///
/// All three are `0` when two of the points coincide.
pub fn internal_angles(p1: &Point2D, p2: &Point2D, p3: &Point2D) -> [f64; 3] {
    let a = p2.distance(p3);
    let b = p1.distance(p3);
    let c = p1.distance(p2);
    if a == 0.0 || b == 0.0 || c == 0.0 {
        return [0.0; 3];
    }
    [
        angle_opposite(a, b, c),
        angle_opposite(b, a, c),
        angle_opposite(c, a, b),
    ]
}

/// Angle in degrees opposite `side`, by the law of cosines.
fn angle_opposite(side: f64, adj1: f64, adj2: f64) -> f64 {
    let cos = (adj1 * adj1 + adj2 * adj2 - side * side) / (2.0 * adj1 * adj2);
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// True when every internal angle lies strictly inside the configured bounds.
pub fn is_plausible_triangle(p1: &Point2D, p2: &Point2D, p3: &Point2D, config: &ArcConfig) -> bool {
    internal_angles(p1, p2, p3)
        .iter()
        .all(|&angle| angle > config.min_angle_deg && angle < config.max_angle_deg)
}

/// The circle through three points, or `None` when they are collinear within `epsilon`.
pub fn circumscribed_circle(
    p1: &Point2D,
    p2: &Point2D,
    p3: &Point2D,
    epsilon: f64,
) -> Option<Circle> {
    let (x1, y1) = (p1.x, p1.y);
    let (x2, y2) = (p2.x, p2.y);
    let (x3, y3) = (p3.x, p3.y);
    let s1 = x1 * x1 + y1 * y1;
    let s2 = x2 * x2 + y2 * y2;
    let s3 = x3 * x3 + y3 * y3;

    let a = x1 * (y2 - y3) - y1 * (x2 - x3) + x2 * y3 - x3 * y2;
    if a.abs() <= epsilon {
        return None;
    }
    let b = s1 * (y3 - y2) + s2 * (y1 - y3) + s3 * (y2 - y1);
    let c = s1 * (x2 - x3) + s2 * (x3 - x1) + s3 * (x1 - x2);

    let center = Point2D::new(-b / (2.0 * a), -c / (2.0 * a));
    let radius = p1.distance(&center);
    (radius > 0.0).then_some(Circle::new(center, radius))
}

fn arc_through(circle: &Circle, start: &Point2D, end: &Point2D) -> Arc {
    let c = circle.center;
    Arc {
        center: c,
        radius: circle.radius,
        start_angle: (start.y - c.y).atan2(start.x - c.x),
        end_angle: (end.y - c.y).atan2(end.x - c.x),
    }
}
