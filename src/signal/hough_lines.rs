//! Progressive probabilistic Hough transform for line segments.

use image::GrayImage;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::f64::consts::PI;

/// Edge points are visited in a shuffled but reproducible order.
const POINT_ORDER_SEED: u64 = 0xFFFF_FFFF;
const SHIFT: u32 = 16;

pub type Segment = ((i32, i32), (i32, i32));

/// Extracts segments from a binary edge map (non-zero pixels are edges).
///
/// Each edge point votes in a `(theta, rho)` accumulator. Once a bin reaches
/// `threshold`, the corridor through the point is walked in both directions,
/// bridging at most `max_line_gap` missing pixels. Walked pixels are removed
/// from further voting; the walk becomes a segment when it spans at least
/// `min_line_length` along x or y.
pub fn probabilistic_hough(
    edges: &GrayImage,
    rho: f64,
    theta: f64,
    threshold: u32,
    min_line_length: f64,
    max_line_gap: f64,
) -> Vec<Segment> {
    let (w, h) = (edges.width() as usize, edges.height() as usize);
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let irho = 1.0 / rho;
    let numangle = ((PI / theta).round() as usize).max(1);
    let numrho = ((((w + h) * 2 + 1) as f64) / rho).round() as usize;
    let offset = (numrho as i64 - 1) / 2;
    let trig: Vec<(f64, f64)> = (0..numangle)
        .map(|n| {
            let angle = n as f64 * theta;
            (angle.cos() * irho, angle.sin() * irho)
        })
        .collect();
    let bin = |x: i64, y: i64, n: usize| -> usize {
        let (c, s) = trig[n];
        let r = (x as f64 * c + y as f64 * s).round() as i64 + offset;
        n * numrho + r.clamp(0, numrho as i64 - 1) as usize
    };

    let mut accum = vec![0i32; numangle * numrho];
    let mut mask = vec![false; w * h];
    let mut points = Vec::new();
    for (x, y, px) in edges.enumerate_pixels() {
        if px[0] != 0 {
            mask[y as usize * w + x as usize] = true;
            points.push((x as i64, y as i64));
        }
    }
    points.shuffle(&mut StdRng::seed_from_u64(POINT_ORDER_SEED));

    let threshold = threshold as i32;
    let line_gap = max_line_gap.max(0.0) as i64;
    let half = 1i64 << (SHIFT - 1);
    let mut segments = Vec::new();

    for (x, y) in points {
        if !mask[y as usize * w + x as usize] {
            continue;
        }

        let mut max_val = threshold - 1;
        let mut max_n = 0;
        for n in 0..numangle {
            let idx = bin(x, y, n);
            accum[idx] += 1;
            if accum[idx] > max_val {
                max_val = accum[idx];
                max_n = n;
            }
        }
        if max_val < threshold {
            continue;
        }

        // walk direction is perpendicular to the normal of the winning bin
        let (cos_n, sin_n) = trig[max_n];
        let (a, b) = (-sin_n, cos_n);
        let x_major = a.abs() > b.abs();
        let (x0, y0, dx0, dy0) = if x_major {
            let dx0 = if a > 0.0 { 1 } else { -1 };
            let dy0 = (b * (1i64 << SHIFT) as f64 / a.abs()).round() as i64;
            (x, (y << SHIFT) + half, dx0, dy0)
        } else {
            let dy0 = if b > 0.0 { 1 } else { -1 };
            let dx0 = (a * (1i64 << SHIFT) as f64 / b.abs()).round() as i64;
            ((x << SHIFT) + half, y, dx0, dy0)
        };
        let to_pixel = |px: i64, py: i64| -> (i64, i64) {
            if x_major {
                (px, py >> SHIFT)
            } else {
                (px >> SHIFT, py)
            }
        };

        let mut line_end = [(x, y); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let (dx, dy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut px, mut py) = (x0, y0);
            let mut gap = 0;
            loop {
                let (j, i) = to_pixel(px, py);
                if j < 0 || j >= w as i64 || i < 0 || i >= h as i64 {
                    break;
                }
                if mask[i as usize * w + j as usize] {
                    gap = 0;
                    *end = (j, i);
                } else {
                    gap += 1;
                    if gap > line_gap {
                        break;
                    }
                }
                px += dx;
                py += dy;
            }
        }

        let good = ((line_end[1].0 - line_end[0].0).abs() as f64) >= min_line_length
            || ((line_end[1].1 - line_end[0].1).abs() as f64) >= min_line_length;

        for (k, &end) in line_end.iter().enumerate() {
            let (dx, dy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut px, mut py) = (x0, y0);
            loop {
                let (j, i) = to_pixel(px, py);
                let idx = i as usize * w + j as usize;
                if mask[idx] {
                    if good {
                        for n in 0..numangle {
                            accum[bin(j, i, n)] -= 1;
                        }
                    }
                    mask[idx] = false;
                }
                if (j, i) == end {
                    break;
                }
                px += dx;
                py += dy;
            }
        }

        if good {
            segments.push((
                (line_end[0].0 as i32, line_end[0].1 as i32),
                (line_end[1].0 as i32, line_end[1].1 as i32),
            ));
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn finds_single_vertical_edge() {
        let mut edges = GrayImage::new(64, 64);
        for y in 5..60 {
            edges.put_pixel(20, y, Luma([255]));
        }
        let segments = probabilistic_hough(&edges, 1.0, PI / 180.0, 20, 30.0, 5.0);
        assert_eq!(segments.len(), 1);
        let ((x1, y1), (x2, y2)) = segments[0];
        assert_eq!((x1, x2), (20, 20));
        assert_eq!((y1.min(y2), y1.max(y2)), (5, 59));
    }

    #[test]
    fn short_fragments_are_not_reported() {
        let mut edges = GrayImage::new(64, 64);
        for x in 10..20 {
            edges.put_pixel(x, 30, Luma([255]));
        }
        assert!(probabilistic_hough(&edges, 1.0, PI / 180.0, 5, 30.0, 5.0).is_empty());
    }

    #[test]
    fn empty_edge_map_yields_nothing() {
        let edges = GrayImage::new(16, 16);
        assert!(probabilistic_hough(&edges, 1.0, PI / 180.0, 1, 1.0, 1.0).is_empty());
    }
}
