//! Gradient Hough transform for circles.

use image::GrayImage;
use imageproc::{edges::canny, gradients};

use crate::config::CircleConfig;

/// `(center_x, center_y, radius)` in pixels.
pub type CircleHit = (f32, f32, f32);

/// Detects circles in an already smoothed grayscale image.
///
/// Edge pixels from a Canny pass (`param1` high, half of it low) vote along
/// their gradient direction, both ways, for every radius in range. Accumulator
/// peaks above `param2` are center candidates, visited strongest first. A
/// candidate closer than `min_dist` to an accepted center is skipped. The
/// radius is the best supported 3 px band of edge distances around the center,
/// which needs at least `param2` edge pixels.
pub fn hough_circles(blurred: &GrayImage, config: &CircleConfig) -> Vec<CircleHit> {
    let (w, h) = (blurred.width() as usize, blurred.height() as usize);
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let edges = canny(blurred, config.param1 * 0.5, config.param1);
    let gx = gradients::horizontal_sobel(blurred);
    let gy = gradients::vertical_sobel(blurred);

    let min_r = config.min_radius as usize;
    let max_r = match config.max_radius {
        0 => w.max(h),
        r => r as usize,
    };
    let dp = config.dp as f32;
    let idp = 1.0 / dp;
    let acols = (w as f32 * idp).ceil() as usize;
    let arows = (h as f32 * idp).ceil() as usize;
    let stride = acols + 2;
    let mut acc = vec![0u32; (arows + 2) * stride];

    let mut edge_points = Vec::new();
    for (x, y, px) in edges.enumerate_pixels() {
        if px[0] == 0 {
            continue;
        }
        let (fx, fy) = (x as f32, y as f32);
        edge_points.push((fx, fy));

        let vx = gx.get_pixel(x, y)[0] as f32;
        let vy = gy.get_pixel(x, y)[0] as f32;
        let mag = vx.hypot(vy);
        if mag < 1.0 {
            continue;
        }
        let (ux, uy) = (vx / mag, vy / mag);
        for sign in [1.0f32, -1.0] {
            for r in min_r..=max_r {
                let step = sign * r as f32;
                let ax = ((fx + step * ux) * idp).round();
                let ay = ((fy + step * uy) * idp).round();
                if ax < 0.0 || ay < 0.0 || ax >= acols as f32 || ay >= arows as f32 {
                    break;
                }
                acc[(ay as usize + 1) * stride + ax as usize + 1] += 1;
            }
        }
    }

    let threshold = config.param2;
    let mut centers: Vec<(usize, usize, u32)> = Vec::new();
    for ay in 0..arows {
        for ax in 0..acols {
            let idx = (ay + 1) * stride + ax + 1;
            let v = acc[idx];
            if v > threshold
                && v > acc[idx - 1]
                && v >= acc[idx + 1]
                && v > acc[idx - stride]
                && v >= acc[idx + stride]
            {
                centers.push((ax, ay, v));
            }
        }
    }
    centers.sort_by(|a, b| b.2.cmp(&a.2));

    let min_dist_sq = (config.min_dist * config.min_dist) as f32;
    let mut circles: Vec<CircleHit> = Vec::new();
    for (ax, ay, _) in centers {
        let (cx, cy) = (ax as f32 * dp, ay as f32 * dp);
        let crowded = circles
            .iter()
            .any(|&(ox, oy, _)| (ox - cx).powi(2) + (oy - cy).powi(2) < min_dist_sq);
        if crowded {
            continue;
        }
        if let Some(radius) = estimate_radius(&edge_points, (cx, cy), min_r, max_r, threshold) {
            circles.push((cx, cy, radius));
        }
    }

    circles
}

fn estimate_radius(
    edge_points: &[(f32, f32)],
    center: (f32, f32),
    min_r: usize,
    max_r: usize,
    min_support: u32,
) -> Option<f32> {
    let mut counts = vec![0u32; max_r + 1];
    let mut sums = vec![0f32; max_r + 1];
    for &(x, y) in edge_points {
        let d = (x - center.0).hypot(y - center.1);
        if d < min_r as f32 || d > max_r as f32 {
            continue;
        }
        let b = d as usize;
        counts[b] += 1;
        sums[b] += d;
    }

    let mut best: Option<(u32, f32)> = None;
    for b in 0..=max_r {
        let lo = b.saturating_sub(1);
        let hi = (b + 1).min(max_r);
        let count: u32 = counts[lo..=hi].iter().sum();
        if count == 0 || best.is_some_and(|(c, _)| c >= count) {
            continue;
        }
        let sum: f32 = sums[lo..=hi].iter().sum();
        best = Some((count, sum / count as f32));
    }

    best.filter(|&(count, _)| count >= min_support)
        .map(|(_, radius)| radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_band_prefers_dense_ring() {
        let mut points = Vec::new();
        for i in 0..90 {
            let a = i as f32 * std::f32::consts::TAU / 90.0;
            points.push((50.0 + 20.0 * a.cos(), 50.0 + 20.0 * a.sin()));
        }
        points.push((50.0, 80.0));
        let r = estimate_radius(&points, (50.0, 50.0), 5, 100, 30).expect("ring");
        assert!((r - 20.0).abs() < 0.5, "radius {r}");
    }

    #[test]
    fn sparse_support_is_rejected() {
        let points = vec![(10.0, 0.0), (0.0, 10.0), (-10.0, 0.0)];
        assert!(estimate_radius(&points, (0.0, 0.0), 5, 100, 30).is_none());
    }

    #[test]
    fn blank_image_has_no_circles() {
        let img = GrayImage::new(40, 40);
        assert!(hough_circles(&img, &CircleConfig::default()).is_empty());
    }
}
