//! Corner responses and feature selection.

use image::GrayImage;
use kornia::image::{ImageSize, allocator::CpuAllocator};
use kornia::imgproc::normalize;

use super::filter::{FloatImage, box_sum, sobel_gradients, to_float};
use crate::error::Result;
use crate::kornia::CpuImage;

/// Box-summed structure tensor components `(Σdx², Σdx·dy, Σdy²)`.
fn structure_tensor(
    gray: &GrayImage,
    block_size: usize,
    aperture: usize,
) -> (FloatImage, FloatImage, FloatImage) {
    let (dx, dy) = sobel_gradients(&to_float(gray), aperture);
    let mut xx = dx.clone();
    let mut xy = dx.clone();
    let mut yy = dy.clone();
    for (((a, b), c), (&gx, &gy)) in xx
        .iter_mut()
        .zip(xy.iter_mut())
        .zip(yy.iter_mut())
        .zip(dx.iter().zip(dy.iter()))
    {
        *a = gx * gx;
        *b = gx * gy;
        *c = gy * gy;
    }
    (
        box_sum(&xx, block_size),
        box_sum(&xy, block_size),
        box_sum(&yy, block_size),
    )
}

/// Harris response `det(M) - k * trace(M)^2` per pixel.
pub fn harris_response(gray: &GrayImage, block_size: usize, aperture: usize, k: f64) -> FloatImage {
    let (xx, xy, yy) = structure_tensor(gray, block_size, aperture);
    let k = k as f32;
    let mut out = xx.clone();
    for (((r, &a), &b), &c) in out.iter_mut().zip(xx.iter()).zip(xy.iter()).zip(yy.iter()) {
        let trace = a + c;
        *r = a * c - b * b - k * trace * trace;
    }
    out
}

/// Smaller eigenvalue of the structure tensor per pixel.
pub fn min_eigen_response(gray: &GrayImage, block_size: usize, aperture: usize) -> FloatImage {
    let (xx, xy, yy) = structure_tensor(gray, block_size, aperture);
    let mut out = xx.clone();
    for (((r, &a), &b), &c) in out.iter_mut().zip(xx.iter()).zip(xy.iter()).zip(yy.iter()) {
        let (a, c) = (a * 0.5, c * 0.5);
        *r = (a + c) - ((a - c) * (a - c) + b * b).sqrt();
    }
    out
}

/// Linearly maps the response range onto `0..=255`. A flat response maps to all zeros.
pub fn normalize_min_max(response: &FloatImage) -> Result<GrayImage> {
    let (width, height) = response.dimensions();
    if width == 0 || height == 0 {
        return Ok(GrayImage::new(width, height));
    }

    let size = ImageSize {
        width: width as usize,
        height: height as usize,
    };
    let src = CpuImage::<f32, 1>::new(size, response.as_raw().clone(), CpuAllocator)?;
    let (min, max) = normalize::find_min_max(&src)?;
    if max - min <= f32::EPSILON {
        return Ok(GrayImage::new(width, height));
    }

    let mut dst = CpuImage::<f32, 1>::from_size_val(size, 0.0, CpuAllocator)?;
    normalize::normalize_min_max(&src, &mut dst, 0.0, 255.0)?;
    let data = dst
        .as_slice()
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    Ok(GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height)))
}

/// Strongest corners of `image`, best first.
///
/// Candidates are local 3x3 maxima of the minimum-eigenvalue response that
/// exceed `quality_level` times the global maximum. A candidate closer than
/// `min_distance` to an already accepted corner is dropped. The one pixel
/// border is never reported.
pub fn good_features_to_track(
    image: &GrayImage,
    max_corners: usize,
    quality_level: f64,
    min_distance: f64,
    block_size: usize,
) -> Vec<(f32, f32)> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if w < 3 || h < 3 || max_corners == 0 {
        return Vec::new();
    }

    let mut eig = min_eigen_response(image, block_size, 3);
    let max_val = eig.iter().copied().fold(0.0f32, f32::max);
    let threshold = max_val * quality_level as f32;
    for v in eig.iter_mut() {
        if *v <= threshold {
            *v = 0.0;
        }
    }

    let data = eig.as_raw();
    let mut candidates: Vec<(f32, usize, usize)> = Vec::new();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let val = data[y * w + x];
            if val == 0.0 {
                continue;
            }
            let mut is_peak = true;
            'window: for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if data[ny * w + nx] > val {
                        is_peak = false;
                        break 'window;
                    }
                }
            }
            if is_peak {
                candidates.push((val, x, y));
            }
        }
    }
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

    let min_dist_sq = min_distance * min_distance;
    let mut corners: Vec<(f32, f32)> = Vec::new();
    for (_, x, y) in candidates {
        let (fx, fy) = (x as f32, y as f32);
        let crowded = corners.iter().any(|&(cx, cy)| {
            let dx = (cx - fx) as f64;
            let dy = (cy - fy) as f64;
            dx * dx + dy * dy < min_dist_sq
        });
        if crowded {
            continue;
        }
        corners.push((fx, fy));
        if corners.len() == max_corners {
            break;
        }
    }
    corners
}
