//! Separable linear filtering over `f32` planes.
//!
//! Kernels of an explicit odd size are built here and run through
//! `imageproc::filter::separable_filter`.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter;

pub type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

pub fn to_float(gray: &GrayImage) -> FloatImage {
    let data = gray.as_raw().iter().map(|&v| v as f32).collect();
    FloatImage::from_raw(gray.width(), gray.height(), data)
        .unwrap_or_else(|| FloatImage::new(gray.width(), gray.height()))
}

/// Saturating, rounding conversion back to 8 bits.
pub fn to_gray(image: &FloatImage) -> GrayImage {
    let data = image
        .as_raw()
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    GrayImage::from_raw(image.width(), image.height(), data)
        .unwrap_or_else(|| GrayImage::new(image.width(), image.height()))
}

/// Normalized 1D Gaussian of odd `size`. A non-positive `sigma` is derived from the size.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f32> {
    if sigma <= 0.0 {
        // fixed binomial approximations for the common small sizes
        match size {
            1 => return vec![1.0],
            3 => return vec![0.25, 0.5, 0.25],
            5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
            7 => {
                return vec![
                    0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
                ];
            }
            _ => {}
        }
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let scale = -0.5 / (sigma * sigma);
    let half = (size as f64 - 1.0) * 0.5;
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - half;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|v| (v / sum) as f32).collect()
}

/// Sobel kernel of the given derivative `order` for an odd aperture `size`.
///
/// Aperture 1 with a first derivative yields the plain central difference.
pub fn sobel_kernel(size: usize, order: usize) -> Vec<f32> {
    let size = if size == 1 && order > 0 { 3 } else { size };
    let mut kernel = vec![1.0f32];
    for _ in 1..size.saturating_sub(order) {
        let mut next = vec![0.0; kernel.len() + 1];
        for (j, &v) in kernel.iter().enumerate() {
            next[j] += v;
            next[j + 1] += v;
        }
        kernel = next;
    }
    for _ in 0..order {
        let mut next = vec![0.0; kernel.len() + 1];
        for j in 0..next.len() {
            let prev = if j > 0 { kernel[j - 1] } else { 0.0 };
            let cur = kernel.get(j).copied().unwrap_or(0.0);
            next[j] = prev - cur;
        }
        kernel = next;
    }
    kernel
}

/// Correlates rows with `kx`, then columns with `ky`. Kernels are centered
/// and borders are padded by continuity.
pub fn separable_filter(src: &FloatImage, kx: &[f32], ky: &[f32]) -> FloatImage {
    if src.width() == 0 || src.height() == 0 {
        return src.clone();
    }
    filter::separable_filter(src, kx, ky)
}

/// Gaussian smoothing with an explicit odd kernel size, rounded back to 8 bits.
pub fn gaussian_blur(gray: &GrayImage, size: usize, sigma: f64) -> GrayImage {
    let kernel = gaussian_kernel(size, sigma);
    to_gray(&separable_filter(&to_float(gray), &kernel, &kernel))
}

/// First derivatives `(dx, dy)` with the Sobel operator of the given aperture.
pub fn sobel_gradients(src: &FloatImage, aperture: usize) -> (FloatImage, FloatImage) {
    let deriv = sobel_kernel(aperture, 1);
    let smooth = sobel_kernel(aperture, 0);
    let dx = separable_filter(src, &deriv, &smooth);
    let dy = separable_filter(src, &smooth, &deriv);
    (dx, dy)
}

/// Unnormalized sum over a `block` x `block` neighbourhood.
pub fn box_sum(src: &FloatImage, block: usize) -> FloatImage {
    let ones = vec![1.0f32; block];
    separable_filter(src, &ones, &ones)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sobel_kernels_match_known_taps() {
        assert_eq!(sobel_kernel(3, 0), vec![1.0, 2.0, 1.0]);
        assert_eq!(sobel_kernel(3, 1), vec![-1.0, 0.0, 1.0]);
        assert_eq!(sobel_kernel(5, 1), vec![-1.0, -2.0, 0.0, 2.0, 1.0]);
        assert_eq!(sobel_kernel(1, 0), vec![1.0]);
        assert_eq!(sobel_kernel(1, 1), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(9, 2.0);
        assert_eq!(k.len(), 9);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..4 {
            assert!((k[i] - k[8 - i]).abs() < 1e-7);
        }
        assert!(k[4] > k[3]);
    }

    #[test]
    fn box_sum_counts_the_block() {
        let ones = FloatImage::from_pixel(9, 6, Luma([1.0]));
        let summed = box_sum(&ones, 3);
        assert_eq!(summed.get_pixel(4, 3)[0], 9.0);
        // continuity padding keeps the border sum full
        assert_eq!(summed.get_pixel(0, 0)[0], 9.0);
    }

    #[test]
    fn filter_matches_direct_correlation_inside() {
        let src = FloatImage::from_fn(12, 10, |x, y| Luma([(x * 7 + y * 3) as f32]));
        let k = [1.0f32, 2.0, 4.0];
        let out = separable_filter(&src, &k, &[1.0]);
        let (x, y) = (5, 4);
        let expected: f32 = k
            .iter()
            .enumerate()
            .map(|(i, &w)| w * src.get_pixel(x + i as u32 - 1, y)[0])
            .sum();
        assert_eq!(out.get_pixel(x, y)[0], expected);
    }

    #[test]
    fn blur_keeps_constant_image() {
        let gray = GrayImage::from_pixel(12, 7, Luma([77]));
        let blurred = gaussian_blur(&gray, 5, 0.0);
        assert!(blurred.pixels().all(|p| p[0] == 77));
    }

    #[test]
    fn gradient_of_vertical_step_is_horizontal() {
        let mut gray = GrayImage::new(10, 10);
        for (x, _, px) in gray.enumerate_pixels_mut() {
            px[0] = if x >= 5 { 200 } else { 0 };
        }
        let (dx, dy) = sobel_gradients(&to_float(&gray), 3);
        assert!(dx.get_pixel(5, 5)[0] > 0.0);
        assert_eq!(dy.get_pixel(5, 5)[0], 0.0);
    }
}
