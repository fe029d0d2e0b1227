use crate::config::CircleConfig;
use crate::error::Result;
use crate::geometry::{Circle, Point2D};
use crate::kornia::{Raster, to_gray};
use crate::signal::{gaussian_blur, hough_circles};

/// Full circles found by the gradient circle transform on the smoothed grayscale image.
pub fn detect_circles(raster: &Raster, config: &CircleConfig) -> Result<Vec<Circle>> {
    let gray = to_gray(raster)?;
    if gray.width() == 0 || gray.height() == 0 {
        return Ok(Vec::new());
    }

    let blurred = gaussian_blur(&gray, config.blur_kernel, config.blur_sigma);
    Ok(hough_circles(&blurred, config)
        .into_iter()
        .filter(|&(_, _, r)| r > 0.0)
        .map(|(x, y, r)| Circle::new(Point2D::new(x as f64, y as f64), r as f64))
        .collect())
}
