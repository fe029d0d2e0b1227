use crate::config::CornerConfig;
use crate::error::Result;
use crate::geometry::Point2D;
use crate::kornia::{Raster, to_gray};
use crate::signal::{gaussian_blur, good_features_to_track, harris_response, normalize_min_max};

/// Neighbourhood of the eigenvalue response used when selecting features.
const SELECTION_BLOCK_SIZE: usize = 3;

/// Corner-like feature points, strongest first, at most `config.max_corners`.
///
/// The Harris response of the smoothed grayscale image is normalized to 8 bits
/// and features are then selected on that normalized map.
pub fn detect_corners(raster: &Raster, config: &CornerConfig) -> Result<Vec<Point2D>> {
    let gray = to_gray(raster)?;
    if gray.width() == 0 || gray.height() == 0 {
        return Ok(Vec::new());
    }

    let blurred = gaussian_blur(&gray, config.blur_kernel, config.blur_sigma);
    let response = harris_response(
        &blurred,
        config.block_size,
        config.aperture_size,
        config.harris_k,
    );
    let normalized = normalize_min_max(&response)?;

    let corners = good_features_to_track(
        &normalized,
        config.max_corners,
        config.quality_level,
        config.min_distance,
        SELECTION_BLOCK_SIZE,
    );
    Ok(corners
        .into_iter()
        .map(|(x, y)| Point2D::new(x as f64, y as f64))
        .collect())
}
