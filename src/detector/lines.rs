use imageproc::edges::canny;

use crate::config::LineConfig;
use crate::error::Result;
use crate::geometry::{Line, Point2D};
use crate::kornia::{Raster, to_gray};
use crate::signal::probabilistic_hough;

/// Line segments from the Canny edge map of the grayscale image.
///
/// `_corners` is accepted so corner-guided filtering can be added without
/// changing the stage signature; it is not consulted yet.
pub fn detect_lines(raster: &Raster, _corners: &[Point2D], config: &LineConfig) -> Result<Vec<Line>> {
    let gray = to_gray(raster)?;
    if gray.width() == 0 || gray.height() == 0 {
        return Ok(Vec::new());
    }

    let edges = canny(&gray, config.canny_low, config.canny_high);
    let segments = probabilistic_hough(
        &edges,
        config.rho,
        config.theta,
        config.threshold,
        config.min_line_length,
        config.max_line_gap,
    );
    Ok(segments
        .into_iter()
        .map(|((x1, y1), (x2, y2))| {
            Line::new(
                Point2D::new(x1 as f64, y1 as f64),
                Point2D::new(x2 as f64, y2 as f64),
            )
        })
        .collect())
}
