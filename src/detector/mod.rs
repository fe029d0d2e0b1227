//! Extraction stages and the orchestrator that runs them over one image.

pub mod arcs;
pub use arcs::{circumscribed_circle, fit_arcs, internal_angles};
pub mod circles;
pub use circles::detect_circles;
pub mod features;
pub use features::detect_corners;
pub mod lines;
pub use lines::detect_lines;

use log::debug;

use crate::config::DetectorConfig;
use crate::error::{FormatError, Result};
use crate::geometry::{Arc, Circle, GeometricPrimitives, Line, Point2D};
use crate::kornia::Raster;
use crate::kornia::raster::packed_len;

/// Extracts lines, circles and arcs from raster images.
///
/// Holds only its configuration, fixed at construction. Calls share no
/// mutable state, so one detector can serve several threads at once.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveDetector {
    config: DetectorConfig,
}

impl PrimitiveDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Runs the whole pipeline over a packed, interleaved 8-bit buffer.
    ///
    /// `buffer` must hold exactly `width * height * channels` bytes and
    /// `channels` must be 1, 3 or 4. A zero-area image yields an empty result.
    pub fn process_image(
        &self,
        buffer: &[u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<GeometricPrimitives> {
        let expected = packed_len(width, height, channels)?;
        if buffer.len() != expected {
            return Err(FormatError::LengthMismatch {
                expected,
                actual: buffer.len(),
            }
            .into());
        }
        let raster = Raster::from_buffer(buffer, width, height, channels)?;
        self.process_raster(&raster)
    }

    pub fn process_raster(&self, raster: &Raster) -> Result<GeometricPrimitives> {
        if raster.is_empty() {
            debug!("empty image, nothing to extract");
            return Ok(GeometricPrimitives::default());
        }

        let corners = self.detect_corners(raster)?;
        let lines = self.detect_lines(raster, &corners)?;
        let circles = self.detect_circles(raster)?;
        let arcs = self.detect_arcs(&corners);
        debug!(
            "{}x{}x{}: {} corners, {} lines, {} circles, {} arcs",
            raster.width(),
            raster.height(),
            raster.channels(),
            corners.len(),
            lines.len(),
            circles.len(),
            arcs.len()
        );

        Ok(GeometricPrimitives {
            lines,
            circles,
            arcs,
        })
    }

    pub fn detect_corners(&self, raster: &Raster) -> Result<Vec<Point2D>> {
        detect_corners(raster, &self.config.corners)
    }

    pub fn detect_lines(&self, raster: &Raster, corners: &[Point2D]) -> Result<Vec<Line>> {
        detect_lines(raster, corners, &self.config.lines)
    }

    pub fn detect_circles(&self, raster: &Raster) -> Result<Vec<Circle>> {
        detect_circles(raster, &self.config.circles)
    }

    pub fn detect_arcs(&self, corners: &[Point2D]) -> Vec<Arc> {
        fit_arcs(corners, &self.config.arcs)
    }
}
