//! Detector parameters.
//!
//! A [`DetectorConfig`] is built once, validated by
//! [`PrimitiveDetector::new`](crate::detector::PrimitiveDetector::new), and from then
//! on only read. Every stage receives its section by reference.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{ExtractError, Result};

const CORNER_BLUR_KERNEL: usize = 5;
const CORNER_BLOCK_SIZE: usize = 3;
const CORNER_APERTURE: usize = 3;
const CORNER_HARRIS_K: f64 = 0.04;
const CORNER_MAX_COUNT: usize = 100;
const CORNER_QUALITY: f64 = 0.01;
const CORNER_MIN_DISTANCE: f64 = 10.0;

const LINE_CANNY_LOW: f32 = 50.0;
const LINE_CANNY_HIGH: f32 = 150.0;
const LINE_RHO: f64 = 1.0;
const LINE_THETA: f64 = PI / 180.0;
const LINE_THRESHOLD: u32 = 50;
const LINE_MIN_LENGTH: f64 = 30.0;
const LINE_MAX_GAP: f64 = 10.0;

const CIRCLE_BLUR_KERNEL: usize = 9;
const CIRCLE_BLUR_SIGMA: f64 = 2.0;
const CIRCLE_DP: f64 = 1.0;
const CIRCLE_MIN_DIST: f64 = 30.0;
const CIRCLE_PARAM1: f32 = 50.0;
const CIRCLE_PARAM2: u32 = 30;
const CIRCLE_MIN_RADIUS: u32 = 5;
const CIRCLE_MAX_RADIUS: u32 = 100;

const ARC_MIN_ANGLE_DEG: f64 = 30.0;
const ARC_MAX_ANGLE_DEG: f64 = 150.0;
const ARC_COLLINEAR_EPSILON: f64 = 1e-6;

/// Corner-response and feature selection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerConfig {
    /// Odd Gaussian kernel size applied before the corner response.
    pub blur_kernel: usize,
    /// Gaussian sigma; `0` derives it from the kernel size.
    pub blur_sigma: f64,
    /// Neighbourhood summed into the structure tensor.
    pub block_size: usize,
    /// Sobel aperture, one of 1, 3, 5, 7.
    pub aperture_size: usize,
    /// Harris sensitivity constant.
    pub harris_k: f64,
    pub max_corners: usize,
    /// Fraction of the strongest response a feature must exceed.
    pub quality_level: f64,
    /// Minimum pixel distance between two selected features.
    pub min_distance: f64,
}

impl Default for CornerConfig {
    fn default() -> Self {
        Self {
            blur_kernel: CORNER_BLUR_KERNEL,
            blur_sigma: 0.0,
            block_size: CORNER_BLOCK_SIZE,
            aperture_size: CORNER_APERTURE,
            harris_k: CORNER_HARRIS_K,
            max_corners: CORNER_MAX_COUNT,
            quality_level: CORNER_QUALITY,
            min_distance: CORNER_MIN_DISTANCE,
        }
    }
}

/// Edge map and probabilistic line transform parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub canny_low: f32,
    pub canny_high: f32,
    /// Distance resolution of the accumulator in pixels.
    pub rho: f64,
    /// Angular resolution of the accumulator in radians.
    pub theta: f64,
    /// Votes a line needs before it is traced.
    pub threshold: u32,
    pub min_line_length: f64,
    /// Largest gap between collinear fragments that still merges them.
    pub max_line_gap: f64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            canny_low: LINE_CANNY_LOW,
            canny_high: LINE_CANNY_HIGH,
            rho: LINE_RHO,
            theta: LINE_THETA,
            threshold: LINE_THRESHOLD,
            min_line_length: LINE_MIN_LENGTH,
            max_line_gap: LINE_MAX_GAP,
        }
    }
}

/// Gradient circle transform parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleConfig {
    pub blur_kernel: usize,
    pub blur_sigma: f64,
    /// Inverse accumulator resolution ratio.
    pub dp: f64,
    /// Minimum distance between detected centers.
    pub min_dist: f64,
    /// Upper Canny threshold; the lower one is half of it.
    pub param1: f32,
    /// Accumulator votes a center needs, also the edge support a radius needs.
    pub param2: u32,
    pub min_radius: u32,
    /// `0` means bounded by the image size.
    pub max_radius: u32,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            blur_kernel: CIRCLE_BLUR_KERNEL,
            blur_sigma: CIRCLE_BLUR_SIGMA,
            dp: CIRCLE_DP,
            min_dist: CIRCLE_MIN_DIST,
            param1: CIRCLE_PARAM1,
            param2: CIRCLE_PARAM2,
            min_radius: CIRCLE_MIN_RADIUS,
            max_radius: CIRCLE_MAX_RADIUS,
        }
    }
}

/// Arc fitting parameters. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    pub min_angle_deg: f64,
    pub max_angle_deg: f64,
    pub collinear_epsilon: f64,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            min_angle_deg: ARC_MIN_ANGLE_DEG,
            max_angle_deg: ARC_MAX_ANGLE_DEG,
            collinear_epsilon: ARC_COLLINEAR_EPSILON,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub corners: CornerConfig,
    pub lines: LineConfig,
    pub circles: CircleConfig,
    pub arcs: ArcConfig,
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        let c = &self.corners;
        check_kernel("corners.blur_kernel", c.blur_kernel)?;
        check(c.blur_sigma >= 0.0, "corners.blur_sigma must not be negative")?;
        check(c.block_size > 0, "corners.block_size must be positive")?;
        check(
            matches!(c.aperture_size, 1 | 3 | 5 | 7),
            "corners.aperture_size must be 1, 3, 5 or 7",
        )?;
        check(
            (0.0..=1.0).contains(&c.quality_level),
            "corners.quality_level must lie in [0, 1]",
        )?;
        check(c.min_distance >= 0.0, "corners.min_distance must not be negative")?;

        let l = &self.lines;
        check(l.rho > 0.0, "lines.rho must be positive")?;
        check(l.theta > 0.0 && l.theta <= PI, "lines.theta must lie in (0, pi]")?;
        check(
            l.canny_low >= 0.0 && l.canny_low <= l.canny_high,
            "lines.canny_low must lie in [0, canny_high]",
        )?;
        check(l.threshold > 0, "lines.threshold must be positive")?;
        check(l.max_line_gap >= 0.0, "lines.max_line_gap must not be negative")?;

        let ci = &self.circles;
        check_kernel("circles.blur_kernel", ci.blur_kernel)?;
        check(ci.blur_sigma >= 0.0, "circles.blur_sigma must not be negative")?;
        check(ci.dp >= 1.0, "circles.dp must be at least 1")?;
        check(ci.min_dist > 0.0, "circles.min_dist must be positive")?;
        check(ci.param1 > 0.0, "circles.param1 must be positive")?;
        check(ci.param2 > 0, "circles.param2 must be positive")?;
        check(
            ci.max_radius == 0 || ci.min_radius <= ci.max_radius,
            "circles.min_radius exceeds circles.max_radius",
        )?;

        let a = &self.arcs;
        check(
            0.0 <= a.min_angle_deg && a.min_angle_deg < a.max_angle_deg && a.max_angle_deg <= 180.0,
            "arcs angle bounds must satisfy 0 <= min < max <= 180",
        )?;
        check(a.collinear_epsilon >= 0.0, "arcs.collinear_epsilon must not be negative")
    }
}

fn check(ok: bool, message: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(ExtractError::InvalidConfig(message.to_string()))
    }
}

fn check_kernel(name: &str, size: usize) -> Result<()> {
    if size % 2 == 1 {
        Ok(())
    } else {
        Err(ExtractError::InvalidConfig(format!(
            "{name} must be an odd kernel size, got {size}"
        )))
    }
}
