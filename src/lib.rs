//! Extracts line segments, circles and circular arcs from raster images.
//!
//! ```no_run
//! use primitive_reader::PrimitiveDetector;
//!
//! let detector = PrimitiveDetector::default();
//! let pixels = vec![0u8; 64 * 48];
//! let primitives = detector.process_image(&pixels, 64, 48, 1)?;
//! println!("{} lines", primitives.lines.len());
//! # Ok::<(), primitive_reader::ExtractError>(())
//! ```

pub mod boundary;
pub mod config;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod kornia;
pub mod signal;

pub use config::{ArcConfig, CircleConfig, CornerConfig, DetectorConfig, LineConfig};
pub use detector::PrimitiveDetector;
pub use error::{ExtractError, FormatError};
pub use geometry::{Arc, Circle, GeometricPrimitives, Line, Point2D};
pub use crate::kornia::{Raster, RasterView};
