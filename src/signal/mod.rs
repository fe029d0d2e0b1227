//! Image-signal building blocks the detector stages are composed from.
//!
//! Everything here works on `image::GrayImage` and is independent of the
//! input buffer layout.

pub mod filter;
pub use filter::{FloatImage, gaussian_blur, sobel_gradients};
pub mod corners;
pub use corners::{good_features_to_track, harris_response, normalize_min_max};
pub mod hough_lines;
pub use hough_lines::probabilistic_hough;
pub mod hough_circles;
pub use hough_circles::hough_circles;
