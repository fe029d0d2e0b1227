pub mod raster;
pub use raster::{CpuImage, Raster, RasterView};
pub mod greyscale;
pub use greyscale::to_gray;
