use image::GrayImage;
use kornia::imgproc;

use super::raster::{CpuImage, Raster};
use crate::error::{FormatError, Result};
use kornia::image::allocator::CpuAllocator;

/// Converts any [`Raster`] into an 8-bit single channel image.
///
/// Multi-channel pixels are stored blue first; a fourth channel is alpha and
/// ignored. Single channel input is copied as is.
pub fn to_gray(raster: &Raster) -> Result<GrayImage> {
    let (width, height) = (raster.width(), raster.height());
    let luma = match raster {
        Raster::Empty => return Ok(GrayImage::new(0, 0)),
        Raster::Gray(img) => img.as_slice().to_vec(),
        Raster::Bgr(img) => {
            let mut rgb = CpuImage::<u8, 3>::from_size_val(img.size(), 0u8, CpuAllocator)?;
            imgproc::color::bgr_from_rgb(img, &mut rgb)?;
            gray_from_rgb(&rgb)?
        }
        Raster::Bgra(img) => {
            let mut rgb = CpuImage::<u8, 3>::from_size_val(img.size(), 0u8, CpuAllocator)?;
            imgproc::color::rgb_from_bgra(img, &mut rgb, None)?;
            gray_from_rgb(&rgb)?
        }
    };

    let actual = luma.len();
    GrayImage::from_raw(width as u32, height as u32, luma).ok_or_else(|| {
        FormatError::LengthMismatch {
            expected: width * height,
            actual,
        }
        .into()
    })
}

fn gray_from_rgb(image: &CpuImage<u8, 3>) -> Result<Vec<u8>> {
    let mut gray = CpuImage::<u8, 1>::from_size_val(image.size(), 0u8, CpuAllocator)?;
    imgproc::color::gray_from_rgb_u8(image, &mut gray)?;
    Ok(gray.as_slice().to_vec())
}
