//! Adapts raw interleaved pixel buffers into kornia images and back.

use kornia::image::{Image, ImageSize, allocator::CpuAllocator};

use crate::error::{FormatError, Result};

pub type CpuImage<T, const C: usize> = Image<T, C, CpuAllocator>;

/// An 8-bit image with 1, 3 or 4 interleaved channels, colour stored as BGR(A).
///
/// Zero-area input is represented by [`Raster::Empty`] rather than a kornia image.
#[derive(Clone)]
pub enum Raster {
    Empty,
    Gray(CpuImage<u8, 1>),
    Bgr(CpuImage<u8, 3>),
    Bgra(CpuImage<u8, 4>),
}

impl Raster {
    /// Builds an image from the first `width * height * channels` bytes of `buffer`.
    pub fn from_buffer(buffer: &[u8], width: usize, height: usize, channels: usize) -> Result<Self> {
        let expected = packed_len(width, height, channels)?;
        if buffer.len() < expected {
            return Err(FormatError::BufferTooShort {
                expected,
                actual: buffer.len(),
            }
            .into());
        }
        if expected == 0 {
            return Ok(Raster::Empty);
        }

        let size = ImageSize { width, height };
        let pixels = buffer[..expected].to_vec();
        let raster = match channels {
            1 => Raster::Gray(CpuImage::<u8, 1>::new(size, pixels, CpuAllocator)?),
            3 => Raster::Bgr(CpuImage::<u8, 3>::new(size, pixels, CpuAllocator)?),
            _ => Raster::Bgra(CpuImage::<u8, 4>::new(size, pixels, CpuAllocator)?),
        };
        Ok(raster)
    }

    /// Packs a possibly row-padded view into an image.
    pub fn from_view(view: &RasterView<'_>) -> Result<Self> {
        let packed = view.to_buffer();
        Self::from_buffer(&packed, view.width, view.height, view.channels)
    }

    pub fn width(&self) -> usize {
        match self {
            Raster::Empty => 0,
            Raster::Gray(img) => img.size().width,
            Raster::Bgr(img) => img.size().width,
            Raster::Bgra(img) => img.size().width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Raster::Empty => 0,
            Raster::Gray(img) => img.size().height,
            Raster::Bgr(img) => img.size().height,
            Raster::Bgra(img) => img.size().height,
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            Raster::Empty => 0,
            Raster::Gray(_) => 1,
            Raster::Bgr(_) => 3,
            Raster::Bgra(_) => 4,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Raster::Empty)
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            Raster::Empty => &[],
            Raster::Gray(img) => img.as_slice(),
            Raster::Bgr(img) => img.as_slice(),
            Raster::Bgra(img) => img.as_slice(),
        }
    }

    pub fn view(&self) -> RasterView<'_> {
        let channels = self.channels();
        RasterView {
            data: self.as_slice(),
            width: self.width(),
            height: self.height(),
            channels,
            stride: self.width() * channels,
        }
    }

    /// Row-major, channel-interleaved bytes of the image.
    pub fn to_buffer(&self) -> Vec<u8> {
        self.view().to_buffer()
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("channels", &self.channels())
            .finish()
    }
}

/// Borrowed interleaved pixels whose rows may be padded to `stride` bytes.
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
}

impl<'a> RasterView<'a> {
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> Result<Self> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(FormatError::Channels(channels).into());
        }
        let row = width.checked_mul(channels).ok_or(FormatError::Overflow {
            width,
            height,
            channels,
        })?;
        if stride < row {
            return Err(FormatError::Stride { stride, row }.into());
        }
        // the last row does not need its padding
        let expected = match height {
            0 => 0,
            h => stride
                .checked_mul(h - 1)
                .and_then(|n| n.checked_add(row))
                .ok_or(FormatError::Overflow {
                    width,
                    height,
                    channels,
                })?,
        };
        if data.len() < expected {
            return Err(FormatError::BufferTooShort {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width * self.channels
    }

    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * self.channels]
    }

    /// Copies the pixels into a packed row-major buffer, dropping row padding.
    pub fn to_buffer(&self) -> Vec<u8> {
        let row = self.width * self.channels;
        if self.is_contiguous() {
            return self.data[..row * self.height].to_vec();
        }
        let mut out = Vec::with_capacity(row * self.height);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }
}

pub(crate) fn packed_len(width: usize, height: usize, channels: usize) -> Result<usize> {
    if !matches!(channels, 1 | 3 | 4) {
        return Err(FormatError::Channels(channels).into());
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            FormatError::Overflow {
                width,
                height,
                channels,
            }
            .into()
        })
}
