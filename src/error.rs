use kornia::image::ImageError;

/// Why a pixel buffer could not be adapted into an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unsupported channel count {0}, expected 1, 3 or 4")]
    Channels(usize),

    #[error("buffer holds {actual} bytes, expected at least {expected}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("buffer holds {actual} bytes, expected exactly {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("image dimensions {width}x{height}x{channels} overflow")]
    Overflow {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("row stride {stride} is shorter than a row of {row} bytes")]
    Stride { stride: usize, row: usize },
}

/// Errors that fail a whole extraction call.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid pixel format: {0}")]
    InvalidFormat(#[from] FormatError),

    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),

    #[error("kornia image error: {0}")]
    Kornia(#[from] ImageError),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
