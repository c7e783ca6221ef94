//! Error types for the depth pipeline.
//!
//! Only malformed input is an error here. Missing data (no frame yet, pointer
//! outside the image) is expressed as `None` by the query side.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The frame declares an empty image.
    #[error("frame has zero extent: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    /// Delivered buffer length disagrees with the declared dimensions.
    #[error("frame length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Row pitch is shorter than one row of pixels.
    #[error("stride {stride} shorter than row of {row_bytes} bytes")]
    InvalidStride { stride: u32, row_bytes: usize },

    /// The renderer side of the color channel has gone away.
    #[error("renderer channel closed")]
    ChannelClosed,
}

/// Check that a buffer of `actual` elements covers `width * height` pixels of
/// `per_pixel` elements each.
pub(crate) fn check_extent(
    width: u32,
    height: u32,
    per_pixel: usize,
    actual: usize,
) -> Result<(), FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::ZeroDimension { width, height });
    }
    let expected = width as usize * height as usize * per_pixel;
    if expected != actual {
        return Err(FrameError::LengthMismatch { expected, actual });
    }
    Ok(())
}
