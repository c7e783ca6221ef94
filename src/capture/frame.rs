use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{check_extent, FrameError};

/// Frame metadata shared by depth and color frames
#[derive(Debug, Clone)]
pub struct FrameMetadata {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Arrival time, for latency tracking
    pub timestamp: Instant,
}

impl FrameMetadata {
    pub fn new(sequence: u64, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            sequence,
            width,
            height,
            format,
            timestamp: Instant::now(),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Pixel formats delivered by the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 4 bytes per pixel, blue first, last byte unused
    Bgr32,
    Rgb24,
    /// Packed 16-bit depth: distance << 3 | player index
    Depth16,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgr32 => 4,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Depth16 => 2,
        }
    }
}

/// One raw depth frame, row-major `width * height` samples.
///
/// Samples sit behind an `Arc` so publishing a frame hands the buffer to the
/// snapshot store without copying it.
#[derive(Debug, Clone)]
pub struct DepthFrame {
    pub samples: Arc<[u16]>,
    pub meta: Arc<FrameMetadata>,
}

impl DepthFrame {
    pub fn new(sequence: u64, width: u32, height: u32, samples: impl Into<Arc<[u16]>>) -> Self {
        Self {
            samples: samples.into(),
            meta: Arc::new(FrameMetadata::new(
                sequence,
                width,
                height,
                PixelFormat::Depth16,
            )),
        }
    }

    pub fn width(&self) -> u32 {
        self.meta.width
    }

    pub fn height(&self) -> u32 {
        self.meta.height
    }

    /// Check the sample count against the declared dimensions.
    pub fn validate(&self) -> Result<(), FrameError> {
        check_extent(self.meta.width, self.meta.height, 1, self.samples.len())
    }
}

/// Opaque color frame, forwarded to the renderer untouched
#[derive(Debug, Clone)]
pub struct ColorFrame {
    pub data: Bytes,
    pub meta: Arc<FrameMetadata>,
    /// Bytes per row
    pub stride: u32,
}

impl ColorFrame {
    pub fn new(
        sequence: u64,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            data: data.into(),
            meta: Arc::new(FrameMetadata::new(sequence, width, height, format)),
            stride: width * format.bytes_per_pixel() as u32,
        }
    }

    /// Override the row pitch for sources that pad each row.
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    /// Rows must fit their pixels and the buffer must hold exactly
    /// `stride * height` bytes.
    pub fn validate(&self) -> Result<(), FrameError> {
        let (width, height) = (self.meta.width, self.meta.height);
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroDimension { width, height });
        }
        let row_bytes = width as usize * self.meta.format.bytes_per_pixel();
        if (self.stride as usize) < row_bytes {
            return Err(FrameError::InvalidStride {
                stride: self.stride,
                row_bytes,
            });
        }
        check_extent(self.stride, height, 1, self.data.len())
    }
}
