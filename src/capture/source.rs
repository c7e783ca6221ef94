//! Frame source seam.
//!
//! Real sensor drivers live outside this crate; they hand frames to the
//! pipeline through [`FrameSource`]. [`SyntheticSource`] stands in for a
//! device in the demo binary and in tests.

use color_eyre::Result;
use tracing::{debug, info};

use super::decoder::encode;
use super::frame::{ColorFrame, DepthFrame, PixelFormat};
use crate::CaptureConfig;

/// A frame delivered by the sensor
#[derive(Debug, Clone)]
pub enum SensorFrame {
    Depth(DepthFrame),
    Color(ColorFrame),
}

pub trait FrameSource: Send {
    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<SensorFrame>>;
}

/// Deterministic moving depth gradient plus a flat color image.
///
/// Depth and color frames alternate, the way a sensor with both streams
/// enabled interleaves its callbacks.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    color_format: PixelFormat,
    sequence: u64,
    color_next: bool,
    limit: Option<u64>,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, color_format: PixelFormat) -> Self {
        Self {
            width,
            height,
            color_format,
            sequence: 0,
            color_next: false,
            limit: None,
        }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        info!(
            "Synthetic source {}x{} @ {} fps",
            config.width, config.height, config.fps
        );
        Self::new(config.width, config.height, config.color_format)
    }

    /// Stop after `frames` depth frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Distance at `(x, y)` for frame `sequence`: bands of 100 mm sweeping
    /// diagonally across the image, 500..=6800 mm.
    pub fn distance_at(x: u32, y: u32, sequence: u64) -> u16 {
        let band = (u64::from(x) + u64::from(y) + sequence) % 64;
        500 + band as u16 * 100
    }

    fn depth_frame(&self) -> DepthFrame {
        let samples: Vec<u16> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| encode(Self::distance_at(x, y, self.sequence), 0))
            .collect();
        DepthFrame::new(self.sequence, self.width, self.height, samples)
    }

    fn color_frame(&self) -> ColorFrame {
        let len = self.width as usize * self.height as usize * self.color_format.bytes_per_pixel();
        let shade = (self.sequence % 256) as u8;
        ColorFrame::new(
            self.sequence,
            self.width,
            self.height,
            self.color_format,
            vec![shade; len],
        )
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<SensorFrame>> {
        if self.color_next {
            self.color_next = false;
            return Ok(Some(SensorFrame::Color(self.color_frame())));
        }
        if self.limit.is_some_and(|limit| self.sequence >= limit) {
            debug!("Synthetic source exhausted after {} frames", self.sequence);
            return Ok(None);
        }
        self.sequence += 1;
        self.color_next = true;
        Ok(Some(SensorFrame::Depth(self.depth_frame())))
    }
}
