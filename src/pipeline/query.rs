use std::fmt;
use std::sync::Arc;

use super::mapper::{map_to_pixel, DisplayGeometry};
use super::snapshot::FrameSnapshotStore;
use crate::capture::decoder::decode;

/// True depth under a pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthReading {
    pub x: u32,
    pub y: u32,
    pub distance_mm: u16,
}

impl fmt::Display for DepthReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Depth at ({}, {}): {} mm",
            self.x, self.y, self.distance_mm
        )
    }
}

/// Answers pointer queries against the latest published depth frame.
///
/// Reads the raw samples, not the normalized bytes, so the reported distance
/// is the sensor's full-precision value.
#[derive(Debug, Clone)]
pub struct DepthQueryService {
    store: Arc<FrameSnapshotStore>,
}

impl DepthQueryService {
    pub fn new(store: Arc<FrameSnapshotStore>) -> Self {
        Self { store }
    }

    pub fn query_depth_at(&self, px: f64, py: f64, geom: &DisplayGeometry) -> Option<DepthReading> {
        let snap = self.store.current()?;
        let pixel = map_to_pixel(px, py, geom)?;

        // geometry may describe a different resolution than the snapshot
        // while the surface is being resized
        let sample = *snap.raw().get(pixel.index(snap.width()))?;

        Some(DepthReading {
            x: pixel.x,
            y: pixel.y,
            distance_mm: decode(sample).distance_mm,
        })
    }
}
