//! Depth frame ingestion: validate, normalize, publish.

use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;

use super::snapshot::{FrameSnapshotStore, Snapshot};
use crate::capture::{DepthFrame, Normalizer};
use crate::error::FrameError;

/// Producer side of the snapshot store. Runs once per sensor depth frame.
pub struct DepthIngest {
    store: Arc<FrameSnapshotStore>,
    normalizer: Normalizer,
}

impl DepthIngest {
    pub fn new(store: Arc<FrameSnapshotStore>, normalizer: Normalizer) -> Self {
        Self { store, normalizer }
    }

    pub fn store(&self) -> &Arc<FrameSnapshotStore> {
        &self.store
    }

    /// Normalize `frame` and publish it with its raw samples as one snapshot.
    ///
    /// A malformed frame is dropped and the previous snapshot stays current.
    #[instrument(skip_all, fields(sequence = frame.meta.sequence))]
    pub fn ingest(&self, frame: DepthFrame) -> Result<Arc<Snapshot>, FrameError> {
        let start = Instant::now();

        let (width, height) = (frame.width(), frame.height());
        let normalized = self.normalizer.normalize_frame(&frame.samples);
        // raw samples move into the snapshot without a copy; the store
        // rejects and counts a frame whose length disagrees with its size
        let snapshot = match self
            .store
            .publish(frame.samples, normalized, width, height)
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                metrics::counter!("depth_frames_dropped").increment(1);
                return Err(e);
            }
        };

        metrics::counter!("depth_frames_published").increment(1);
        metrics::histogram!("depth_ingest_time_us").record(start.elapsed().as_micros() as f64);
        metrics::histogram!("depth_frame_latency_ms")
            .record(frame.meta.timestamp.elapsed().as_secs_f64() * 1000.0);

        Ok(snapshot)
    }
}
