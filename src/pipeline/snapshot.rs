//! Latest-frame store shared between the ingest path and pointer queries.
//!
//! A [`Snapshot`] pairs a raw depth frame with its normalized bytes and is
//! never mutated once built. The store holds at most one, behind an
//! `ArcSwapOption`: publishing swaps the pointer, readers load it. Neither
//! side takes a lock, and a reader always holds one whole snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use crossbeam::utils::CachePadded;
use tracing::{trace, warn};

use crate::error::{check_extent, FrameError};

/// Raw and normalized depth from the same source frame
#[derive(Debug)]
pub struct Snapshot {
    raw: Arc<[u16]>,
    normalized: Arc<[u8]>,
    width: u32,
    height: u32,
    /// Publish counter value, starting at 1
    generation: u64,
}

impl Snapshot {
    /// Packed depth samples exactly as delivered
    pub fn raw(&self) -> &[u16] {
        &self.raw
    }

    /// Display bytes, one per sample
    pub fn normalized(&self) -> &[u8] {
        &self.normalized
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Stats {
    published: AtomicU64,
    rejected: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub published: u64,
    pub rejected: u64,
}

#[derive(Debug, Default)]
pub struct FrameSnapshotStore {
    current: ArcSwapOption<Snapshot>,
    stats: CachePadded<Stats>,
}

impl FrameSnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from one frame's buffers and make it current.
    ///
    /// Both buffers must hold exactly `width * height` elements. On mismatch
    /// nothing is installed and the previous snapshot stays current.
    ///
    /// Single producer: only the ingestion path may call this. Generation
    /// numbering and the swap are separate steps, so concurrent publishers
    /// could install an older generation last.
    pub fn publish(
        &self,
        raw: impl Into<Arc<[u16]>>,
        normalized: impl Into<Arc<[u8]>>,
        width: u32,
        height: u32,
    ) -> Result<Arc<Snapshot>, FrameError> {
        let raw = raw.into();
        let normalized = normalized.into();

        if let Err(e) = check_extent(width, height, 1, raw.len())
            .and_then(|()| check_extent(width, height, 1, normalized.len()))
        {
            self.stats.rejected.fetch_add(1, Ordering::Relaxed);
            warn!("Rejected depth snapshot: {}", e);
            return Err(e);
        }

        let generation = self.stats.published.fetch_add(1, Ordering::Relaxed) + 1;
        let snapshot = Arc::new(Snapshot {
            raw,
            normalized,
            width,
            height,
            generation,
        });
        self.current.store(Some(Arc::clone(&snapshot)));
        trace!(generation, "Published depth snapshot");

        Ok(snapshot)
    }

    /// Latest published snapshot, or `None` before the first frame.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    /// Forget the current snapshot, e.g. when the sensor goes away.
    pub fn clear(&self) {
        self.current.store(None);
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            published: self.stats.published.load(Ordering::Relaxed),
            rejected: self.stats.rejected.load(Ordering::Relaxed),
        }
    }
}
