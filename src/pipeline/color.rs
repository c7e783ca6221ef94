//! Color frame passthrough to the renderer.
//!
//! Color frames are not transformed, only validated and handed over. The
//! channel is bounded; when the renderer falls behind the oldest queued frame
//! is dropped so it always catches up to the newest one.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::utils::CachePadded;
use flume::{Receiver, Sender, TrySendError};
use tracing::debug;

use crate::capture::ColorFrame;
use crate::error::FrameError;

#[derive(Debug, Default)]
struct Stats {
    forwarded: AtomicU64,
    dropped: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorStats {
    pub forwarded: u64,
    pub dropped: u64,
}

pub struct ColorPassthrough {
    tx: Sender<ColorFrame>,
    /// Producer-side handle used only to evict the oldest queued frame
    evict: Receiver<ColorFrame>,
    stats: CachePadded<Stats>,
}

impl ColorPassthrough {
    /// Create the passthrough and the receiver the renderer drains.
    pub fn channel(capacity: usize) -> (Self, Receiver<ColorFrame>) {
        let (tx, rx) = flume::bounded(capacity.max(1));
        let passthrough = Self {
            tx,
            evict: rx.clone(),
            stats: CachePadded::new(Stats::default()),
        };
        (passthrough, rx)
    }

    /// Forward `frame` unchanged.
    ///
    /// Fails on a malformed frame or once every renderer receiver is gone.
    pub fn forward(&self, frame: ColorFrame) -> Result<(), FrameError> {
        frame.validate()?;

        // our own eviction handle does not count as a renderer
        if self.tx.receiver_count() <= 1 {
            return Err(FrameError::ChannelClosed);
        }

        let mut frame = frame;
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => {
                    self.stats.forwarded.fetch_add(1, Ordering::Relaxed);
                    return Ok(());
                }
                Err(TrySendError::Full(rejected)) => {
                    if let Ok(old) = self.evict.try_recv() {
                        debug!("Renderer behind, dropping color frame {}", old.meta.sequence);
                        self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                        metrics::counter!("color_frames_dropped").increment(1);
                    }
                    frame = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return Err(FrameError::ChannelClosed),
            }
        }
    }

    pub fn stats(&self) -> ColorStats {
        ColorStats {
            forwarded: self.stats.forwarded.load(Ordering::Relaxed),
            dropped: self.stats.dropped.load(Ordering::Relaxed),
        }
    }
}
