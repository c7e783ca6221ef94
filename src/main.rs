//! depthview demo: synthetic sensor -> depth snapshot store -> pointer queries

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use depthview::{
    ColorPassthrough, Config, DepthIngest, DepthQueryService, FrameSnapshotStore, FrameSource,
    Normalizer, SensorFrame, SyntheticSource, CONFIG_PATH_ENV,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling and logging
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depthview=debug")),
        )
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .init();

    info!("depthview launching...");

    // Load configuration
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    depthview::CONFIG.store(Arc::new(config.clone()));
    info!("Configuration: {:?}", config);

    let store = Arc::new(FrameSnapshotStore::new());
    let ingest = DepthIngest::new(
        Arc::clone(&store),
        Normalizer::new(config.pipeline.normalize),
    );
    let (color, color_rx) = ColorPassthrough::channel(config.pipeline.color_queue_size);
    let query = DepthQueryService::new(Arc::clone(&store));

    // Frame ingestion: one tick per sensor frame period
    let mut source = SyntheticSource::from_config(&config.capture);
    let frame_period = Duration::from_secs_f64(1.0 / f64::from(config.capture.fps.max(1)));
    let capture_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(frame_period);
        loop {
            ticker.tick().await;
            // a sensor tick delivers one depth and one color frame
            for _ in 0..2 {
                match source.next_frame() {
                    Ok(Some(SensorFrame::Depth(frame))) => {
                        if let Err(e) = ingest.ingest(frame) {
                            debug!("Depth frame dropped: {}", e);
                        }
                    }
                    Ok(Some(SensorFrame::Color(frame))) => {
                        if let Err(e) = color.forward(frame) {
                            error!("Failed to forward color frame: {}", e);
                            return color.stats();
                        }
                    }
                    Ok(None) => {
                        info!("Frame source exhausted");
                        return color.stats();
                    }
                    Err(e) => {
                        error!("Capture error: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        }
    });

    // Renderer stand-in: drains color frames, picks up the latest depth image
    let render_store = Arc::clone(&store);
    let render_handle = tokio::spawn(async move {
        let mut last_generation = 0;
        while let Ok(frame) = color_rx.recv_async().await {
            debug!(
                "Color frame {} ({} bytes, stride {})",
                frame.meta.sequence,
                frame.data.len(),
                frame.stride
            );
            if let Some(snap) = render_store.current() {
                if snap.generation() != last_generation {
                    last_generation = snap.generation();
                    debug!(
                        "Depth image {} ({}x{}, {} bytes)",
                        snap.generation(),
                        snap.width(),
                        snap.height(),
                        snap.normalized().len()
                    );
                }
            }
        }
    });

    // Pointer stand-in: sweeps diagonally across the depth surface. Geometry
    // comes from the global config each tick so a resized surface is picked up.
    let poll = Duration::from_millis(config.pipeline.pointer_poll_ms.max(1));
    let pointer_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll);
        let mut step = 0u32;
        loop {
            ticker.tick().await;
            let geometry = depthview::CONFIG.load().display_geometry();
            let t = f64::from(step % 100) / 100.0;
            let (px, py) = (t * geometry.display_width, t * geometry.display_height);
            match query.query_depth_at(px, py, &geometry) {
                Some(reading) => info!("{}", reading),
                None => debug!("No depth at ({:.1}, {:.1})", px, py),
            }
            step = step.wrapping_add(1);
        }
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        result = capture_handle => {
            let color_stats = result?;
            info!(
                "Color frames forwarded: {}, dropped: {}",
                color_stats.forwarded, color_stats.dropped
            );
        }
    }

    pointer_handle.abort();
    render_handle.abort();

    let stats = store.stats();
    info!(
        "depthview shutting down: {} snapshots published, {} rejected",
        stats.published, stats.rejected
    );
    Ok(())
}
