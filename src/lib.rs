pub mod capture;
pub mod error;
pub mod pipeline;

use std::path::Path;

use arc_swap::ArcSwap;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use capture::{
    ColorFrame, DepthFrame, FrameMetadata, FrameSource, NormalizeMode, Normalizer, PixelFormat,
    SensorFrame, SyntheticSource,
};
pub use error::FrameError;
pub use pipeline::{
    ColorPassthrough, DepthIngest, DepthQueryService, DepthReading, DisplayGeometry,
    FrameSnapshotStore, Snapshot,
};

/// Global configuration that can be atomically swapped at runtime
pub static CONFIG: once_cell::sync::Lazy<ArcSwap<Config>> =
    once_cell::sync::Lazy::new(|| ArcSwap::from_pointee(Config::default()));

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "DEPTHVIEW_CONFIG";

/// System configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub display: DisplayConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub color_format: PixelFormat,
}

/// Initial size of the rendered depth surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Color frames queued for the renderer before the oldest is dropped
    pub color_queue_size: usize,
    pub normalize: NormalizeMode,
    pub pointer_poll_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
            color_format: PixelFormat::Bgr32,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            color_queue_size: 4,
            normalize: NormalizeMode::Legacy,
            pointer_poll_ms: 100,
        }
    }
}

impl Config {
    /// Load from an optional TOML file, then `DEPTHVIEW__*` environment
    /// overrides (`DEPTHVIEW__CAPTURE__FPS=15`). Without a path,
    /// `depthview.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                config::File::from(path).required(true)
            }
            None => config::File::with_name("depthview").required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("DEPTHVIEW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Geometry of the configured depth surface over the captured image
    pub fn display_geometry(&self) -> DisplayGeometry {
        DisplayGeometry::new(
            self.capture.width,
            self.capture.height,
            self.display.width,
            self.display.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.capture.height, 480);
        assert_eq!(config.capture.fps, 30);
        assert_eq!(config.pipeline.normalize, NormalizeMode::Legacy);
        assert_eq!(
            config.display_geometry(),
            DisplayGeometry::identity(640, 480)
        );
    }

    #[test]
    fn test_config_load_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.pipeline.color_queue_size, 4);
    }

    #[test]
    fn test_global_config_swap() {
        let mut resized = Config::default();
        resized.display.width = 1280.0;
        CONFIG.store(Arc::new(resized));

        let geometry = CONFIG.load().display_geometry();
        assert_eq!(geometry, DisplayGeometry::new(640, 480, 1280.0, 480.0));

        CONFIG.store(Arc::new(Config::default()));
    }

    #[test]
    fn test_config_env_overrides() {
        let vars = [
            ("DEPTHVIEW__CAPTURE__FPS", "15"),
            ("DEPTHVIEW__PIPELINE__NORMALIZE__MODE", "ranged"),
            ("DEPTHVIEW__PIPELINE__NORMALIZE__MIN_MM", "500"),
            ("DEPTHVIEW__PIPELINE__NORMALIZE__MAX_MM", "4000"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let loaded = Config::load(None);

        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let config = loaded.unwrap();
        assert_eq!(config.capture.fps, 15);
        assert_eq!(config.capture.width, 640);
        assert_eq!(
            config.pipeline.normalize,
            NormalizeMode::Ranged {
                min_mm: 500,
                max_mm: 4000
            }
        );
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [capture]
            fps = 15

            [display]
            width = 1280.0

            [pipeline.normalize]
            mode = "ranged"
            min_mm = 500
            max_mm = 4000
        "#;
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.capture.fps, 15);
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.display.width, 1280.0);
        assert_eq!(
            config.pipeline.normalize,
            NormalizeMode::Ranged {
                min_mm: 500,
                max_mm: 4000
            }
        );
    }
}
