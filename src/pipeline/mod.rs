pub mod color;
pub mod ingest;
pub mod mapper;
pub mod query;
pub mod snapshot;

pub use color::{ColorPassthrough, ColorStats};
pub use ingest::DepthIngest;
pub use mapper::{map_to_pixel, DisplayGeometry, PixelCoord};
pub use query::{DepthQueryService, DepthReading};
pub use snapshot::{FrameSnapshotStore, Snapshot, StoreStats};
