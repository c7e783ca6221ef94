pub mod decoder;
pub mod frame;
pub mod normalize;
pub mod source;

pub use decoder::DecodedSample;
pub use frame::{ColorFrame, DepthFrame, FrameMetadata, PixelFormat};
pub use normalize::{NormalizeMode, Normalizer};
pub use source::{FrameSource, SensorFrame, SyntheticSource};
