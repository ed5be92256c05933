/// `ffprobe`/`ffmpeg` decoding of clips and audio.
pub mod media;
/// Process-wide immutable asset set.
pub mod store;

pub use store::{AssetPaths, StaticAssets, install, installed};
