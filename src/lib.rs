//! Stickbug turns a still image into a short "stick bug" video.
//!
//! Line segments are detected in the image, ranked, revealed one by one over the picture and then
//! morphed into a fixed stick-insect pose, followed by an optional pre-rendered closing clip.
//!
//! The entry point is [`PipelineCache`]: set an image, read [`PipelineCache::video`], and stream
//! the result into a [`FrameSink`]. Every derived stage is computed lazily and recomputed only when
//! one of its inputs changes.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Closing clip and audio cue loading.
pub mod assets;
/// Audio PCM, scheduling and mixing.
pub mod audio;
/// Pipeline configuration.
pub mod config;
/// Line detection seam and the default detector.
pub mod detect;
/// Encoding sinks.
pub mod encode;
/// Lazy stage orchestration.
pub mod pipeline;
/// Scale-to-fit placement.
pub mod place;
/// Raster canvas and the frame compositor.
pub mod render;
/// Segments, ranking, interpolation and the target pose.
pub mod segment;
/// Scenes, clips and final assembly.
pub mod timeline;

pub use crate::foundation::core::{Fps, FrameIndex, Line, Point, Resolution, Rgb8};
pub use crate::foundation::error::{StickbugError, StickbugResult};

pub use crate::assets::{AssetPaths, StaticAssets};
pub use crate::audio::pcm::AudioPcm;
pub use crate::config::{PipelineConfig, SceneTimings};
pub use crate::detect::{HoughDetector, LineDetector};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::write_clip;
pub use crate::pipeline::cache::{PipelineCache, Video};
pub use crate::pipeline::stage::{StageId, StageState};
pub use crate::place::{Offset, Placement, place};
pub use crate::render::compositor::{Backdrop, CueSet, FrameCompositor};
pub use crate::render::frame::FrameRGBA;
pub use crate::segment::Segment;
pub use crate::segment::interp::{InterpFrame, interpolate};
pub use crate::segment::layout::{STICK_BUG_1280X720, TargetLayout, TargetLayoutDef};
pub use crate::segment::rank::{RankMode, rank};
pub use crate::timeline::assemble::{Clip, ClosingClip, TimelineAssembler};
pub use crate::timeline::scene::{GeneratedSegment, Scene, SpanTrack};
