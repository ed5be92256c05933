use std::sync::Arc;

use crate::audio::pcm::AudioPcm;
use crate::foundation::error::{StickbugError, StickbugResult};
use crate::render::frame::FrameRGBA;

/// One still raster held for a number of output frames, with an optional audio cue starting when
/// it appears.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Rendered raster.
    pub frame: Arc<FrameRGBA>,
    /// Output frames the raster stays on screen, at least one.
    pub hold_frames: u64,
    /// Cue played from the scene start, cut at the scene end.
    pub cue: Option<Arc<AudioPcm>>,
}

impl Scene {
    /// Scene without audio.
    pub fn silent(frame: FrameRGBA, hold_frames: u64) -> Self {
        Self {
            frame: Arc::new(frame),
            hold_frames: hold_frames.max(1),
            cue: None,
        }
    }

    /// Attach a cue.
    #[must_use]
    pub fn with_cue(mut self, cue: Option<Arc<AudioPcm>>) -> Self {
        self.cue = cue;
        self
    }
}

/// Continuous audio spanning a run of consecutive scenes.
#[derive(Clone, Debug)]
pub struct SpanTrack {
    /// Index of the first covered scene.
    pub first_scene: usize,
    /// Number of covered scenes.
    pub scene_count: usize,
    /// Audio played from the first scene's start, cut at the last scene's end.
    pub pcm: Arc<AudioPcm>,
}

/// Output of the frame compositor: the reveal, hold, transition and morph scenes in order.
#[derive(Clone, Debug, Default)]
pub struct GeneratedSegment {
    /// Scenes in timeline order.
    pub scenes: Vec<Scene>,
    /// Multi-scene audio tracks.
    pub tracks: Vec<SpanTrack>,
}

impl GeneratedSegment {
    /// Total output frames covered by the scenes.
    pub fn total_frames(&self) -> StickbugResult<u64> {
        self.scenes
            .iter()
            .try_fold(0u64, |at, s| at.checked_add(s.hold_frames).ok_or_else(overflow))
    }

    /// Output frame at which each scene starts.
    pub fn scene_starts(&self) -> StickbugResult<Vec<u64>> {
        let mut at = 0u64;
        self.scenes
            .iter()
            .map(|s| {
                let start = at;
                at = at.checked_add(s.hold_frames).ok_or_else(overflow)?;
                Ok(start)
            })
            .collect()
    }
}

fn overflow() -> StickbugError {
    StickbugError::invalid_config("scene hold frames overflow the timeline")
}
