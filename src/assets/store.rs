//! Static assets shared by every pipeline in the process.
//!
//! The closing clip and the audio cues are decoded once and installed into a process-wide slot
//! before any pipeline is built. Installed assets are never replaced.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::assets::media::{decode_audio_f32_stereo, decode_video_frames, probe_video};
use crate::audio::pcm::{AudioPcm, MIX_SAMPLE_RATE};
use crate::foundation::core::Fps;
use crate::foundation::error::{StickbugError, StickbugResult};
use crate::render::compositor::CueSet;
use crate::timeline::assemble::ClosingClip;

static INSTALLED: OnceLock<StaticAssets> = OnceLock::new();
static EMPTY: StaticAssets = StaticAssets::empty();

/// Where to load each asset from. Everything is optional.
#[derive(Clone, Debug, Default)]
pub struct AssetPaths {
    /// Video appended after the morph.
    pub closing_clip: Option<PathBuf>,
    /// Audio for the closing clip. Defaults to the clip's own soundtrack.
    pub closing_audio: Option<PathBuf>,
    /// One cue per revealed segment, in rank order.
    pub reveal_cues: Vec<PathBuf>,
    /// Cue for the transition scene.
    pub transition_cue: Option<PathBuf>,
    /// Track spanning the morph.
    pub transform_cue: Option<PathBuf>,
    /// Track playing from the first frame.
    pub ambient: Option<PathBuf>,
}

/// Decoded, immutable assets.
#[derive(Clone, Debug)]
pub struct StaticAssets {
    /// Closing clip frames.
    pub closing_clip: Option<ClosingClip>,
    /// Audio started with the closing clip.
    pub closing_audio: Option<Arc<AudioPcm>>,
    /// Reveal cues, in rank order.
    pub reveal_cues: Vec<Arc<AudioPcm>>,
    /// Transition cue.
    pub transition_cue: Option<Arc<AudioPcm>>,
    /// Morph track.
    pub transform_cue: Option<Arc<AudioPcm>>,
    /// Ambient track.
    pub ambient: Option<Arc<AudioPcm>>,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self::empty()
    }
}

impl StaticAssets {
    /// No clip and no audio.
    pub const fn empty() -> Self {
        Self {
            closing_clip: None,
            closing_audio: None,
            reveal_cues: Vec::new(),
            transition_cue: None,
            transform_cue: None,
            ambient: None,
        }
    }

    /// The shared empty set.
    pub fn empty_ref() -> &'static Self {
        &EMPTY
    }

    /// Decode everything named in `paths`; the closing clip is resampled to `fps`.
    #[tracing::instrument(skip_all)]
    pub fn load(paths: &AssetPaths, fps: Fps) -> StickbugResult<Self> {
        if paths.closing_audio.is_some() && paths.closing_clip.is_none() {
            return Err(StickbugError::invalid_config(
                "closing audio needs a closing clip to play over",
            ));
        }
        let audio = |p: &PathBuf| -> StickbugResult<Arc<AudioPcm>> {
            Ok(Arc::new(decode_audio_f32_stereo(p, MIX_SAMPLE_RATE)?))
        };

        let mut closing_clip = None;
        let mut closing_audio = paths.closing_audio.as_ref().map(audio).transpose()?;
        if let Some(path) = &paths.closing_clip {
            let info = probe_video(path)?;
            let frames = decode_video_frames(&info, fps)?;
            if frames.is_empty() {
                return Err(StickbugError::media(format!(
                    "closing clip '{}' has no frames",
                    path.display()
                )));
            }
            if closing_audio.is_none() && info.has_audio {
                closing_audio = Some(audio(path)?);
            }
            tracing::info!(path = %path.display(), frames = frames.len(), "loaded closing clip");
            closing_clip = Some(ClosingClip {
                fps,
                frames: frames.into_iter().map(Arc::new).collect(),
            });
        }

        Ok(Self {
            closing_clip,
            closing_audio,
            reveal_cues: paths
                .reveal_cues
                .iter()
                .map(audio)
                .collect::<StickbugResult<_>>()?,
            transition_cue: paths.transition_cue.as_ref().map(audio).transpose()?,
            transform_cue: paths.transform_cue.as_ref().map(audio).transpose()?,
            ambient: paths.ambient.as_ref().map(audio).transpose()?,
        })
    }

    /// Cues in the shape the compositor consumes.
    pub fn cues(&self) -> CueSet {
        CueSet {
            reveal: self.reveal_cues.clone(),
            transition: self.transition_cue.clone(),
            transform: self.transform_cue.clone(),
        }
    }
}

/// Install the process-wide assets. Fails if assets were already installed.
pub fn install(assets: StaticAssets) -> StickbugResult<&'static StaticAssets> {
    INSTALLED
        .set(assets)
        .map_err(|_| StickbugError::invalid_config("static assets are already installed"))?;
    INSTALLED
        .get()
        .ok_or_else(|| StickbugError::invalid_config("static assets failed to install"))
}

/// The installed assets, if any.
pub fn installed() -> Option<&'static StaticAssets> {
    INSTALLED.get()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
