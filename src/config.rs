//! Pipeline configuration.
//!
//! Defaults reproduce the classic stick-bug look. A JSON file may override any subset of fields;
//! the CLI layers explicit flags on top of that.

use std::path::Path;

use anyhow::Context as _;

use crate::detect::MAX_DETECTOR_SCALE;
use crate::foundation::core::{Fps, Resolution, Rgb8};
use crate::foundation::error::{StickbugError, StickbugResult};
use crate::segment::layout::TargetLayoutDef;
use crate::segment::rank::RankMode;

/// Longest generated timeline, in output frames, a configuration may describe.
pub const MAX_TIMELINE_FRAMES: u64 = 1 << 20;

/// Upper bound on the morph frame count.
pub const MAX_MORPH_FRAMES: u32 = 10_000;

/// Hold durations (seconds) of the still scenes emitted before the morph.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneTimings {
    /// Plain image scene.
    pub image_secs: f64,
    /// Each single-segment reveal scene.
    pub reveal_secs: f64,
    /// Hold after the last reveal.
    pub hold_secs: f64,
    /// Transition scene where the image disappears.
    pub transition_secs: f64,
}

impl Default for SceneTimings {
    fn default() -> Self {
        Self {
            image_secs: 1.0,
            reveal_secs: 0.4,
            hold_secs: 1.0,
            transition_secs: 0.6,
        }
    }
}

impl SceneTimings {
    fn validate(&self, fps: Fps) -> StickbugResult<()> {
        for (name, v) in [
            ("image_secs", self.image_secs),
            ("reveal_secs", self.reveal_secs),
            ("hold_secs", self.hold_secs),
            ("transition_secs", self.transition_secs),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(StickbugError::invalid_config(format!(
                    "timings.{name} must be a positive number of seconds, got {v}"
                )));
            }
            // `Fps::hold_frames` must stay below its saturating cast.
            if v * fps.as_f64() > MAX_TIMELINE_FRAMES as f64 {
                return Err(StickbugError::invalid_config(format!(
                    "timings.{name} = {v}s exceeds {MAX_TIMELINE_FRAMES} frames"
                )));
            }
        }
        Ok(())
    }
}

/// All knobs of a pipeline instance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Output video size.
    pub resolution: Resolution,
    /// Opaque scale factor handed to the line detector.
    pub detector_scale: f64,
    /// Background behind the image while it is visible.
    pub image_bg_color: Rgb8,
    /// Stroke color of the segments.
    pub line_color: Rgb8,
    /// Background once the image has disappeared.
    pub line_bg_color: Rgb8,
    /// Key used to pick the top-K detected segments.
    pub rank_mode: RankMode,
    /// End pose; its length is K.
    pub target: TargetLayoutDef,
    /// Number of morph frames (N).
    pub morph_frames: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Still-scene hold durations.
    pub timings: SceneTimings,
    /// Rasterise morph frames on the rayon pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            detector_scale: 0.8,
            image_bg_color: Rgb8::new(0, 0, 0),
            line_color: Rgb8::new(255, 255, 211),
            line_bg_color: Rgb8::new(125, 115, 119),
            rank_mode: RankMode::ByLength,
            target: TargetLayoutDef::default(),
            morph_frames: 52,
            fps: Fps::default(),
            timings: SceneTimings::default(),
            parallel: false,
        }
    }
}

/// Earliest pipeline stage affected by a configuration change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConfigImpact {
    None,
    Video,
    Segments,
}

impl PipelineConfig {
    /// Load a (possibly partial) JSON configuration; missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> StickbugResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes).map_err(|e| {
            StickbugError::invalid_config(format!("config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Number of segments every ranked set and frame must contain.
    pub fn segment_count(&self) -> usize {
        self.target.segments.len()
    }

    /// Check every field; the first violation is returned.
    pub fn validate(&self) -> StickbugResult<()> {
        self.resolution.validate()?;
        if !self.detector_scale.is_finite()
            || self.detector_scale <= 0.0
            || self.detector_scale > MAX_DETECTOR_SCALE
        {
            return Err(StickbugError::invalid_config(format!(
                "detector_scale must be in (0, {MAX_DETECTOR_SCALE}], got {}",
                self.detector_scale
            )));
        }
        if self.morph_frames == 0 || self.morph_frames > MAX_MORPH_FRAMES {
            return Err(StickbugError::invalid_config(format!(
                "morph_frames must be in 1..={MAX_MORPH_FRAMES}, got {}",
                self.morph_frames
            )));
        }
        let fps = Fps::new(self.fps.num, self.fps.den)?;
        self.timings.validate(fps)?;
        self.target.validate()?;
        self.generated_frames()?;
        Ok(())
    }

    /// Frames the compositor emits before the closing clip.
    ///
    /// # Errors
    ///
    /// [`StickbugError::InvalidConfiguration`] if the total exceeds [`MAX_TIMELINE_FRAMES`].
    pub fn generated_frames(&self) -> StickbugResult<u64> {
        let t = &self.timings;
        let hold = |secs: f64| self.fps.hold_frames(secs);
        let k = self.segment_count() as u64;
        k.checked_mul(hold(t.reveal_secs))
            .and_then(|v| v.checked_add(hold(t.image_secs)))
            .and_then(|v| v.checked_add(hold(t.hold_secs)))
            .and_then(|v| v.checked_add(hold(t.transition_secs)))
            .and_then(|v| v.checked_add(u64::from(self.morph_frames)))
            .filter(|&v| v <= MAX_TIMELINE_FRAMES)
            .ok_or_else(|| {
                StickbugError::invalid_config(format!(
                    "scene timings describe more than {MAX_TIMELINE_FRAMES} frames"
                ))
            })
    }

    /// Classify how far upstream a switch from `self` to `next` invalidates cached work.
    ///
    /// Resolution changes reach the segments because both the centering offset and the fitted
    /// target depend on them.
    pub(crate) fn impact_of(&self, next: &Self) -> ConfigImpact {
        if self.resolution != next.resolution
            || self.detector_scale != next.detector_scale
            || self.rank_mode != next.rank_mode
            || self.target != next.target
        {
            return ConfigImpact::Segments;
        }
        if self.image_bg_color != next.image_bg_color
            || self.line_color != next.line_color
            || self.line_bg_color != next.line_bg_color
            || self.morph_frames != next.morph_frames
            || self.fps != next.fps
            || self.timings != next.timings
        {
            return ConfigImpact::Video;
        }
        ConfigImpact::None
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
