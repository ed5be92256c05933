//! Final clip assembly.
//!
//! Scenes are expanded into a per-frame sequence, the closing clip is placed with the same
//! scale-to-fit rule as the source image and appended right after the generated part, and every
//! audio contribution is scheduled at its scene's start in timeline sample space.

use std::sync::Arc;

use image::RgbaImage;

use crate::audio::mix::{AudioManifest, frame_to_sample};
use crate::audio::pcm::{AudioPcm, MIX_SAMPLE_RATE};
use crate::config::MAX_TIMELINE_FRAMES;
use crate::foundation::core::{FrameIndex, Fps, Resolution, Rgb8};
use crate::foundation::error::{StickbugError, StickbugResult};
use crate::place::place;
use crate::render::canvas::LineCanvas;
use crate::render::frame::FrameRGBA;
use crate::timeline::fingerprint::{ClipFingerprint, fingerprint_clip};
use crate::timeline::scene::GeneratedSegment;

/// Output channel count of the mixed soundtrack.
pub const MIX_CHANNELS: u16 = 2;

/// Pre-rendered clip appended after the generated scenes.
#[derive(Clone, Debug)]
pub struct ClosingClip {
    /// Rate the frames were decoded at.
    pub fps: Fps,
    /// Decoded frames at their source size.
    pub frames: Vec<Arc<RgbaImage>>,
}

impl ClosingClip {
    /// Number of output frames the clip lasts at `out_fps`.
    pub fn len_at(&self, out_fps: Fps) -> u64 {
        let num = self.frames.len() as u128 * u128::from(self.fps.den) * u128::from(out_fps.num);
        let den = u128::from(self.fps.num) * u128::from(out_fps.den);
        if den == 0 {
            return 0;
        }
        num.div_ceil(den) as u64
    }

    /// Source frame shown at output frame `j` (nearest earlier source frame).
    fn source_index(&self, j: u64, out_fps: Fps) -> usize {
        let num = u128::from(j) * u128::from(self.fps.num) * u128::from(out_fps.den);
        let den = u128::from(self.fps.den) * u128::from(out_fps.num);
        let idx = if den == 0 { 0 } else { num / den };
        (idx as usize).min(self.frames.len().saturating_sub(1))
    }
}

/// A finished, frame-addressable clip with its audio plan.
#[derive(Clone, Debug)]
pub struct Clip {
    /// Frame size.
    pub resolution: Resolution,
    /// Frame rate.
    pub fps: Fps,
    /// One entry per output frame. Held scenes share their raster.
    pub frames: Vec<Arc<FrameRGBA>>,
    /// Soundtrack schedule.
    pub audio: AudioManifest,
    /// Frames produced by the compositor; the closing clip starts here.
    pub generated_frames: u64,
}

impl Clip {
    /// Number of output frames.
    pub fn len_frames(&self) -> u64 {
        self.frames.len() as u64
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.len_frames())
    }

    /// Frame at `index`, if in range.
    pub fn frame(&self, index: FrameIndex) -> Option<&Arc<FrameRGBA>> {
        usize::try_from(index.0).ok().and_then(|i| self.frames.get(i))
    }

    /// Deterministic content hash.
    pub fn fingerprint(&self) -> ClipFingerprint {
        fingerprint_clip(self)
    }
}

/// Joins the generated scenes, the closing clip and the audio.
#[derive(Clone, Debug)]
pub struct TimelineAssembler {
    resolution: Resolution,
    fps: Fps,
    background: Rgb8,
    ambient: Option<Arc<AudioPcm>>,
}

impl TimelineAssembler {
    /// Assembler writing `resolution` frames at `fps`; letterbox areas of the closing clip use
    /// `background`.
    pub fn new(resolution: Resolution, fps: Fps, background: Rgb8) -> Self {
        Self {
            resolution,
            fps,
            background,
            ambient: None,
        }
    }

    /// Track mixed in from the first frame.
    #[must_use]
    pub fn with_ambient(mut self, ambient: Option<Arc<AudioPcm>>) -> Self {
        self.ambient = ambient;
        self
    }

    /// Build the final clip.
    #[tracing::instrument(skip_all, fields(scenes = generated.scenes.len()))]
    pub fn assemble(
        &self,
        generated: &GeneratedSegment,
        closing: Option<&ClosingClip>,
        closing_audio: Option<&Arc<AudioPcm>>,
    ) -> StickbugResult<Clip> {
        let starts = generated.scene_starts()?;
        let generated_frames = generated.total_frames()?;
        if generated_frames > MAX_TIMELINE_FRAMES {
            return Err(StickbugError::invalid_config(format!(
                "{generated_frames} generated frames exceed {MAX_TIMELINE_FRAMES}"
            )));
        }

        let mut frames = Vec::with_capacity(generated_frames as usize);
        for scene in &generated.scenes {
            if scene.frame.resolution() != self.resolution {
                return Err(StickbugError::invalid_config(format!(
                    "scene is {}x{}, clip is {}x{}",
                    scene.frame.width,
                    scene.frame.height,
                    self.resolution.width,
                    self.resolution.height
                )));
            }
            for _ in 0..scene.hold_frames {
                frames.push(Arc::clone(&scene.frame));
            }
        }

        if let Some(clip) = closing.filter(|c| !c.frames.is_empty()) {
            self.append_closing(&mut frames, clip)?;
        }

        let total_frames = frames.len() as u64;
        let sample = |frame: u64| frame_to_sample(frame, self.fps, MIX_SAMPLE_RATE);
        let mut audio = AudioManifest::silent(MIX_SAMPLE_RATE, MIX_CHANNELS, sample(total_frames));

        if let Some(ambient) = &self.ambient {
            audio.schedule(Arc::clone(ambient), 0, None);
        }
        for (scene, &start) in generated.scenes.iter().zip(&starts) {
            if let Some(cue) = &scene.cue {
                let (s0, s1) = (sample(start), sample(start + scene.hold_frames));
                audio.schedule(Arc::clone(cue), s0, Some(s1 - s0));
            }
        }
        for track in &generated.tracks {
            let last = track.first_scene + track.scene_count;
            if track.scene_count == 0 || last > generated.scenes.len() {
                continue;
            }
            let start = starts[track.first_scene];
            let end = starts[last - 1] + generated.scenes[last - 1].hold_frames;
            let (s0, s1) = (sample(start), sample(end));
            audio.schedule(Arc::clone(&track.pcm), s0, Some(s1 - s0));
        }
        if let Some(pcm) = closing_audio {
            if total_frames > generated_frames {
                audio.schedule(Arc::clone(pcm), sample(generated_frames), None);
            } else {
                tracing::warn!("closing audio dropped: no closing clip frames to play it over");
            }
        }

        tracing::debug!(
            frames = total_frames,
            generated = generated_frames,
            audio_segments = audio.segments.len(),
            "assembled clip"
        );
        Ok(Clip {
            resolution: self.resolution,
            fps: self.fps,
            frames,
            audio,
            generated_frames,
        })
    }

    fn append_closing(
        &self,
        frames: &mut Vec<Arc<FrameRGBA>>,
        clip: &ClosingClip,
    ) -> StickbugResult<()> {
        let mut canvas = LineCanvas::new(self.resolution)?;
        let mut rendered: Vec<Option<Arc<FrameRGBA>>> = vec![None; clip.frames.len()];

        for j in 0..clip.len_at(self.fps) {
            let src = clip.source_index(j, self.fps);
            let frame = match &rendered[src] {
                Some(f) => Arc::clone(f),
                None => {
                    let (scaled, p) = place(&clip.frames[src], self.resolution);
                    canvas.clear(self.background);
                    canvas.blit(&scaled, p.offset)?;
                    let f = Arc::new(canvas.snapshot());
                    rendered[src] = Some(Arc::clone(&f));
                    f
                }
            };
            frames.push(frame);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
