//! Scene generation for the "line reveal, morph, hold" part of the video.
//!
//! Phases, in order:
//! 1. the placed image over the image background,
//! 2. one scene per ranked segment, strokes accumulating on top of the image,
//! 3. a longer hold of the final reveal canvas,
//! 4. the transition: image gone, all source lines on the line background,
//! 5. one single-frame scene per morph step, each fully redrawn.

use std::sync::Arc;

use image::RgbaImage;
use rayon::prelude::*;

use crate::audio::pcm::AudioPcm;
use crate::config::{PipelineConfig, SceneTimings};
use crate::foundation::core::{Fps, Resolution, Rgb8};
use crate::foundation::error::{StickbugError, StickbugResult};
use crate::place::Offset;
use crate::render::canvas::LineCanvas;
use crate::render::frame::FrameRGBA;
use crate::segment::Segment;
use crate::segment::interp::InterpFrame;
use crate::timeline::scene::{GeneratedSegment, Scene, SpanTrack};

/// Already scaled image and where it sits on the canvas.
#[derive(Clone, Copy, Debug)]
pub struct Backdrop<'a> {
    /// Placed raster.
    pub image: &'a RgbaImage,
    /// Its centering offset.
    pub offset: Offset,
}

/// Audio cues attached while compositing.
#[derive(Clone, Debug, Default)]
pub struct CueSet {
    /// Cue `i` plays with reveal scene `i`. Missing entries are silent.
    pub reveal: Vec<Arc<AudioPcm>>,
    /// Plays with the transition scene.
    pub transition: Option<Arc<AudioPcm>>,
    /// Spans the whole morph sub-sequence.
    pub transform: Option<Arc<AudioPcm>>,
}

/// Colors used by the compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Behind the image.
    pub image_bg: Rgb8,
    /// Strokes.
    pub line: Rgb8,
    /// Behind the lines once the image is gone.
    pub line_bg: Rgb8,
}

/// Renders one interpolation pass into a scene sequence.
#[derive(Clone, Debug)]
pub struct FrameCompositor {
    resolution: Resolution,
    segment_count: usize,
    palette: Palette,
    timings: SceneTimings,
    fps: Fps,
    parallel: bool,
}

impl FrameCompositor {
    /// Compositor for the given configuration.
    pub fn from_config(cfg: &PipelineConfig) -> Self {
        Self {
            resolution: cfg.resolution,
            segment_count: cfg.segment_count(),
            palette: Palette {
                image_bg: cfg.image_bg_color,
                line: cfg.line_color,
                line_bg: cfg.line_bg_color,
            },
            timings: cfg.timings,
            fps: cfg.fps,
            parallel: cfg.parallel,
        }
    }

    /// Number of segments (K) every input must contain.
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Generate all scenes for `ranked` (canvas coordinates) and its morph `frames`.
    ///
    /// # Errors
    ///
    /// - [`StickbugError::MissingImage`] if `backdrop` is `None`.
    /// - [`StickbugError::SegmentCountMismatch`] if `ranked` or any frame is not K long.
    #[tracing::instrument(skip_all, fields(k = self.segment_count, morph = frames.len()))]
    pub fn compose(
        &self,
        backdrop: Option<Backdrop<'_>>,
        ranked: &[Segment],
        frames: &[InterpFrame],
        cues: &CueSet,
    ) -> StickbugResult<GeneratedSegment> {
        let backdrop = backdrop.ok_or(StickbugError::MissingImage)?;
        self.check_len(ranked.len())?;
        for f in frames {
            self.check_len(f.segments.len())?;
        }

        let Palette {
            image_bg,
            line,
            line_bg,
        } = self.palette;
        let hold = |secs: f64| self.fps.hold_frames(secs);
        let mut canvas = LineCanvas::new(self.resolution)?;
        let mut scenes = Vec::with_capacity(ranked.len() + 3 + frames.len());

        canvas.clear(image_bg);
        canvas.blit(backdrop.image, backdrop.offset)?;
        scenes.push(Scene::silent(canvas.snapshot(), hold(self.timings.image_secs)));

        for (i, seg) in ranked.iter().enumerate() {
            canvas.draw_lines(std::slice::from_ref(seg), line)?;
            scenes.push(
                Scene::silent(canvas.snapshot(), hold(self.timings.reveal_secs))
                    .with_cue(cues.reveal.get(i).cloned()),
            );
        }

        let revealed = scenes
            .last()
            .map(|s| Arc::clone(&s.frame))
            .unwrap_or_else(|| Arc::new(canvas.snapshot()));
        scenes.push(Scene {
            frame: revealed,
            hold_frames: hold(self.timings.hold_secs),
            cue: None,
        });

        canvas.clear(line_bg);
        canvas.draw_lines(ranked, line)?;
        scenes.push(
            Scene::silent(canvas.snapshot(), hold(self.timings.transition_secs))
                .with_cue(cues.transition.clone()),
        );

        let first_morph = scenes.len();
        let morph = if self.parallel {
            self.morph_parallel(frames)?
        } else {
            frames
                .iter()
                .map(|f| redraw(&mut canvas, &f.segments, line_bg, line))
                .collect::<StickbugResult<Vec<_>>>()?
        };
        scenes.extend(morph.into_iter().map(|f| Scene::silent(f, 1)));

        let tracks = match &cues.transform {
            Some(pcm) if !frames.is_empty() => vec![SpanTrack {
                first_scene: first_morph,
                scene_count: frames.len(),
                pcm: Arc::clone(pcm),
            }],
            _ => Vec::new(),
        };

        tracing::debug!(scenes = scenes.len(), "composited generated segment");
        Ok(GeneratedSegment { scenes, tracks })
    }

    fn morph_parallel(&self, frames: &[InterpFrame]) -> StickbugResult<Vec<FrameRGBA>> {
        let Palette { line, line_bg, .. } = self.palette;
        let res = self.resolution;
        let rendered = frames
            .par_iter()
            .map_init(
                || LineCanvas::new(res),
                |canvas, f| -> StickbugResult<FrameRGBA> {
                    match canvas {
                        Ok(c) => redraw(c, &f.segments, line_bg, line),
                        Err(e) => Err(StickbugError::invalid_config(e.to_string())),
                    }
                },
            )
            .collect::<Vec<_>>();

        let mut out = Vec::with_capacity(rendered.len());
        for item in rendered {
            out.push(item?);
        }
        Ok(out)
    }

    fn check_len(&self, got: usize) -> StickbugResult<()> {
        if got != self.segment_count {
            return Err(StickbugError::SegmentCountMismatch {
                expected: self.segment_count,
                got,
            });
        }
        Ok(())
    }
}

fn redraw(
    canvas: &mut LineCanvas,
    segments: &[Segment],
    bg: Rgb8,
    line: Rgb8,
) -> StickbugResult<FrameRGBA> {
    canvas.clear(bg);
    canvas.draw_lines(segments, line)?;
    Ok(canvas.snapshot())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
