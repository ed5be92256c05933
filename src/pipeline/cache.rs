//! The pipeline orchestrator.
//!
//! [`PipelineCache`] owns the image and the derived stages (ranked segments, composited video).
//! Derived stages are computed on first read and dropped whenever an input they depend on
//! changes. A failed computation leaves its stage stale with no value stored, so the call can be
//! retried after fixing the input.

use std::sync::Arc;

use image::RgbaImage;

use crate::assets::store::{self, StaticAssets};
use crate::config::{ConfigImpact, PipelineConfig};
use crate::detect::LineDetector;
use crate::encode::sink::FrameSink;
use crate::encode::write_clip;
use crate::foundation::core::{Resolution, Rgb8};
use crate::foundation::error::{StickbugError, StickbugResult};
use crate::pipeline::stage::{StageGraph, StageId, StageState};
use crate::place::{Placement, place};
use crate::render::compositor::{Backdrop, FrameCompositor};
use crate::segment::Segment;
use crate::segment::interp::interpolate;
use crate::segment::layout::TargetLayout;
use crate::segment::rank::{RankMode, rank};
use crate::timeline::assemble::{Clip, TimelineAssembler};
use crate::timeline::scene::GeneratedSegment;

/// Output of the video stage.
#[derive(Clone, Debug)]
pub struct Video {
    /// Scenes before timeline expansion.
    pub generated: GeneratedSegment,
    /// Final frame sequence with audio.
    pub clip: Clip,
}

struct Placed {
    image: RgbaImage,
    placement: Placement,
}

/// Lazy image → segments → video pipeline.
pub struct PipelineCache {
    config: PipelineConfig,
    target: TargetLayout,
    detector: Arc<dyn LineDetector>,
    assets: &'static StaticAssets,

    graph: StageGraph,
    image: Option<RgbaImage>,
    placed: Option<Placed>,
    segments: Option<Vec<Segment>>,
    video: Option<Video>,
}

impl std::fmt::Debug for PipelineCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineCache")
            .field("config", &self.config)
            .field("image_state", &self.graph.state(StageId::Image))
            .field("segments_state", &self.graph.state(StageId::Segments))
            .field("video_state", &self.graph.state(StageId::Video))
            .finish_non_exhaustive()
    }
}

impl PipelineCache {
    /// Empty pipeline. Uses the process-wide assets if installed, no assets otherwise.
    pub fn new(config: PipelineConfig, detector: Arc<dyn LineDetector>) -> StickbugResult<Self> {
        config.validate()?;
        let target = TargetLayout::fit(&config.target, config.resolution)?;
        Ok(Self {
            config,
            target,
            detector,
            assets: store::installed().unwrap_or_else(StaticAssets::empty_ref),
            graph: StageGraph::new(),
            image: None,
            placed: None,
            segments: None,
            video: None,
        })
    }

    /// Use `assets` instead of the process-wide set.
    #[must_use]
    pub fn with_assets(mut self, assets: &'static StaticAssets) -> Self {
        self.assets = assets;
        self.invalidate(StageId::Video);
        self
    }

    /// Builder form of [`PipelineCache::set_image`].
    pub fn with_image(mut self, image: RgbaImage) -> StickbugResult<Self> {
        self.set_image(image)?;
        Ok(self)
    }

    /// Current configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// End pose fitted to the current resolution.
    pub fn target(&self) -> &TargetLayout {
        &self.target
    }

    /// Validity of one stage.
    pub fn stage_state(&self, id: StageId) -> StageState {
        self.graph.state(id)
    }

    // ---- image --------------------------------------------------------------------------------

    /// Replace the source image. Segments and video become stale.
    pub fn set_image(&mut self, image: RgbaImage) -> StickbugResult<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(StickbugError::invalid_config("image must not be empty"));
        }
        self.image = Some(image);
        self.placed = None;
        self.graph.mark_set(StageId::Image);
        tracing::debug!("image set; segments and video stale");
        self.drop_stale_values();
        Ok(())
    }

    /// The unscaled source image.
    pub fn image(&self) -> StickbugResult<&RgbaImage> {
        self.image.as_ref().ok_or(StickbugError::MissingImage)
    }

    // ---- segments -----------------------------------------------------------------------------

    /// Ranked canvas-space segments, computing them if needed.
    pub fn segments(&mut self) -> StickbugResult<&[Segment]> {
        self.ensure(StageId::Segments)?;
        self.segments
            .as_deref()
            .ok_or_else(|| missing_value(StageId::Segments))
    }

    /// Cached segments without computing anything.
    pub fn peek_segments(&self) -> Option<&[Segment]> {
        self.segments.as_deref()
    }

    /// Override the segments with exactly K canvas-space segments. Only the video becomes stale.
    pub fn set_segments(&mut self, segments: Vec<Segment>) -> StickbugResult<()> {
        let k = self.config.segment_count();
        if segments.len() != k {
            return Err(StickbugError::SegmentCountMismatch {
                expected: k,
                got: segments.len(),
            });
        }
        if segments
            .iter()
            .flat_map(|s| s.components())
            .any(|v| !v.is_finite())
        {
            return Err(StickbugError::invalid_config(
                "segment coordinates must be finite",
            ));
        }
        self.segments = Some(segments);
        self.graph.mark_set(StageId::Segments);
        tracing::debug!("segments overridden; video stale");
        self.drop_stale_values();
        Ok(())
    }

    /// Drop the segments (and the video) so the next read recomputes them.
    pub fn clear_segments(&mut self) {
        self.invalidate(StageId::Segments);
    }

    // ---- video --------------------------------------------------------------------------------

    /// The composited clip, computing every stale stage first.
    pub fn video(&mut self) -> StickbugResult<&Video> {
        self.ensure(StageId::Video)?;
        self.video
            .as_ref()
            .ok_or_else(|| missing_value(StageId::Video))
    }

    /// Cached video without computing anything.
    pub fn peek_video(&self) -> Option<&Video> {
        self.video.as_ref()
    }

    /// Drop the video so the next read recomputes it.
    pub fn clear_video(&mut self) {
        self.invalidate(StageId::Video);
    }

    /// Compute the video if needed and stream it into `sink`.
    pub fn write_video(&mut self, sink: &mut dyn FrameSink) -> StickbugResult<()> {
        let video = self.video()?;
        write_clip(&video.clip, sink)
    }

    // ---- configuration ------------------------------------------------------------------------

    /// Replace the whole configuration, invalidating what it affects.
    pub fn set_config(&mut self, next: PipelineConfig) -> StickbugResult<()> {
        next.validate()?;
        let target = TargetLayout::fit(&next.target, next.resolution)?;
        let impact = self.config.impact_of(&next);
        if next.resolution != self.config.resolution {
            self.placed = None;
        }
        self.config = next;
        self.target = target;
        match impact {
            ConfigImpact::Segments => self.invalidate(StageId::Segments),
            ConfigImpact::Video => self.invalidate(StageId::Video),
            ConfigImpact::None => {}
        }
        Ok(())
    }

    /// Change the scale handed to the detector.
    pub fn set_detector_scale(&mut self, scale: f64) -> StickbugResult<()> {
        self.update_config(|c| c.detector_scale = scale)
    }

    /// Change the output resolution.
    pub fn set_resolution(&mut self, resolution: Resolution) -> StickbugResult<()> {
        self.update_config(|c| c.resolution = resolution)
    }

    /// Change the image background, line and line background colors.
    pub fn set_colors(
        &mut self,
        image_bg_color: Rgb8,
        line_color: Rgb8,
        line_bg_color: Rgb8,
    ) -> StickbugResult<()> {
        self.update_config(|c| {
            c.image_bg_color = image_bg_color;
            c.line_color = line_color;
            c.line_bg_color = line_bg_color;
        })
    }

    /// Change how detected segments are ranked.
    pub fn set_rank_mode(&mut self, mode: RankMode) -> StickbugResult<()> {
        self.update_config(|c| c.rank_mode = mode)
    }

    fn update_config(&mut self, f: impl FnOnce(&mut PipelineConfig)) -> StickbugResult<()> {
        let mut next = self.config.clone();
        f(&mut next);
        self.set_config(next)
    }

    // ---- stage machinery ----------------------------------------------------------------------

    fn invalidate(&mut self, id: StageId) {
        let changed = self.graph.invalidate(id);
        if !changed.is_empty() {
            tracing::debug!(?changed, "stages invalidated");
        }
        self.drop_stale_values();
    }

    fn drop_stale_values(&mut self) {
        if self.graph.state(StageId::Segments) != StageState::Fresh {
            self.segments = None;
        }
        if self.graph.state(StageId::Video) != StageState::Fresh {
            self.video = None;
        }
    }

    /// Bring `id` up to date, computing stale upstream stages first.
    fn ensure(&mut self, id: StageId) -> StickbugResult<()> {
        if self.graph.state(id) == StageState::Fresh {
            return Ok(());
        }
        if id == StageId::Image {
            return Err(StickbugError::MissingImage);
        }
        for up in self.graph.upstream(id).to_vec() {
            self.ensure(up)?;
        }

        tracing::debug!(stage = ?id, "recomputing stage");
        match id {
            StageId::Image => return Err(StickbugError::MissingImage),
            StageId::Segments => self.compute_segments()?,
            StageId::Video => self.compute_video()?,
        }
        self.graph.mark_computed(id);
        Ok(())
    }

    fn ensure_placed(&mut self) -> StickbugResult<&Placed> {
        let image = self.image.as_ref().ok_or(StickbugError::MissingImage)?;
        let placed = match self.placed.take() {
            Some(p) => p,
            None => {
                let (image, placement) = place(image, self.config.resolution);
                Placed { image, placement }
            }
        };
        Ok(self.placed.insert(placed))
    }

    #[tracing::instrument(skip(self), fields(scale = self.config.detector_scale))]
    fn compute_segments(&mut self) -> StickbugResult<()> {
        let k = self.config.segment_count();
        let mode = self.config.rank_mode;
        let scale = self.config.detector_scale;
        let detector = Arc::clone(&self.detector);

        let placed = self.ensure_placed()?;
        let offset = placed.placement.offset;
        let gray = image::imageops::grayscale(&placed.image);
        let raw = detector.detect(&gray, scale)?;
        let centered: Vec<Segment> = raw.iter().map(|s| s.translated(offset)).collect();
        let ranked = rank(&centered, k, mode)?;

        tracing::debug!(raw = raw.len(), k, "ranked segments");
        self.segments = Some(ranked);
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(morph_frames = self.config.morph_frames))]
    fn compute_video(&mut self) -> StickbugResult<()> {
        self.ensure_placed()?;
        let (Some(placed), Some(ranked)) = (self.placed.as_ref(), self.segments.as_deref()) else {
            return Err(missing_value(StageId::Segments));
        };

        let frames = interpolate(ranked, self.target.segments(), self.config.morph_frames)?;
        let generated = FrameCompositor::from_config(&self.config).compose(
            Some(Backdrop {
                image: &placed.image,
                offset: placed.placement.offset,
            }),
            ranked,
            &frames,
            &self.assets.cues(),
        )?;
        let clip = TimelineAssembler::new(
            self.config.resolution,
            self.config.fps,
            self.config.image_bg_color,
        )
        .with_ambient(self.assets.ambient.clone())
        .assemble(
            &generated,
            self.assets.closing_clip.as_ref(),
            self.assets.closing_audio.as_ref(),
        )?;

        self.video = Some(Video { generated, clip });
        Ok(())
    }
}

fn missing_value(id: StageId) -> StickbugError {
    StickbugError::Other(anyhow::anyhow!("{id:?} stage is fresh but holds no value"))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/cache.rs"]
mod tests;
