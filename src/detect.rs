//! Line detection seam.
//!
//! The pipeline treats detection as a black box: [`LineDetector::detect`] receives the grayscale
//! placed image plus an opaque scale and returns raw segments in that image's pixel space. The
//! bundled [`HoughDetector`] is a small adapter over `imageproc` edge and Hough-line primitives.

use image::GrayImage;
use image::imageops::FilterType;
use imageproc::hough::{LineDetectionOptions, PolarLine};

use crate::foundation::error::{StickbugError, StickbugResult};
use crate::segment::Segment;

/// Largest scale [`HoughDetector`] resamples to.
pub const MAX_DETECTOR_SCALE: f64 = 4.0;

/// External line-segment detector.
pub trait LineDetector: Send + Sync {
    /// Detect raw segments in `gray`, in `gray`'s pixel coordinates.
    fn detect(&self, gray: &GrayImage, scale: f64) -> StickbugResult<Vec<Segment>>;
}

impl<F> LineDetector for F
where
    F: Fn(&GrayImage, f64) -> StickbugResult<Vec<Segment>> + Send + Sync,
{
    fn detect(&self, gray: &GrayImage, scale: f64) -> StickbugResult<Vec<Segment>> {
        self(gray, scale)
    }
}

/// Canny + Hough transform detector.
///
/// `scale` resamples the image before detection (values below one trade detail for speed on
/// large inputs); results are mapped back to the unscaled image.
#[derive(Clone, Copy, Debug)]
pub struct HoughDetector {
    /// Canny low hysteresis threshold.
    pub canny_low: f32,
    /// Canny high hysteresis threshold.
    pub canny_high: f32,
    /// Minimum accumulator votes for a line.
    pub vote_threshold: u32,
    /// Non-maximum suppression radius in accumulator space.
    pub suppression_radius: u32,
    /// Longest run of missing edge pixels bridged inside one segment.
    pub max_gap: u32,
    /// Segments shorter than this (in scaled pixels) are dropped.
    pub min_length: f64,
}

impl Default for HoughDetector {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            vote_threshold: 40,
            suppression_radius: 8,
            max_gap: 3,
            min_length: 12.0,
        }
    }
}

impl LineDetector for HoughDetector {
    #[tracing::instrument(skip(self, gray), fields(w = gray.width(), h = gray.height()))]
    fn detect(&self, gray: &GrayImage, scale: f64) -> StickbugResult<Vec<Segment>> {
        if !scale.is_finite() || scale <= 0.0 || scale > MAX_DETECTOR_SCALE {
            return Err(StickbugError::invalid_config(format!(
                "detector scale must be in (0, {MAX_DETECTOR_SCALE}], got {scale}"
            )));
        }

        let w = ((f64::from(gray.width()) * scale).round() as u32).max(1);
        let h = ((f64::from(gray.height()) * scale).round() as u32).max(1);
        let work = if (w, h) == gray.dimensions() {
            gray.clone()
        } else {
            image::imageops::resize(gray, w, h, FilterType::Triangle)
        };

        let low = self.canny_low.max(1.0);
        let high = self.canny_high.max(low);
        let edges = imageproc::edges::canny(&work, low, high);
        let lines = imageproc::hough::detect_lines(
            &edges,
            LineDetectionOptions {
                vote_threshold: self.vote_threshold,
                suppression_radius: self.suppression_radius,
            },
        );

        let back_x = f64::from(gray.width()) / f64::from(w);
        let back_y = f64::from(gray.height()) / f64::from(h);
        let out: Vec<Segment> = lines
            .iter()
            .filter_map(|line| self.longest_run(&edges, line))
            .map(|s| {
                Segment::new(
                    s.x1 * back_x,
                    s.y1 * back_y,
                    s.x2 * back_x,
                    s.y2 * back_y,
                    s.width * back_x.max(back_y),
                )
            })
            .collect();

        tracing::debug!(lines = lines.len(), segments = out.len(), "hough detection");
        Ok(out)
    }
}

impl HoughDetector {
    /// Walk `line` across the edge map and keep its longest gap-tolerant run of edge pixels.
    fn longest_run(&self, edges: &GrayImage, line: &PolarLine) -> Option<Segment> {
        let theta = f64::from(line.angle_in_degrees).to_radians();
        let (sin, cos) = theta.sin_cos();
        let r = f64::from(line.r);
        // Foot of the perpendicular from the origin, and the direction along the line.
        let (px, py) = (r * cos, r * sin);
        let (dx, dy) = (-sin, cos);

        let diag = f64::from(edges.width()).hypot(f64::from(edges.height())).ceil() as i64;
        let mut best: Option<(i64, i64)> = None;
        let mut run: Option<(i64, i64)> = None;
        let mut gap = 0u32;

        for t in -diag..=diag {
            let x = px + (t as f64) * dx;
            let y = py + (t as f64) * dy;
            if is_edge_near(edges, x, y, (dy, -dx)) {
                run = Some(match run {
                    Some((start, _)) => (start, t),
                    None => (t, t),
                });
                gap = 0;
                continue;
            }
            if let Some((start, end)) = run {
                gap += 1;
                if gap > self.max_gap {
                    best = longer(best, (start, end));
                    run = None;
                    gap = 0;
                }
            }
        }
        if let Some(r) = run {
            best = longer(best, r);
        }

        let (t0, t1) = best?;
        if ((t1 - t0) as f64) < self.min_length {
            return None;
        }
        let tm = (t0 + t1) as f64 / 2.0;
        let width = stroke_width(edges, px + tm * dx, py + tm * dy, (dy, -dx));
        Some(Segment::new(
            px + (t0 as f64) * dx,
            py + (t0 as f64) * dy,
            px + (t1 as f64) * dx,
            py + (t1 as f64) * dy,
            width,
        ))
    }
}

fn longer(best: Option<(i64, i64)>, cand: (i64, i64)) -> Option<(i64, i64)> {
    match best {
        Some(b) if b.1 - b.0 >= cand.1 - cand.0 => Some(b),
        _ => Some(cand),
    }
}

fn edge_at(edges: &GrayImage, x: f64, y: f64) -> bool {
    let (xi, yi) = (x.round(), y.round());
    if xi < 0.0 || yi < 0.0 || xi >= f64::from(edges.width()) || yi >= f64::from(edges.height()) {
        return false;
    }
    edges.get_pixel(xi as u32, yi as u32).0[0] > 0
}

fn is_edge_near(edges: &GrayImage, x: f64, y: f64, normal: (f64, f64)) -> bool {
    (-1..=1).any(|k| {
        let k = f64::from(k);
        edge_at(edges, x + k * normal.0, y + k * normal.1)
    })
}

/// Extent of edge support across the line at one point, at least one pixel.
fn stroke_width(edges: &GrayImage, x: f64, y: f64, normal: (f64, f64)) -> f64 {
    let reach = |sign: f64| -> u32 {
        (1..=4)
            .take_while(|&k| {
                let k = f64::from(k) * sign;
                edge_at(edges, x + k * normal.0, y + k * normal.1)
            })
            .count() as u32
    };
    f64::from(1 + reach(1.0) + reach(-1.0))
}

#[cfg(test)]
#[path = "../tests/unit/detect.rs"]
mod tests;
