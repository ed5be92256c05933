//! Software raster canvas for the line drawings.
//!
//! Lines are rasterised with `vello_cpu`. It renders into a fresh buffer, so every draw goes to a
//! scratch pixmap first and is then composited premul-over onto the persistent canvas. That lets
//! the reveal phase accumulate strokes across frames.

use image::RgbaImage;

use crate::foundation::core::{Resolution, Rgb8};
use crate::foundation::error::{StickbugError, StickbugResult};
use crate::foundation::math::{premul_over_in_place, premultiply_rgba8_in_place};
use crate::place::Offset;
use crate::render::frame::FrameRGBA;
use crate::segment::Segment;

/// Persistent RGBA canvas plus the `vello_cpu` state used to draw on it.
pub struct LineCanvas {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    ctx: vello_cpu::RenderContext,
    scratch: vello_cpu::Pixmap,
}

impl LineCanvas {
    /// Allocate a canvas; both axes must fit the rasteriser's 16-bit limit.
    pub fn new(resolution: Resolution) -> StickbugResult<Self> {
        resolution.validate()?;
        let to_u16 = |v: u32, axis: &str| {
            u16::try_from(v).map_err(|_| {
                StickbugError::invalid_config(format!("{axis} {v} exceeds {}", u16::MAX))
            })
        };
        let width = to_u16(resolution.width, "width")?;
        let height = to_u16(resolution.height, "height")?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; resolution.rgba_len()],
            ctx: vello_cpu::RenderContext::new(width, height),
            scratch: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Canvas size.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Fill the whole canvas with an opaque color.
    pub fn clear(&mut self, color: Rgb8) {
        let rgba = color.to_rgba8();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Composite `image` (straight alpha) with its top-left corner at `offset`, clipped to the
    /// canvas.
    pub fn blit(&mut self, image: &RgbaImage, offset: Offset) -> StickbugResult<()> {
        let cw = usize::from(self.width);
        let ch = usize::from(self.height);
        let (ox, oy) = (offset.x as usize, offset.y as usize);
        if ox >= cw || oy >= ch {
            return Ok(());
        }
        let copy_w = (image.width() as usize).min(cw - ox);
        let copy_h = (image.height() as usize).min(ch - oy);
        let src_stride = image.width() as usize * 4;

        let mut row = vec![0u8; copy_w * 4];
        for y in 0..copy_h {
            let src_off = y * src_stride;
            row.copy_from_slice(&image.as_raw()[src_off..src_off + copy_w * 4]);
            premultiply_rgba8_in_place(&mut row);
            let dst_off = ((oy + y) * cw + ox) * 4;
            premul_over_in_place(&mut self.pixels[dst_off..dst_off + copy_w * 4], &row)?;
        }
        Ok(())
    }

    /// Stroke every segment in `color` with butt ends and its rounded pixel width.
    pub fn draw_lines(&mut self, segments: &[Segment], color: Rgb8) -> StickbugResult<()> {
        if segments.is_empty() {
            return Ok(());
        }
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));
        for seg in segments {
            self.ctx.fill_path(&stroke_outline(*seg));
        }
        self.ctx.flush();

        self.scratch.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.scratch);
        premul_over_in_place(&mut self.pixels, self.scratch.data_as_u8_slice())
    }

    /// Copy of the current pixels.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixels.clone(),
        }
    }
}

/// Rectangle covering a segment of its rounded stroke width. Zero-length segments become a square
/// dot.
fn stroke_outline(seg: Segment) -> vello_cpu::kurbo::BezPath {
    use vello_cpu::kurbo::{BezPath, Point};

    let half = seg.stroke_px() / 2.0;
    let (dx, dy) = (seg.x2 - seg.x1, seg.y2 - seg.y1);
    let len = dx.hypot(dy);
    let (nx, ny) = if len > f64::EPSILON {
        (-dy / len * half, dx / len * half)
    } else {
        (0.0, half)
    };
    let (ex, ey) = if len > f64::EPSILON {
        (0.0, 0.0)
    } else {
        (half, 0.0)
    };

    let mut p = BezPath::new();
    p.move_to(Point::new(seg.x1 - ex + nx, seg.y1 - ey + ny));
    p.line_to(Point::new(seg.x2 + ex + nx, seg.y2 + ey + ny));
    p.line_to(Point::new(seg.x2 + ex - nx, seg.y2 + ey - ny));
    p.line_to(Point::new(seg.x1 - ex - nx, seg.y1 - ey - ny));
    p.close_path();
    p
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
