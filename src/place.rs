//! Scale-to-fit placement of a raster inside the output canvas.
//!
//! The same rule positions the source image, the target pose and the closing clip: one uniform
//! scale factor `min(tw / w, th / h)` (no cropping, possibly letterboxed) and a floor-divided
//! centering offset.

use image::RgbaImage;
use image::imageops::FilterType;

use crate::foundation::core::Resolution;

/// Integer pixel offset of a placed raster's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    /// Horizontal offset in pixels.
    pub x: u32,
    /// Vertical offset in pixels.
    pub y: u32,
}

/// Where and how large a source raster lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Uniform scale factor applied to the source.
    pub scale: f64,
    /// Size of the scaled raster. Always fits within the target.
    pub size: Resolution,
    /// Centering offset.
    pub offset: Offset,
}

/// Compute the placement of a `source`-sized raster inside `target`.
///
/// Scaled sizes are truncated to whole pixels and clamped to `1..=target`.
pub fn placement(source: Resolution, target: Resolution) -> Placement {
    let sx = f64::from(target.width) / f64::from(source.width.max(1));
    let sy = f64::from(target.height) / f64::from(source.height.max(1));
    let scale = sx.min(sy);

    let fit = |src: u32, max: u32| -> u32 { ((f64::from(src) * scale) as u32).clamp(1, max.max(1)) };
    let size = Resolution {
        width: fit(source.width, target.width),
        height: fit(source.height, target.height),
    };
    let offset = Offset {
        x: (target.width - size.width) / 2,
        y: (target.height - size.height) / 2,
    };

    Placement {
        scale,
        size,
        offset,
    }
}

/// Resize `image` to fit `target` and return it with its centering placement.
pub fn place(image: &RgbaImage, target: Resolution) -> (RgbaImage, Placement) {
    let p = placement(Resolution::of(image), target);
    let scaled = if p.size == Resolution::of(image) {
        image.clone()
    } else {
        image::imageops::resize(image, p.size.width, p.size.height, FilterType::CatmullRom)
    };
    (scaled, p)
}

#[cfg(test)]
#[path = "../tests/unit/place.rs"]
mod tests;
