use crate::foundation::core::Resolution;
use crate::foundation::error::{StickbugError, StickbugResult};

/// A rendered frame as RGBA8 pixels.
///
/// Every frame produced by the pipeline is fully opaque, so premultiplied and straight alpha
/// coincide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Frame of `resolution` filled with one color.
    pub fn solid(resolution: Resolution, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(resolution.rgba_len());
        for _ in 0..(resolution.width as usize * resolution.height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width: resolution.width,
            height: resolution.height,
            data,
        }
    }

    /// Wrap raw bytes, checking the length.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> StickbugResult<Self> {
        let expected = Resolution { width, height }.rgba_len();
        if data.len() != expected {
            return Err(StickbugError::media(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame dimensions.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA bytes at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Convert to an `image` buffer, e.g. for PNG export.
    pub fn to_image(&self) -> StickbugResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            StickbugError::media(format!(
                "frame buffer does not match {}x{}",
                self.width, self.height
            ))
        })
    }
}
