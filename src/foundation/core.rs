use crate::foundation::error::{StickbugError, StickbugResult};

pub use kurbo::{Line, Point};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> StickbugResult<Self> {
        if den == 0 {
            return Err(StickbugError::invalid_config("fps den must be > 0"));
        }
        if num == 0 {
            return Err(StickbugError::invalid_config("fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert a hold duration to a frame count, rounding to nearest and never below one frame.
    pub fn hold_frames(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(1.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Pixel dimensions of an image or of the output video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution (both axes non-zero).
    pub fn new(width: u32, height: u32) -> StickbugResult<Self> {
        let res = Self { width, height };
        res.validate()?;
        Ok(res)
    }

    /// Reject zero-sized axes.
    pub fn validate(self) -> StickbugResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StickbugError::invalid_config(format!(
                "resolution must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Dimensions of an `image` buffer.
    pub fn of<P: image::Pixel>(img: &image::ImageBuffer<P, Vec<P::Subpixel>>) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 720,
            height: 720,
        }
    }
}

/// Opaque RGB8 color.
///
/// Serialized as an `[r, g, b]` triple. Deserialization accepts any integers and rejects channels
/// outside `0..=255`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[i64; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from in-range channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from untrusted integer channels.
    pub fn from_channels(channels: [i64; 3]) -> StickbugResult<Self> {
        let mut out = [0u8; 3];
        for (dst, &c) in out.iter_mut().zip(channels.iter()) {
            *dst = u8::try_from(c).map_err(|_| {
                StickbugError::invalid_config(format!(
                    "color channel {c} is outside 0..=255 in {channels:?}"
                ))
            })?;
        }
        Ok(Self::new(out[0], out[1], out[2]))
    }

    /// Opaque RGBA8 bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl TryFrom<[i64; 3]> for Rgb8 {
    type Error = StickbugError;

    fn try_from(value: [i64; 3]) -> Result<Self, Self::Error> {
        Self::from_channels(value)
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
