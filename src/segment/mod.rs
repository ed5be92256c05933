//! Line segments and the transforms that act on them.
//!
//! A [`Segment`] is `(x1, y1, x2, y2, width)` in canvas pixel coordinates. Everything here is a
//! pure function of its inputs: translating or scaling a segment returns a new value, so "raw"
//! detector output and centered canvas-space segments never alias.

/// Linear interpolation from source geometry to the target pose.
pub mod interp;
/// Reference end pose and its fitting to an output resolution.
pub mod layout;
/// Ranking and top-K selection.
pub mod rank;

use crate::foundation::core::{Line, Point};
use crate::place::Offset;

/// A line with thickness.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// First endpoint x.
    pub x1: f64,
    /// First endpoint y.
    pub y1: f64,
    /// Second endpoint x.
    pub x2: f64,
    /// Second endpoint y.
    pub y2: f64,
    /// Stroke thickness in pixels.
    pub width: f64,
}

impl Segment {
    /// Number of scalar components (`x1, y1, x2, y2, width`).
    pub const COMPONENTS: usize = 5;

    /// Build a segment from endpoints and thickness.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, width: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            width,
        }
    }

    /// Build a segment from `[x1, y1, x2, y2, width]`.
    pub const fn from_components(c: [f64; 5]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4])
    }

    /// Components in `[x1, y1, x2, y2, width]` order.
    pub const fn components(self) -> [f64; 5] {
        [self.x1, self.y1, self.x2, self.y2, self.width]
    }

    /// Euclidean distance between the endpoints.
    pub fn length(self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    /// Endpoints as a `kurbo` line.
    pub fn line(self) -> Line {
        Line::new(Point::new(self.x1, self.y1), Point::new(self.x2, self.y2))
    }

    /// Stroke thickness rounded to the nearest whole pixel, at least one.
    pub fn stroke_px(self) -> f64 {
        let w = self.width.round();
        if w.is_finite() && w >= 1.0 { w } else { 1.0 }
    }

    /// Copy shifted by an integer pixel offset. The width is unchanged.
    #[must_use]
    pub fn translated(self, offset: Offset) -> Self {
        let dx = f64::from(offset.x);
        let dy = f64::from(offset.y);
        Self::new(
            self.x1 + dx,
            self.y1 + dy,
            self.x2 + dx,
            self.y2 + dy,
            self.width,
        )
    }

    /// Copy with every component (including width) multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::from_components(self.components().map(|v| v * factor))
    }

    /// Copy with every component truncated toward zero (integer pixel units).
    #[must_use]
    pub fn truncated(self) -> Self {
        Self::from_components(self.components().map(f64::trunc))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/mod.rs"]
mod tests;
