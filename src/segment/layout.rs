use crate::foundation::core::Resolution;
use crate::foundation::error::{StickbugError, StickbugResult};
use crate::place::placement;
use crate::segment::Segment;

/// End pose of the stick bug, drawn for a 1280x720 canvas.
pub const STICK_BUG_1280X720: [Segment; 9] = [
    Segment::new(595.0, 212.0, 688.0, 262.0, 5.0),
    Segment::new(688.0, 262.0, 791.0, 263.0, 5.0),
    Segment::new(516.0, 266.0, 612.0, 223.0, 5.0),
    Segment::new(450.0, 339.0, 516.0, 266.0, 5.0),
    Segment::new(548.0, 351.0, 600.0, 228.0, 5.0),
    Segment::new(599.0, 297.0, 652.0, 247.0, 5.0),
    Segment::new(586.0, 353.0, 599.0, 297.0, 5.0),
    Segment::new(644.0, 360.0, 678.0, 260.0, 5.0),
    Segment::new(774.0, 370.0, 769.0, 264.0, 5.0),
];

/// Serializable definition of a target pose and the canvas it was drawn for.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetLayoutDef {
    /// Canvas the segment coordinates refer to.
    pub reference: Resolution,
    /// Ordered end-pose segments. Its length is K.
    pub segments: Vec<Segment>,
}

impl Default for TargetLayoutDef {
    fn default() -> Self {
        Self {
            reference: Resolution {
                width: 1280,
                height: 720,
            },
            segments: STICK_BUG_1280X720.to_vec(),
        }
    }
}

impl TargetLayoutDef {
    /// Reject empty poses and degenerate reference canvases.
    pub fn validate(&self) -> StickbugResult<()> {
        self.reference.validate()?;
        if self.segments.is_empty() {
            return Err(StickbugError::invalid_config(
                "target layout must contain at least one segment",
            ));
        }
        if self
            .segments
            .iter()
            .flat_map(|s| s.components())
            .any(|v| !v.is_finite())
        {
            return Err(StickbugError::invalid_config(
                "target layout coordinates must be finite",
            ));
        }
        Ok(())
    }
}

/// Target pose fitted to one output resolution. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetLayout {
    resolution: Resolution,
    segments: Vec<Segment>,
}

impl TargetLayout {
    /// Map `def` into `resolution` with the scale-to-fit and centering rule used for images.
    ///
    /// Coordinates are truncated to whole pixels; widths stay at least one pixel.
    pub fn fit(def: &TargetLayoutDef, resolution: Resolution) -> StickbugResult<Self> {
        def.validate()?;
        resolution.validate()?;

        let p = placement(def.reference, resolution);
        let segments = def
            .segments
            .iter()
            .map(|s| {
                let mut out = s.scaled(p.scale).translated(p.offset).truncated();
                out.width = out.width.max(1.0);
                out
            })
            .collect();

        Ok(Self {
            resolution,
            segments,
        })
    }

    /// Output resolution this layout was fitted to.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Fitted end-pose segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments (K).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` for an empty layout (never produced by [`TargetLayout::fit`]).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/layout.rs"]
mod tests;
