use crate::foundation::error::{StickbugError, StickbugResult};
use crate::segment::Segment;

/// Geometry of all K segments at one morph time step.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpFrame {
    /// Segments in ranked order.
    pub segments: Vec<Segment>,
}

/// Per-component linear interpolation from `source` to `target` over `num_frames` steps.
///
/// Every component of every segment is sampled at `num_frames` evenly spaced points from its
/// source value to its target value inclusive, then truncated toward zero to integer pixels.
/// Frame `0` is the truncated source and frame `num_frames - 1` the truncated target.
///
/// `num_frames == 1` yields only the source frame.
///
/// # Errors
///
/// - [`StickbugError::SegmentCountMismatch`] if `source` and `target` differ in length.
/// - [`StickbugError::InvalidConfiguration`] if `num_frames` is zero.
pub fn interpolate(
    source: &[Segment],
    target: &[Segment],
    num_frames: u32,
) -> StickbugResult<Vec<InterpFrame>> {
    if source.len() != target.len() {
        return Err(StickbugError::SegmentCountMismatch {
            expected: target.len(),
            got: source.len(),
        });
    }
    if num_frames == 0 {
        return Err(StickbugError::invalid_config(
            "interpolation needs at least one frame",
        ));
    }

    let n = num_frames as usize;
    let mut frames = vec![
        InterpFrame {
            segments: Vec::with_capacity(source.len()),
        };
        n
    ];

    for (src, dst) in source.iter().zip(target) {
        let a = src.components();
        let b = dst.components();
        for (i, frame) in frames.iter_mut().enumerate() {
            let mut c = [0.0f64; Segment::COMPONENTS];
            for (j, v) in c.iter_mut().enumerate() {
                *v = linspace_at(a[j], b[j], n, i).trunc();
            }
            frame.segments.push(Segment::from_components(c));
        }
    }

    Ok(frames)
}

/// Sample `i` of `n` evenly spaced values over `[start, stop]`, endpoint inclusive.
fn linspace_at(start: f64, stop: f64, n: usize, i: usize) -> f64 {
    if n <= 1 || i == 0 {
        return start;
    }
    if i == n - 1 {
        return stop;
    }
    let step = (stop - start) / (n - 1) as f64;
    start + (i as f64) * step
}

#[cfg(test)]
#[path = "../../tests/unit/segment/interp.rs"]
mod tests;
