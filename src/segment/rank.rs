use crate::foundation::error::{StickbugError, StickbugResult};
use crate::segment::Segment;

/// Scalar key used to order detected segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Euclidean distance between the endpoints.
    #[default]
    ByLength,
    /// Detected stroke width.
    ByWidth,
}

impl RankMode {
    /// Ranking key of `seg` under this mode.
    pub fn key(self, seg: &Segment) -> f64 {
        match self {
            Self::ByLength => seg.length(),
            Self::ByWidth => seg.width,
        }
    }
}

/// Select the `k` highest-ranked segments, in descending key order.
///
/// Ties keep their detector order. The input slice is left untouched.
///
/// # Errors
///
/// [`StickbugError::InsufficientSegments`] when fewer than `k` segments are available.
pub fn rank(raw: &[Segment], k: usize, mode: RankMode) -> StickbugResult<Vec<Segment>> {
    if raw.len() < k {
        return Err(StickbugError::InsufficientSegments {
            found: raw.len(),
            needed: k,
        });
    }

    let mut keyed: Vec<(f64, Segment)> = raw.iter().map(|s| (mode.key(s), *s)).collect();
    // `sort_by` is stable, so equal keys stay in detector order.
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.truncate(k);

    Ok(keyed.into_iter().map(|(_, s)| s).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/segment/rank.rs"]
mod tests;
