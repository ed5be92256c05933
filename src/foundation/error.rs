/// Convenience result type used across stickbug.
pub type StickbugResult<T> = Result<T, StickbugError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// All variants are deterministic input errors; nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum StickbugError {
    /// An operation that needs the source image ran before one was set.
    #[error("missing image: no source image has been set")]
    MissingImage,

    /// The line detector produced fewer segments than the target layout needs.
    #[error("insufficient segments: detector found {found}, need {needed}")]
    InsufficientSegments {
        /// Segments available after detection.
        found: usize,
        /// Segments required (K).
        needed: usize,
    },

    /// A segment list does not have the cardinality of the target layout.
    #[error("segment count mismatch: expected {expected}, got {got}")]
    SegmentCountMismatch {
        /// Required count (K).
        expected: usize,
        /// Supplied count.
        got: usize,
    },

    /// Invalid user-provided configuration or input data.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Failures while probing or decoding media assets.
    #[error("media error: {0}")]
    Media(String),

    /// Failures inside a frame sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StickbugError {
    /// Build a [`StickbugError::InvalidConfiguration`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`StickbugError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`StickbugError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
