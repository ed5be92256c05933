use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StickbugError::MissingImage
            .to_string()
            .contains("missing image:")
    );
    assert!(
        StickbugError::invalid_config("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(StickbugError::media("x").to_string().contains("media error:"));
    assert!(
        StickbugError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn counts_are_reported() {
    let err = StickbugError::InsufficientSegments {
        found: 2,
        needed: 9,
    };
    assert_eq!(
        err.to_string(),
        "insufficient segments: detector found 2, need 9"
    );

    let err = StickbugError::SegmentCountMismatch {
        expected: 9,
        got: 4,
    };
    assert_eq!(err.to_string(), "segment count mismatch: expected 9, got 4");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StickbugError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
