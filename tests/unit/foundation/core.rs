use super::*;

#[test]
fn frames_to_secs_uses_rational_rate() {
    let fps = Fps::new(30000, 1001).unwrap();
    assert!((fps.frames_to_secs(30000) - 1001.0).abs() < 1e-9);
    assert_eq!(Fps::default().frames_to_secs(45), 1.5);
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn hold_frames_never_drops_below_one() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.hold_frames(1.0), 30);
    assert_eq!(fps.hold_frames(0.4), 12);
    assert_eq!(fps.hold_frames(0.001), 1);
}

#[test]
fn resolution_rejects_zero_axes() {
    assert!(Resolution::new(0, 10).is_err());
    assert!(Resolution::new(10, 0).is_err());
    assert_eq!(Resolution::new(4, 2).unwrap().rgba_len(), 32);
}

#[test]
fn rgb_from_channels_validates_range() {
    assert_eq!(
        Rgb8::from_channels([255, 255, 211]).unwrap(),
        Rgb8::new(255, 255, 211)
    );
    assert!(matches!(
        Rgb8::from_channels([-1, 0, 0]),
        Err(StickbugError::InvalidConfiguration(_))
    ));
    assert!(Rgb8::from_channels([0, 256, 0]).is_err());
}

#[test]
fn rgb_serializes_as_triple() {
    let c = Rgb8::new(125, 115, 119);
    assert_eq!(serde_json::to_string(&c).unwrap(), "[125,115,119]");
    let back: Rgb8 = serde_json::from_str("[125,115,119]").unwrap();
    assert_eq!(back, c);
    assert!(serde_json::from_str::<Rgb8>("[0,-5,0]").is_err());
}
