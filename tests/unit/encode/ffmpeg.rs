use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
        audio: None,
    }
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join("stickbug_odd.mp4"),
    ));
    let err = sink.begin(cfg(7, 4)).unwrap_err();
    assert!(matches!(err, StickbugError::InvalidConfiguration(_)));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA::solid(
        crate::foundation::core::Resolution::new(2, 2).unwrap(),
        [0, 0, 0, 255],
    );
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn existing_output_is_kept_without_overwrite() {
    let path = std::env::temp_dir().join(format!("stickbug_keep_{}.mp4", std::process::id()));
    std::fs::write(&path, b"x").unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: path.clone(),
        overwrite: false,
    });
    let err = sink.begin(cfg(4, 4)).unwrap_err();
    assert!(matches!(err, StickbugError::Encode(_)));
    assert_eq!(std::fs::read(&path).unwrap(), b"x");
    let _ = std::fs::remove_file(path);
}
