use super::*;

#[test]
fn defaults_match_classic_look() {
    let cfg = PipelineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.resolution, Resolution::new(720, 720).unwrap());
    assert_eq!(cfg.line_color, Rgb8::new(255, 255, 211));
    assert_eq!(cfg.line_bg_color, Rgb8::new(125, 115, 119));
    assert_eq!(cfg.image_bg_color, Rgb8::new(0, 0, 0));
    assert_eq!(cfg.detector_scale, 0.8);
    assert_eq!(cfg.morph_frames, 52);
    assert_eq!(cfg.segment_count(), 9);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: PipelineConfig =
        serde_json::from_str(r#"{ "line_color": [1, 2, 3], "rank_mode": "by_width" }"#).unwrap();
    assert_eq!(cfg.line_color, Rgb8::new(1, 2, 3));
    assert_eq!(cfg.rank_mode, RankMode::ByWidth);
    assert_eq!(cfg.resolution, Resolution::default());
}

#[test]
fn negative_color_channel_is_rejected() {
    let res = serde_json::from_str::<PipelineConfig>(r#"{ "line_color": [-1, 2, 3] }"#);
    assert!(res.is_err());
}

#[test]
fn validate_rejects_bad_values() {
    let bad = [
        PipelineConfig {
            resolution: Resolution {
                width: 0,
                height: 10,
            },
            ..PipelineConfig::default()
        },
        PipelineConfig {
            detector_scale: 0.0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            detector_scale: f64::NAN,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            morph_frames: 0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            fps: Fps { num: 30, den: 0 },
            ..PipelineConfig::default()
        },
        PipelineConfig {
            timings: SceneTimings {
                hold_secs: -1.0,
                ..SceneTimings::default()
            },
            ..PipelineConfig::default()
        },
    ];
    for cfg in bad {
        assert!(matches!(
            cfg.validate(),
            Err(StickbugError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn impact_classifies_changes() {
    let base = PipelineConfig::default();
    assert_eq!(base.impact_of(&base.clone()), ConfigImpact::None);

    let colors = PipelineConfig {
        line_color: Rgb8::new(0, 0, 0),
        ..base.clone()
    };
    assert_eq!(base.impact_of(&colors), ConfigImpact::Video);

    let scale = PipelineConfig {
        detector_scale: 0.5,
        ..base.clone()
    };
    assert_eq!(base.impact_of(&scale), ConfigImpact::Segments);

    let res = PipelineConfig {
        resolution: Resolution::new(1280, 720).unwrap(),
        ..base.clone()
    };
    assert_eq!(base.impact_of(&res), ConfigImpact::Segments);

    let parallel = PipelineConfig {
        parallel: true,
        ..base.clone()
    };
    assert_eq!(base.impact_of(&parallel), ConfigImpact::None);
}

#[test]
fn from_path_reads_json_file() {
    let dir = std::env::temp_dir().join(format!("stickbug_config_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cfg.json");
    std::fs::write(&path, r#"{ "resolution": { "width": 1280, "height": 720 } }"#).unwrap();
    let cfg = PipelineConfig::from_path(&path).unwrap();
    assert_eq!(cfg.resolution, Resolution::new(1280, 720).unwrap());
    let _ = std::fs::remove_dir_all(&dir);

    assert!(PipelineConfig::from_path(dir.join("missing.json")).is_err());
}

#[test]
fn oversized_timeline_is_rejected_up_front() {
    let huge = [
        PipelineConfig {
            timings: SceneTimings {
                image_secs: 1e300,
                hold_secs: 1e300,
                ..SceneTimings::default()
            },
            ..PipelineConfig::default()
        },
        PipelineConfig {
            timings: SceneTimings {
                image_secs: 1e7,
                ..SceneTimings::default()
            },
            ..PipelineConfig::default()
        },
        // Every timing fits alone; the sum does not.
        PipelineConfig {
            timings: SceneTimings {
                reveal_secs: 30_000.0,
                ..SceneTimings::default()
            },
            ..PipelineConfig::default()
        },
        PipelineConfig {
            morph_frames: u32::MAX,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            detector_scale: 1e9,
            ..PipelineConfig::default()
        },
    ];
    for cfg in huge {
        assert!(matches!(
            cfg.validate(),
            Err(StickbugError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn generated_frames_sums_every_phase() {
    let cfg = PipelineConfig::default();
    // image + 9 reveals + hold + transition + morph
    assert_eq!(cfg.generated_frames().unwrap(), 30 + 9 * 12 + 30 + 18 + 52);

    let at_limit = PipelineConfig {
        morph_frames: MAX_MORPH_FRAMES,
        ..PipelineConfig::default()
    };
    at_limit.validate().unwrap();
}
