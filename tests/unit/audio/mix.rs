use super::*;

fn tone(sample_rate: u32, channels: u16, frames: usize, value: f32) -> Arc<AudioPcm> {
    Arc::new(AudioPcm::new(
        sample_rate,
        channels,
        vec![value; frames * usize::from(channels)],
    ))
}

#[test]
fn frame_to_sample_uses_rational_fps() {
    // 30000/1001 ~ 29.97
    let fps = Fps {
        num: 30_000,
        den: 1001,
    };
    assert_eq!(frame_to_sample(0, fps, 48_000), 0);
    assert_eq!(frame_to_sample(1, fps, 48_000), 1602);
    assert_eq!(frame_to_sample(30, Fps { num: 30, den: 1 }, 48_000), 48_000);
}

#[test]
fn schedule_clamps_to_source_and_manifest() {
    let mut m = AudioManifest::silent(100, 2, 50);
    m.schedule(tone(100, 2, 30, 0.5), 10, None);
    m.schedule(tone(100, 2, 30, 0.5), 40, Some(5));
    m.schedule(tone(100, 2, 30, 0.5), 60, None);
    assert_eq!(m.segments.len(), 2);
    assert_eq!(m.segments[0].timeline_start_sample, 10);
    assert_eq!(m.segments[0].timeline_end_sample, 40);
    assert_eq!(m.segments[1].timeline_end_sample, 45);
}

#[test]
fn mix_sums_and_clamps() {
    let mut m = AudioManifest::silent(100, 2, 20);
    m.schedule(tone(100, 2, 20, 0.75), 0, None);
    m.schedule(tone(100, 2, 20, 0.75), 10, None);
    let out = mix_manifest(&m);
    assert_eq!(out.len(), 40);
    assert!((out[0] - 0.75).abs() < 1e-6);
    assert_eq!(out[2 * 15], 1.0);
    assert_eq!(out[2 * 15 + 1], 1.0);
}

#[test]
fn mono_sources_are_upmixed() {
    let mut m = AudioManifest::silent(100, 2, 4);
    m.schedule(tone(100, 1, 4, 0.25), 0, None);
    let out = mix_manifest(&m);
    assert!(out.iter().all(|&s| (s - 0.25).abs() < 1e-6));
}

#[test]
fn differing_rates_are_resampled() {
    // 50 Hz source played into a 100 Hz timeline lasts twice as many output samples.
    let mut m = AudioManifest::silent(100, 2, 100);
    let src = Arc::new(AudioPcm::new(50, 1, (0..10).map(|i| i as f32 / 10.0).collect()));
    m.schedule(src, 0, None);
    assert_eq!(m.segments[0].timeline_end_sample, 20);
    let out = mix_manifest(&m);
    // Output sample 1 sits halfway between source samples 0 and 1.
    assert!((out[2] - 0.05).abs() < 1e-6);
    assert!((out[4] - 0.1).abs() < 1e-6);
    assert_eq!(out[2 * 30], 0.0);
}

#[test]
fn empty_sources_are_ignored() {
    let mut m = AudioManifest::silent(100, 2, 10);
    m.schedule(Arc::new(AudioPcm::new(100, 2, Vec::new())), 0, None);
    assert!(m.segments.is_empty());
    assert!(m.is_silent());
}

#[test]
fn f32le_file_roundtrips_bytes() {
    let dir = std::env::temp_dir().join(format!("stickbug_mix_{}", std::process::id()));
    let path = dir.join("mix.f32le");
    write_mix_to_f32le_file(&[0.5, -1.0], &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0.5);
    let _ = std::fs::remove_dir_all(dir);
}
