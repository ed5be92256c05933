use std::sync::Arc;

use super::*;
use crate::audio::mix::AudioManifest;
use crate::audio::pcm::AudioPcm;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Fps, Resolution};
use crate::render::frame::FrameRGBA;

fn clip(with_audio: bool) -> Clip {
    let res = Resolution::new(4, 2).unwrap();
    let frames: Vec<_> = (0..3u8)
        .map(|v| Arc::new(FrameRGBA::solid(res, [v, v, v, 255])))
        .collect();
    let mut audio = AudioManifest::silent(48_000, 2, 4_800);
    if with_audio {
        audio.schedule(Arc::new(AudioPcm::new(48_000, 2, vec![0.5; 200])), 0, None);
    }
    Clip {
        resolution: res,
        fps: Fps::new(30, 1).unwrap(),
        frames,
        audio,
        generated_frames: 3,
    }
}

#[test]
fn frames_are_streamed_in_order() {
    let mut sink = InMemorySink::new();
    write_clip(&clip(false), &mut sink).unwrap();
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert_eq!(sink.frames()[2].1.data[0], 2);
    assert!(sink.is_finished());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (4, 2));
    assert!(cfg.audio.is_none());
}

#[test]
fn audio_is_mixed_to_a_removed_temp_file() {
    let mut sink = InMemorySink::new();
    write_clip(&clip(true), &mut sink).unwrap();
    let cfg = sink.config().unwrap();
    let audio = cfg.audio.unwrap();
    assert_eq!(audio.sample_rate, 48_000);
    assert_eq!(audio.channels, 2);
    assert!(!audio.path.exists());

    let bytes = sink.audio_bytes().unwrap();
    assert_eq!(bytes.len(), 4_800 * 2 * 4);
    assert_eq!(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0.5);
}

#[test]
fn in_memory_sink_rejects_out_of_order_frames() {
    let mut sink = InMemorySink::new();
    let f = FrameRGBA::solid(Resolution::new(1, 1).unwrap(), [0, 0, 0, 255]);
    sink.push_frame(FrameIndex(1), &f).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &f).is_err());
}
