//! Encoding sinks and clip streaming.
//!
//! Sinks consume frames in timeline order. [`write_clip`] mixes the clip's soundtrack into a
//! temporary `f32le` file, hands it to the sink and streams every frame.

use std::path::PathBuf;

use crate::audio::mix::{mix_manifest, write_mix_to_f32le_file};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::StickbugResult;
use crate::timeline::assemble::Clip;

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

use sink::{AudioInputConfig, FrameSink, SinkConfig};

/// Stream `clip` into `sink`: `begin`, every frame in order, then `end`.
#[tracing::instrument(skip_all, fields(frames = clip.len_frames()))]
pub fn write_clip(clip: &Clip, sink: &mut dyn FrameSink) -> StickbugResult<()> {
    let mut audio_tmp = TempFileGuard(None);
    let audio = if clip.audio.is_silent() {
        None
    } else {
        let mixed = mix_manifest(&clip.audio);
        let path = std::env::temp_dir().join(format!(
            "stickbug_audio_mix_{}_{}.f32le",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        write_mix_to_f32le_file(&mixed, &path)?;
        audio_tmp.0 = Some(path.clone());
        Some(AudioInputConfig {
            path,
            sample_rate: clip.audio.sample_rate,
            channels: clip.audio.channels,
        })
    };

    tracing::info!(
        width = clip.resolution.width,
        height = clip.resolution.height,
        seconds = clip.duration_secs(),
        audio = audio.is_some(),
        "encoding clip"
    );
    sink.begin(SinkConfig {
        width: clip.resolution.width,
        height: clip.resolution.height,
        fps: clip.fps,
        audio,
    })?;
    for (i, frame) in clip.frames.iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()?;
    tracing::info!("encoding finished");
    Ok(())
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mod.rs"]
mod tests;
