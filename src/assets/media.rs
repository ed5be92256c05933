use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbaImage;

use crate::audio::pcm::AudioPcm;
use crate::foundation::core::Fps;
use crate::foundation::error::{StickbugError, StickbugResult};

/// Basic metadata about a source video file.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether ffprobe detected at least one audio stream.
    pub has_audio: bool,
}

/// Probe source video metadata through `ffprobe`.
pub fn probe_video(source_path: &Path) -> StickbugResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(source_path)
        .output()
        .map_err(|e| StickbugError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StickbugError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| StickbugError::media(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| StickbugError::media("no video stream found"))?;
    let (Some(width), Some(height)) = (video.width, video.height) else {
        return Err(StickbugError::media("missing video size from ffprobe"));
    };
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        has_audio,
    })
}

/// Decode every frame of `source`, resampled by ffmpeg to `fps`.
pub fn decode_video_frames(source: &VideoSourceInfo, fps: Fps) -> StickbugResult<Vec<RgbaImage>> {
    let frame_len = source.width as usize * source.height as usize * 4;
    if frame_len == 0 {
        return Err(StickbugError::media(
            "decoded video frame size is zero (invalid source dimensions)",
        ));
    }

    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(&source.source_path)
        .args([
            "-an",
            "-vf",
            &format!("fps={}/{}", fps.num, fps.den),
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| StickbugError::media(format!("failed to run ffmpeg for video decode: {e}")))?;
    if !out.status.success() {
        return Err(StickbugError::media(format!(
            "ffmpeg video decode failed for '{}': {}",
            source.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    if !out.stdout.len().is_multiple_of(frame_len) {
        return Err(StickbugError::media(format!(
            "decoded video has invalid size: got {} bytes, expected multiples of {frame_len}",
            out.stdout.len()
        )));
    }

    out.stdout
        .chunks_exact(frame_len)
        .map(|chunk| {
            RgbaImage::from_raw(source.width, source.height, chunk.to_vec())
                .ok_or_else(|| StickbugError::media("decoded frame does not match probed size"))
        })
        .collect()
}

/// Decode audio from a media file to stereo interleaved `f32` PCM.
///
/// Files without an audio stream decode to empty PCM.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> StickbugResult<AudioPcm> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| StickbugError::media(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("Output file #0 does not contain any stream")
        {
            return Ok(AudioPcm::new(sample_rate, 2, Vec::new()));
        }
        return Err(StickbugError::media(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    Ok(AudioPcm::new(sample_rate, 2, f32le_samples(&out.stdout)?))
}

fn f32le_samples(bytes: &[u8]) -> StickbugResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(StickbugError::media(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

// The ffmpeg-backed functions are covered by the integration tests, which skip when the tools are
// missing.
#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
