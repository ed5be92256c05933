use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::audio::pcm::AudioPcm;
use crate::foundation::core::Fps;
use crate::foundation::error::StickbugResult;

/// One scheduled audio contribution in timeline sample space.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSegment {
    /// First output sample (inclusive).
    pub timeline_start_sample: u64,
    /// Last output sample (exclusive). Playback also stops when the source runs out.
    pub timeline_end_sample: u64,
    /// Linear gain.
    pub volume: f32,
    /// Source PCM.
    pub source: Arc<AudioPcm>,
}

/// Audio rendering plan for a whole clip.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioManifest {
    /// Output sample rate.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Output length in sample frames.
    pub total_samples: u64,
    /// Scheduled contributions, in insertion order.
    pub segments: Vec<AudioSegment>,
}

impl AudioManifest {
    /// Empty plan spanning `total_samples`.
    pub fn silent(sample_rate: u32, channels: u16, total_samples: u64) -> Self {
        Self {
            sample_rate,
            channels,
            total_samples,
            segments: Vec::new(),
        }
    }

    /// True when no segment contributes any sound.
    pub fn is_silent(&self) -> bool {
        self.segments
            .iter()
            .all(|s| s.timeline_end_sample <= s.timeline_start_sample || s.source.is_empty())
    }

    /// Schedule `source` at `start`, playing for at most `max_len` samples (or to the end of the
    /// source when `None`). The end is clamped to the manifest length.
    pub fn schedule(&mut self, source: Arc<AudioPcm>, start: u64, max_len: Option<u64>) {
        if source.is_empty() || start >= self.total_samples {
            return;
        }
        let natural = (source.frames() as u128 * u128::from(self.sample_rate))
            .div_ceil(u128::from(source.sample_rate)) as u64;
        let len = max_len.map_or(natural, |m| m.min(natural));
        let end = start.saturating_add(len).min(self.total_samples);
        if end <= start {
            return;
        }
        self.segments.push(AudioSegment {
            timeline_start_sample: start,
            timeline_end_sample: end,
            volume: 1.0,
            source,
        });
    }
}

/// Mix all manifest segments into interleaved output PCM.
pub fn mix_manifest(manifest: &AudioManifest) -> Vec<f32> {
    let frames = manifest.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(manifest.channels)];

    for seg in &manifest.segments {
        mix_segment(&mut out, manifest, seg);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn mix_segment(out: &mut [f32], manifest: &AudioManifest, seg: &AudioSegment) {
    let src = seg.source.interleaved_f32.as_ref();
    let src_channels = usize::from(seg.source.channels);
    let src_frames = seg.source.frames();
    if src_frames == 0 || manifest.channels == 0 || seg.source.sample_rate == 0 {
        return;
    }
    let ratio = f64::from(seg.source.sample_rate) / f64::from(manifest.sample_rate);
    let out_channels = usize::from(manifest.channels);

    for dst_sample in seg.timeline_start_sample..seg.timeline_end_sample {
        let rel = (dst_sample - seg.timeline_start_sample) as f64;
        let src_pos = rel * ratio;
        let src_frame0 = src_pos.floor() as usize;
        if src_frame0 >= src_frames {
            break;
        }
        let src_frame1 = (src_frame0 + 1).min(src_frames - 1);
        let frac = (src_pos - src_frame0 as f64) as f32;

        let sample = |frame: usize, ch: usize| src[frame * src_channels + ch.min(src_channels - 1)];
        let lerp = |ch: usize| {
            let v0 = sample(src_frame0, ch);
            let v1 = sample(src_frame1, ch);
            v0 + ((v1 - v0) * frac)
        };
        let (l, r) = (lerp(0), lerp(1));

        let dst_idx = dst_sample as usize * out_channels;
        if dst_idx >= out.len() {
            break;
        }
        out[dst_idx] += l * seg.volume;
        if out_channels > 1 {
            out[dst_idx + 1] += r * seg.volume;
        }
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> StickbugResult<()> {
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "create audio mix output directory '{}'",
                parent.display()
            )
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes)
        .with_context(|| format!("write mixed audio file '{}'", out_path.display()))?;
    Ok(())
}

/// Convert a frame delta to the nearest sample index at `sample_rate`.
pub fn frame_to_sample(frame_delta: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame_delta) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num.max(1));
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
