use xxhash_rust::xxh3::Xxh3;

use crate::audio::mix::AudioManifest;
use crate::timeline::assemble::Clip;

const XXH3_SEED: u64 = 0x5f1c_b07a_2d43_9e61;

/// 128-bit content hash of a clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClipFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Hash frame pixels, timing and the audio schedule of `clip`.
///
/// Identical frames shared through `Arc` hash the same as separate copies.
pub fn fingerprint_clip(clip: &Clip) -> ClipFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(clip.resolution.width);
    h.write_u32(clip.resolution.height);
    h.write_u32(clip.fps.num);
    h.write_u32(clip.fps.den);
    h.write_u64(clip.generated_frames);
    h.write_u64(clip.frames.len() as u64);
    for f in &clip.frames {
        h.write_u32(f.width);
        h.write_u32(f.height);
        h.write_bytes(&f.data);
    }
    write_audio(&mut h, &clip.audio);
    h.finish()
}

fn write_audio(h: &mut StableHasher, m: &AudioManifest) {
    h.write_u32(m.sample_rate);
    h.write_u32(u32::from(m.channels));
    h.write_u64(m.total_samples);
    h.write_u64(m.segments.len() as u64);
    for seg in &m.segments {
        h.write_u64(seg.timeline_start_sample);
        h.write_u64(seg.timeline_end_sample);
        h.write_u32(seg.volume.to_bits());
        h.write_u32(seg.source.sample_rate);
        h.write_u32(u32::from(seg.source.channels));
        h.write_u64(seg.source.interleaved_f32.len() as u64);
        for s in seg.source.interleaved_f32.iter() {
            h.write_u32(s.to_bits());
        }
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn finish(self) -> ClipFingerprint {
        let v = self.inner.digest128();
        ClipFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}
