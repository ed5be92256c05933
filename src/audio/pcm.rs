use std::sync::Arc;

/// Internal audio mixing sample rate used across decode/mix/encode.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Decoded interleaved floating-point PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count (1 or 2 are mixed; extra channels are ignored).
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Arc<Vec<f32>>,
}

impl AudioPcm {
    /// Wrap interleaved samples.
    pub fn new(sample_rate: u32, channels: u16, interleaved_f32: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels,
            interleaved_f32: Arc::new(interleaved_f32),
        }
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            c => self.interleaved_f32.len() / usize::from(c),
        }
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// True when there is nothing to play.
    pub fn is_empty(&self) -> bool {
        self.frames() == 0 || self.sample_rate == 0
    }
}
