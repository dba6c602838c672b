/// Audio-related types
use crate::error::{DecodeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    /// 48 kHz
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Uniform result of every decode path
///
/// Samples are stored as f32, normalized to roughly [-1.0, 1.0].
/// Interleaved format: [L, R, L, R, ...] for stereo.
///
/// The buffer always holds complete frames: `samples.len()` is a multiple of
/// `channels`. Once built it cannot be modified; callers hand it to an
/// output and drop it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: SampleRate,
    bits_per_sample: Option<u16>,
}

impl DecodedAudio {
    /// Build a decoded buffer, checking the frame invariants
    ///
    /// # Errors
    /// `InvalidFormat` for zero channels or a zero sample rate,
    /// `MalformedPayload` when the samples do not form whole frames.
    pub fn new(
        samples: Vec<f32>,
        channels: u16,
        sample_rate: SampleRate,
        bits_per_sample: Option<u16>,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(DecodeError::invalid_format("channel count is zero"));
        }
        if sample_rate.as_hz() == 0 {
            return Err(DecodeError::invalid_format("sample rate is zero"));
        }
        if samples.len() % channels as usize != 0 {
            return Err(DecodeError::MalformedPayload {
                len: samples.len(),
                width: channels as usize,
            });
        }

        Ok(Self {
            samples,
            channels,
            sample_rate,
            bits_per_sample,
        })
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Take ownership of the interleaved samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Source PCM bit depth; `None` for compressed sources
    pub fn bits_per_sample(&self) -> Option<u16> {
        self.bits_per_sample
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Playing time of the buffer
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate.as_hz() as f64)
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }
}
