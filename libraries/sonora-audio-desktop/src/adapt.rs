/// Fitting a decoded buffer to what the output device accepts
///
/// The device is first asked for a stream with the source's own channel count
/// and rate. Only when no such config exists is the buffer remapped and
/// resampled to the device default.
use crate::error::{OutputError, Result};
use cpal::SampleFormat;
use serde::{Deserialize, Serialize};

/// ITU-R BS.775-1 coefficient for center and surround channels (-3 dB)
const CENTER_MIX: f32 = 0.707;

/// Resampling quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplingQuality {
    /// Fast - Low CPU, good for older hardware
    /// 64 taps, 0.90 cutoff
    Fast,
    /// Balanced - Good quality with moderate CPU
    /// 128 taps, 0.95 cutoff
    Balanced,
    /// High - Excellent quality for critical listening (default)
    /// 256 taps, 0.99 cutoff
    #[default]
    High,
    /// Maximum - highest possible quality
    /// 512 taps, 0.995 cutoff
    Maximum,
}

impl ResamplingQuality {
    /// Get sinc filter length for this quality
    pub fn sinc_len(&self) -> usize {
        match self {
            Self::Fast => 64,
            Self::Balanced => 128,
            Self::High => 256,
            Self::Maximum => 512,
        }
    }

    /// Get frequency cutoff for this quality (relative to Nyquist)
    pub fn f_cutoff(&self) -> f32 {
        match self {
            Self::Fast => 0.90,
            Self::Balanced => 0.95,
            Self::High => 0.99,
            Self::Maximum => 0.995,
        }
    }

    /// Get oversampling factor for this quality
    pub fn oversampling_factor(&self) -> usize {
        match self {
            Self::Fast => 128,
            Self::Balanced => 256,
            Self::High => 512,
            Self::Maximum => 1024,
        }
    }
}

/// One supported output configuration range, detached from cpal's types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRange {
    pub channels: u16,
    pub min_sample_rate: u32,
    pub max_sample_rate: u32,
    pub sample_format: SampleFormat,
}

impl From<&cpal::SupportedStreamConfigRange> for ConfigRange {
    fn from(range: &cpal::SupportedStreamConfigRange) -> Self {
        Self {
            channels: range.channels(),
            min_sample_rate: range.min_sample_rate(),
            max_sample_rate: range.max_sample_rate(),
            sample_format: range.sample_format(),
        }
    }
}

/// Sample formats a stream can be built for, most preferred first
pub const STREAM_FORMATS: [SampleFormat; 5] = [
    SampleFormat::F32,
    SampleFormat::F64,
    SampleFormat::I32,
    SampleFormat::I16,
    SampleFormat::U16,
];

/// Stream layout picked for one buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamPlan {
    pub channels: u16,
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
}

impl StreamPlan {
    /// Pick the stream layout for a source of `channels` at `sample_rate`
    ///
    /// An exact channel/rate match wins, taking formats in
    /// [`STREAM_FORMATS`] order. Otherwise the device default is used and
    /// the buffer must be adapted.
    pub fn choose(
        supported: &[ConfigRange],
        default: StreamPlan,
        channels: u16,
        sample_rate: u32,
    ) -> Self {
        let exact = STREAM_FORMATS
            .into_iter()
            .find_map(|format| {
                supported.iter().find(|range| {
                    range.sample_format == format
                        && range.channels == channels
                        && (range.min_sample_rate..=range.max_sample_rate).contains(&sample_rate)
                })
            });

        match exact {
            Some(range) => Self {
                channels,
                sample_rate,
                sample_format: range.sample_format,
            },
            None => default,
        }
    }

    /// Whether a source layout can be sent without conversion
    pub fn matches(&self, channels: u16, sample_rate: u32) -> bool {
        self.channels == channels && self.sample_rate == sample_rate
    }
}

/// Convert an interleaved buffer between channel counts
///
/// Mono is duplicated to every output channel, anything folds down to mono
/// by averaging, surround folds down to stereo with ITU-R BS.775-1
/// coefficients, and other combinations copy by index with silence in
/// channels the source lacks.
pub fn remap_channels(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }

    let frames = samples.len() / from;
    let mut output = Vec::with_capacity(frames * to);

    for frame in samples.chunks_exact(from) {
        match (from, to) {
            (1, _) => output.extend(std::iter::repeat(frame[0]).take(to)),
            (_, 1) => output.push(frame.iter().sum::<f32>() / from as f32),
            (3.., 2) => {
                let (l, r) = downmix_to_stereo(frame);
                output.push(l);
                output.push(r);
            }
            _ => output.extend((0..to).map(|ch| frame.get(ch).copied().unwrap_or(0.0))),
        }
    }

    output
}

/// Fold one surround frame into a stereo pair
///
/// Layouts by channel count:
/// - 3: L, R, C
/// - 4: L, R, SL, SR
/// - 5: L, R, C, SL, SR
/// - 6+: L, R, C, LFE, SL, SR (extra channels ignored)
fn downmix_to_stereo(frame: &[f32]) -> (f32, f32) {
    let (l, r) = (frame[0], frame[1]);
    let (left, right) = match frame.len() {
        3 => {
            let c = frame[2] * CENTER_MIX;
            (l + c, r + c)
        }
        4 => (l + frame[2] * CENTER_MIX, r + frame[3] * CENTER_MIX),
        5 => {
            let c = frame[2] * CENTER_MIX;
            (l + c + frame[3] * CENTER_MIX, r + c + frame[4] * CENTER_MIX)
        }
        _ => {
            let c = frame[2] * CENTER_MIX;
            let lfe = frame[3] * CENTER_MIX;
            (
                l + c + lfe + frame[4] * CENTER_MIX,
                r + c + lfe + frame[5] * CENTER_MIX,
            )
        }
    };
    (left.clamp(-1.0, 1.0), right.clamp(-1.0, 1.0))
}

/// Resample an interleaved buffer to `target_rate`
pub fn resample(
    samples: &[f32],
    channels: usize,
    source_rate: u32,
    target_rate: u32,
    quality: ResamplingQuality,
) -> Result<Vec<f32>> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
        WindowFunction,
    };

    if source_rate == target_rate || channels == 0 {
        return Ok(samples.to_vec());
    }
    let frames = samples.len() / channels;
    if frames == 0 {
        return Ok(Vec::new());
    }

    // Use interpolation type based on quality
    let interpolation = match quality {
        ResamplingQuality::Fast => SincInterpolationType::Linear,
        _ => SincInterpolationType::Cubic,
    };

    let params = SincInterpolationParameters {
        sinc_len: quality.sinc_len(),
        f_cutoff: quality.f_cutoff(),
        interpolation,
        oversampling_factor: quality.oversampling_factor(),
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(
        f64::from(target_rate) / f64::from(source_rate),
        2.0,
        params,
        frames,
        channels,
    )?;

    // Deinterleave input samples
    let mut deinterleaved = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel_vec, &sample) in deinterleaved.iter_mut().zip(frame) {
            channel_vec.push(sample);
        }
    }

    let resampled = resampler.process(&deinterleaved, None)?;

    // Interleave output samples
    let output_frames = resampled.first().map_or(0, Vec::len);
    let mut interleaved = Vec::with_capacity(output_frames * channels);
    for frame_idx in 0..output_frames {
        for channel_data in &resampled {
            interleaved.push(channel_data[frame_idx]);
        }
    }

    Ok(interleaved)
}

/// Fit interleaved samples to `plan`, remapping first and resampling second
pub fn adapt_to_plan(
    samples: &[f32],
    channels: u16,
    sample_rate: u32,
    plan: &StreamPlan,
    quality: ResamplingQuality,
) -> Result<Vec<f32>> {
    if plan.channels == 0 {
        return Err(OutputError::UnsupportedFormat(
            "device reports zero channels".to_string(),
        ));
    }

    let remapped = if channels == plan.channels {
        samples.to_vec()
    } else {
        tracing::debug!(from = channels, to = plan.channels, "Remapping channels");
        remap_channels(samples, channels as usize, plan.channels as usize)
    };

    if sample_rate == plan.sample_rate {
        Ok(remapped)
    } else {
        tracing::debug!(
            from = sample_rate,
            to = plan.sample_rate,
            ?quality,
            "Resampling for device"
        );
        resample(
            &remapped,
            plan.channels as usize,
            sample_rate,
            plan.sample_rate,
            quality,
        )
    }
}
