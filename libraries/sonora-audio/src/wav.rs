/// WAV decode path: container parse followed by PCM conversion
use crate::convert::{self, Pcm16Scaling};
use crate::riff::{self, WavContents};
use sonora_core::{DecodeError, DecodedAudio, Result, SampleRate};

/// Bit depths with a conversion routine
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [8, 16, 24];

/// Decode a complete in-memory WAV file
///
/// # Errors
/// Any container error from [`riff::parse_wav`], `UnsupportedBitDepth` for
/// depths other than 8/16/24, and `MalformedPayload` when the data chunk
/// does not hold whole frames.
pub fn decode_wav(bytes: &[u8], scaling: Pcm16Scaling) -> Result<DecodedAudio> {
    let WavContents { format, data } = riff::parse_wav(bytes)?;

    if !SUPPORTED_BIT_DEPTHS.contains(&format.bits_per_sample) {
        return Err(DecodeError::UnsupportedBitDepth(format.bits_per_sample));
    }

    let block_align = format.block_align();
    if data.len() % block_align != 0 {
        return Err(DecodeError::MalformedPayload {
            len: data.len(),
            width: block_align,
        });
    }

    tracing::debug!(
        channels = format.channels,
        sample_rate = format.sample_rate,
        bits_per_sample = format.bits_per_sample,
        data_len = data.len(),
        "Parsed WAV container"
    );

    let samples = convert::pcm_to_f32(data, format.bits_per_sample, scaling)?;

    DecodedAudio::new(
        samples,
        format.channels,
        SampleRate::new(format.sample_rate),
        Some(format.bits_per_sample),
    )
}
