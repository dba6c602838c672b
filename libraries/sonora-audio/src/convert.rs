/// Integer PCM to normalized f32 conversion
///
/// Each routine only reshapes sample width. Interleaving is opaque here:
/// output order always matches input order.
use serde::{Deserialize, Serialize};
use sonora_core::{DecodeError, Result};

/// Bias of unsigned 8-bit PCM, also its scale
pub const PCM8_OFFSET: f32 = 128.0;

/// Historical 16-bit divisor: the full unsigned
/// range, so 16-bit output peaks near ±0.5 rather than ±1.0
pub const PCM16_HISTORICAL_DIVISOR: f32 = 65535.0;

/// 16-bit divisor mapping i16::MIN to exactly -1.0
pub const PCM16_SYMMETRIC_DIVISOR: f32 = 32768.0;

/// 24-bit divisor, the signed maximum 2^23 - 1
///
/// Unlike the historical 16-bit divisor this one is the signed maximum, so
/// 0x7FFFFF maps to 1.0 and 0x800000 lands slightly below -1.0.
pub const PCM24_DIVISOR: f32 = 8388607.0;

/// Which divisor the 16-bit path uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pcm16Scaling {
    /// Divide by 65535, matching the historical output level
    #[default]
    Historical,
    /// Divide by 32768, full-scale output
    Symmetric,
}

impl Pcm16Scaling {
    pub fn divisor(self) -> f32 {
        match self {
            Self::Historical => PCM16_HISTORICAL_DIVISOR,
            Self::Symmetric => PCM16_SYMMETRIC_DIVISOR,
        }
    }
}

/// Convert a PCM payload of the given bit depth
///
/// # Errors
/// `UnsupportedBitDepth` for anything other than 8, 16 or 24 bits, and
/// `MalformedPayload` when the payload is not whole samples.
pub fn pcm_to_f32(payload: &[u8], bits_per_sample: u16, scaling: Pcm16Scaling) -> Result<Vec<f32>> {
    match bits_per_sample {
        8 => u8_to_f32(payload),
        16 => i16_le_to_f32(payload, scaling),
        24 => i24_le_to_f32(payload),
        other => Err(DecodeError::UnsupportedBitDepth(other)),
    }
}

/// Unsigned 8-bit PCM: subtract the 128 bias, divide by 128
///
/// 0x00 → -1.0, 0x80 → 0.0, 0xFF → 0.9921875
pub fn u8_to_f32(payload: &[u8]) -> Result<Vec<f32>> {
    Ok(payload
        .iter()
        .map(|&b| (i16::from(b) - 128) as f32 / PCM8_OFFSET)
        .collect())
}

/// Signed 16-bit little-endian PCM
pub fn i16_le_to_f32(payload: &[u8], scaling: Pcm16Scaling) -> Result<Vec<f32>> {
    check_width(payload, 2)?;
    let divisor = scaling.divisor();

    Ok(payload
        .chunks_exact(2)
        .map(|b| i32::from(i16::from_le_bytes([b[0], b[1]])) as f32 / divisor)
        .collect())
}

/// Signed 24-bit little-endian PCM, sign-extended through bit 23
pub fn i24_le_to_f32(payload: &[u8]) -> Result<Vec<f32>> {
    check_width(payload, 3)?;

    Ok(payload
        .chunks_exact(3)
        .map(|b| i24_le(b[0], b[1], b[2]) as f32 / PCM24_DIVISOR)
        .collect())
}

/// Assemble three little-endian bytes into a sign-extended i32
fn i24_le(lo: u8, mid: u8, hi: u8) -> i32 {
    let sign = if hi & 0x80 == 0 { 0x00 } else { 0xFF };
    i32::from_le_bytes([lo, mid, hi, sign])
}

fn check_width(payload: &[u8], width: usize) -> Result<()> {
    if payload.len() % width == 0 {
        Ok(())
    } else {
        Err(DecodeError::MalformedPayload {
            len: payload.len(),
            width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_boundaries() {
        let out = u8_to_f32(&[0x00, 0x80, 0xFF]).unwrap();
        assert_eq!(out, vec![-1.0, 0.0, 0.9921875]);
    }

    #[test]
    fn i16_boundaries_historical_divisor() {
        let out = i16_le_to_f32(&[0x00, 0x80, 0xFF, 0x7F, 0x00, 0x00], Pcm16Scaling::Historical)
            .unwrap();
        assert_eq!(out[0], -32768.0 / 65535.0);
        assert_eq!(out[1], 32767.0 / 65535.0);
        assert_eq!(out[2], 0.0);
        // Historical scaling never reaches full scale
        assert!(out[0] > -0.51 && out[1] < 0.51);
    }

    #[test]
    fn i16_boundaries_symmetric_divisor() {
        let out = i16_le_to_f32(&[0x00, 0x80, 0xFF, 0x7F], Pcm16Scaling::Symmetric).unwrap();
        assert_eq!(out[0], -1.0);
        assert_eq!(out[1], 32767.0 / 32768.0);
    }

    #[test]
    fn i16_is_little_endian() {
        // 0x0100 = 256, not 1
        let out = i16_le_to_f32(&[0x00, 0x01], Pcm16Scaling::Symmetric).unwrap();
        assert_eq!(out[0], 256.0 / 32768.0);
    }

    #[test]
    fn i24_boundaries() {
        let out = i24_le_to_f32(&[0xFF, 0xFF, 0x7F, 0x00, 0x00, 0x80]).unwrap();
        assert_eq!(out[0], 1.0);
        assert_eq!(out[1], -8388608.0 / 8388607.0);
        // Slightly beyond -1.0 by construction
        assert!(out[1] < -1.0);
    }

    #[test]
    fn i24_sign_extension() {
        assert_eq!(i24_le(0xFF, 0xFF, 0xFF), -1);
        assert_eq!(i24_le(0x00, 0x00, 0x80), -8_388_608);
        assert_eq!(i24_le(0xFF, 0xFF, 0x7F), 8_388_607);
        assert_eq!(i24_le(0x01, 0x02, 0x03), 0x030201);
    }

    #[test]
    fn misaligned_payloads_are_rejected() {
        assert!(matches!(
            i16_le_to_f32(&[0; 3], Pcm16Scaling::Historical),
            Err(DecodeError::MalformedPayload { len: 3, width: 2 })
        ));
        assert!(matches!(
            i24_le_to_f32(&[0; 4]),
            Err(DecodeError::MalformedPayload { len: 4, width: 3 })
        ));
    }

    #[test]
    fn output_preserves_order_and_length() {
        let payload: Vec<u8> = (0u8..=5).collect();
        let out = u8_to_f32(&payload).unwrap();
        assert_eq!(out.len(), 6);
        assert!(out.windows(2).all(|w| w[0] < w[1]));

        let out = i24_le_to_f32(&[0; 9]).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn dispatch_by_bit_depth() {
        assert_eq!(pcm_to_f32(&[0x80], 8, Pcm16Scaling::Historical).unwrap(), vec![0.0]);
        assert_eq!(
            pcm_to_f32(&[0x00, 0x80], 16, Pcm16Scaling::Symmetric).unwrap(),
            vec![-1.0]
        );
        assert_eq!(
            pcm_to_f32(&[0xFF, 0xFF, 0x7F], 24, Pcm16Scaling::Historical).unwrap(),
            vec![1.0]
        );
        for bits in [0u16, 4, 12, 32] {
            assert!(matches!(
                pcm_to_f32(&[0; 12], bits, Pcm16Scaling::Historical),
                Err(DecodeError::UnsupportedBitDepth(b)) if b == bits
            ));
        }
    }

    #[test]
    fn historical_is_default_scaling() {
        assert_eq!(Pcm16Scaling::default(), Pcm16Scaling::Historical);
        assert_eq!(Pcm16Scaling::default().divisor(), PCM16_HISTORICAL_DIVISOR);
    }
}
