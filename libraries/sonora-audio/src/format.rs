/// File type dispatch
use crate::compressed::{Mp3Decoder, OggVorbisDecoder};
use crate::convert::Pcm16Scaling;
use crate::wav;
use serde::{Deserialize, Serialize};
use sonora_core::{CompressedDecoder, DecodeError, DecodedAudio, Result};
use std::fmt;
use std::path::Path;

/// Options that change decode output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Divisor policy for 16-bit PCM
    pub pcm16_scaling: Pcm16Scaling,
}

/// Every file type Sonora can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFileType {
    /// RIFF/WAVE linear PCM
    Wav,
    /// MPEG audio layer III
    Mp3,
    /// Vorbis in an Ogg container
    Ogg,
}

impl AudioFileType {
    pub const ALL: [Self; 3] = [Self::Wav, Self::Mp3, Self::Ogg];

    /// Match a file extension, ignoring case and an optional leading dot
    pub fn from_extension(ext: &str) -> Result<Self> {
        let normalized = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();
        match normalized.as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            "ogg" => Ok(Self::Ogg),
            _ => Err(DecodeError::UnknownFormat(ext.to_string())),
        }
    }

    /// Match the extension of `path`
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| DecodeError::UnknownFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    /// Canonical lowercase extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    /// Decode a whole file's bytes through this type's path only
    pub fn decode(self, bytes: Vec<u8>, options: &DecodeOptions) -> Result<DecodedAudio> {
        match self {
            Self::Wav => wav::decode_wav(&bytes, options.pcm16_scaling),
            Self::Mp3 => Mp3Decoder::new().decode(bytes),
            Self::Ogg => OggVorbisDecoder::new().decode(bytes),
        }
    }
}

impl fmt::Display for AudioFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wav => f.write_str("WAV"),
            Self::Mp3 => f.write_str("MP3"),
            Self::Ogg => f.write_str("Ogg/Vorbis"),
        }
    }
}

/// Read and decode a file, choosing the decode path from its extension
///
/// The extension is checked before the file is opened, so an unknown type
/// costs no I/O.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn decode_file(path: &Path, options: &DecodeOptions) -> Result<DecodedAudio> {
    let file_type = AudioFileType::from_path(path)?;
    let bytes = std::fs::read(path)?;

    tracing::debug!(%file_type, bytes = bytes.len(), "Decoding file");
    let audio = file_type.decode(bytes, options)?;

    tracing::info!(
        %file_type,
        channels = audio.channels(),
        sample_rate = audio.sample_rate().as_hz(),
        frames = audio.frames(),
        "Decoded file"
    );

    Ok(audio)
}
