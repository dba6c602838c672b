//! Sonora Audio
//!
//! Decoding of WAV, MP3 and Ogg/Vorbis files into one uniform
//! [`DecodedAudio`](sonora_core::DecodedAudio) buffer.
//!
//! This crate provides:
//! - A RIFF/WAVE container parser that tolerates any chunk order
//! - 8-, 16- and 24-bit integer PCM to normalized f32 conversion
//! - MP3 and Ogg/Vorbis adapters on top of Symphonia
//! - Extension-based dispatch to exactly one of the above
//!
//! # Example: Decoding a File
//!
//! ```rust,no_run
//! use sonora_audio::{decode_file, DecodeOptions};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let audio = decode_file(Path::new("/music/song.wav"), &DecodeOptions::default())?;
//!
//! println!(
//!     "Decoded {} frames of {} channels at {} Hz",
//!     audio.frames(),
//!     audio.channels(),
//!     audio.sample_rate().as_hz()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Converting Raw PCM
//!
//! ```rust
//! use sonora_audio::convert::{i16_le_to_f32, Pcm16Scaling};
//!
//! let samples = i16_le_to_f32(&[0x00, 0x80], Pcm16Scaling::Symmetric).unwrap();
//! assert_eq!(samples, vec![-1.0]);
//! ```

pub mod compressed;
pub mod convert;
mod format;
pub mod riff;
mod wav;

pub use compressed::{Mp3Decoder, OggVorbisDecoder};
pub use convert::Pcm16Scaling;
pub use format::{decode_file, AudioFileType, DecodeOptions};
pub use wav::{decode_wav, SUPPORTED_BIT_DEPTHS};
