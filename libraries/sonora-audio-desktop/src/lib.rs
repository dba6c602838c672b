//! Desktop audio output implementation using CPAL
//!
//! This crate provides the `CpalOutput` implementation of the `AudioOutput` trait
//! for cross-platform desktop audio playback.
//!
//! # Features
//!
//! - Cross-platform audio output using CPAL
//! - Opens the device with the source layout when it is supported
//! - Channel remapping and sinc resampling when it is not
//! - Volume control
//!
//! # Example
//!
//! ```no_run
//! use sonora_audio_desktop::{CpalOutput, OutputSettings};
//! use sonora_core::{wait_for_completion, AudioOutput, DecodedAudio, SampleRate};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut output = CpalOutput::new(OutputSettings::default())?;
//!
//! // One second of stereo silence
//! let audio = DecodedAudio::new(vec![0.0; 44100 * 2], 2, SampleRate::CD_QUALITY, None)?;
//!
//! output.play(&audio)?;
//! wait_for_completion(&output, Duration::from_millis(100), || {});
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod adapt;
mod error;
mod output;

pub use adapt::{ResamplingQuality, StreamPlan};
pub use error::{OutputError, Result};
pub use output::{CpalOutput, OutputSettings, DEFAULT_VOLUME};
