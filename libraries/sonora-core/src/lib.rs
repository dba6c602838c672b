//! Sonora Core
//!
//! Platform-agnostic types, traits, and error handling shared by the Sonora
//! decoders, outputs and the player binary.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `DecodedAudio`, `SampleRate`, `PlaybackState`
//! - **Core Traits**: `CompressedDecoder`, `AudioOutput`
//! - **Error Handling**: the `DecodeError` taxonomy and `Result` alias
//!
//! # Example
//!
//! ```rust
//! use sonora_core::{DecodedAudio, SampleRate};
//!
//! let audio = DecodedAudio::new(vec![0.0; 8], 2, SampleRate::CD_QUALITY, Some(16)).unwrap();
//! assert_eq!(audio.frames(), 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ChunkKind, DecodeError, Result};
pub use traits::{wait_for_completion, AudioOutput, CompressedDecoder};
pub use types::{DecodedAudio, PlaybackState, SampleRate};
