/// Core error types for Sonora
use std::fmt;
use thiserror::Error;

/// Result type alias using `DecodeError`
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Which required WAV chunk was absent after a full scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// The `fmt ` format descriptor chunk
    Format,
    /// A non-empty `data` chunk
    Data,
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => f.write_str("fmt"),
            Self::Data => f.write_str("data"),
        }
    }
}

/// Everything that can go wrong while turning file bytes into `DecodedAudio`.
///
/// Every variant is fatal to the decode attempt that produced it. Nothing is
/// retried and no partially decoded buffer is ever returned alongside an error.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Container header mismatch (`RIFF` master signature or `WAVE` form type)
    #[error("Invalid signature: expected {expected:?}, found {found:?}")]
    InvalidSignature {
        expected: &'static str,
        found: String,
    },

    /// Non-PCM format code inside a WAV container
    #[error("Unsupported codec: WAV format code {0:#06x} (only linear PCM is supported)")]
    UnsupportedCodec(u16),

    /// Extension or type tag that maps to no decode path
    #[error("Unknown format: {0:?}")]
    UnknownFormat(String),

    /// A declared length runs past the end of the buffer
    #[error("Truncated stream: {tag:?} declares {declared} bytes but only {available} remain")]
    TruncatedStream {
        tag: String,
        declared: u64,
        available: u64,
    },

    /// A required chunk was never observed
    #[error("Missing {0} chunk")]
    MissingChunk(ChunkKind),

    /// Payload length not aligned to the sample or frame width
    #[error("Malformed payload: {len} bytes is not a multiple of {width}")]
    MalformedPayload { len: usize, width: usize },

    /// PCM bit depth with no conversion routine
    #[error("Unsupported bit depth: {0} bits per sample")]
    UnsupportedBitDepth(u16),

    /// Structurally valid header carrying unusable values
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Opaque failure reported by a compressed decoder adapter
    #[error("{format} decode error: {message}")]
    Compressed {
        format: &'static str,
        message: String,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Create a compressed adapter error
    pub fn compressed(format: &'static str, msg: impl Into<String>) -> Self {
        Self::Compressed {
            format,
            message: msg.into(),
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}
