/// Audio output errors
use thiserror::Error;

/// Result type for audio output operations
pub type Result<T> = std::result::Result<T, OutputError>;

/// Audio output errors
#[derive(Debug, Error)]
pub enum OutputError {
    /// Device not found
    #[error("Audio device not found")]
    DeviceNotFound,

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuildError(String),

    /// Failed to play stream
    #[error("Failed to play stream: {0}")]
    PlayError(String),

    /// Invalid volume level
    #[error("Invalid volume: {0}. Must be between 0.0 and 1.0")]
    InvalidVolume(f32),

    /// Sample rate conversion error
    #[error("Sample rate conversion error: {0}")]
    ResampleError(String),

    /// Device sample format with no stream builder
    #[error("Unsupported device sample format: {0}")]
    UnsupportedFormat(String),

    /// The thread owning the stream has exited
    #[error("Audio thread is not running")]
    Disconnected,

    /// CPAL error
    #[error("CPAL error: {0}")]
    CpalError(String),
}

impl From<cpal::BuildStreamError> for OutputError {
    fn from(err: cpal::BuildStreamError) -> Self {
        OutputError::StreamBuildError(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for OutputError {
    fn from(err: cpal::PlayStreamError) -> Self {
        OutputError::PlayError(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for OutputError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        OutputError::CpalError(err.to_string())
    }
}

impl From<rubato::ResamplerConstructionError> for OutputError {
    fn from(err: rubato::ResamplerConstructionError) -> Self {
        OutputError::ResampleError(err.to_string())
    }
}

impl From<rubato::ResampleError> for OutputError {
    fn from(err: rubato::ResampleError) -> Self {
        OutputError::ResampleError(err.to_string())
    }
}
