/// Core domain types
pub mod audio;
pub mod playback_state;

pub use audio::{DecodedAudio, SampleRate};
pub use playback_state::PlaybackState;
