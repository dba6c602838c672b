//! Sonora Player
//!
//! Command-line front end: layered configuration, decoding through
//! `sonora-audio` and playback through `sonora-audio-desktop`.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use cli::Cli;
pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
