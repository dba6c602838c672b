/// Player configuration
use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use sonora_audio::DecodeOptions;
use sonora_audio_desktop::{OutputSettings, ResamplingQuality, DEFAULT_VOLUME};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "sonora.toml";

/// Prefix for environment overrides, e.g. `SONORA_PLAYBACK__VOLUME=0.8`
pub const ENV_PREFIX: &str = "SONORA";

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub decode: DecodeOptions,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Completion poll period
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub resampling_quality: ResamplingQuality,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `sonora.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Self::environment())
    }

    /// Environment source for `SONORA_*` variables, `__` between nested keys
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Load with an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config file");
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!(path = %default_path.display(), "Loading config file");
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with SONORA_)
        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let volume = self.playback.volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlayerError::Validation(format!(
                "playback.volume must be between 0.0 and 1.0, got {}",
                volume
            )));
        }

        if self.playback.poll_interval_ms == 0 {
            return Err(PlayerError::Validation(
                "playback.poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.playback.poll_interval_ms)
    }

    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            volume: self.playback.volume,
            resampling_quality: self.playback.resampling_quality,
        }
    }
}

// Default values
fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            poll_interval_ms: default_poll_interval_ms(),
            resampling_quality: ResamplingQuality::default(),
        }
    }
}
