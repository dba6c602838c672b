/// Command-line interface
use crate::config::PlayerConfig;
use clap::{Parser, ValueEnum};
use sonora_audio::Pcm16Scaling;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sonora")]
#[command(about = "Decode a WAV, MP3 or Ogg file and play it", long_about = None)]
pub struct Cli {
    /// Audio file to play
    pub file: PathBuf,

    /// Configuration file path (defaults to ./sonora.toml when present)
    #[arg(short, long, env = "SONORA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Playback volume (0.0 - 1.0)
    #[arg(short, long)]
    pub volume: Option<f32>,

    /// Print stream info and exit without opening an audio device
    #[arg(long)]
    pub decode_only: bool,

    /// Divisor used for 16-bit PCM
    #[arg(long, value_enum)]
    pub pcm16_scaling: Option<ScalingArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScalingArg {
    /// Divide by 65535
    Historical,
    /// Divide by 32768
    Symmetric,
}

impl From<ScalingArg> for Pcm16Scaling {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::Historical => Pcm16Scaling::Historical,
            ScalingArg::Symmetric => Pcm16Scaling::Symmetric,
        }
    }
}

impl Cli {
    /// Apply flags on top of the file and environment layers
    pub fn apply_overrides(&self, config: &mut PlayerConfig) {
        if let Some(volume) = self.volume {
            config.playback.volume = volume;
        }
        if let Some(scaling) = self.pcm16_scaling {
            config.decode.pcm16_scaling = scaling.into();
        }
    }
}
