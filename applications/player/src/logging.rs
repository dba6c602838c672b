/// Tracing subscriber setup for the binary
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is unset or invalid
///
/// One entry per crate target: the binary, this library, the decoders and
/// the desktop output.
pub const DEFAULT_LOG_FILTER: &str =
    "sonora=info,sonora_player=info,sonora_audio=info,sonora_audio_desktop=info";

/// `RUST_LOG` when it parses, [`DEFAULT_LOG_FILTER`] otherwise
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

/// Install the global subscriber, writing to stderr so stdout carries only
/// the player's output
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
