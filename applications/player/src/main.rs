/// Sonora - decode a WAV, MP3 or Ogg file and play it to the default device
use anyhow::Context;
use clap::Parser;
use sonora_audio::{decode_file, AudioFileType};
use sonora_audio_desktop::CpalOutput;
use sonora_core::{wait_for_completion, AudioOutput};
use sonora_player::{Cli, PlayerConfig};
use std::io::Write;

fn main() -> anyhow::Result<()> {
    sonora_player::logging::init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if AudioFileType::from_path(&cli.file).is_err() {
        println!("please select a WAV, MP3 or Ogg file.");
        return Ok(());
    }

    let mut config = PlayerConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let audio = decode_file(&cli.file, &config.decode)
        .with_context(|| format!("Failed to decode {}", cli.file.display()))?;

    println!("File Name = {}", cli.file.display());
    println!("channels = {}", audio.channels());
    println!("sample rate = {}", audio.sample_rate());

    if cli.decode_only {
        return Ok(());
    }

    let mut output =
        CpalOutput::new(config.output_settings()).context("Failed to open audio output")?;
    output.play(&audio).context("Failed to start playback")?;

    let mut stdout = std::io::stdout();
    let polls = wait_for_completion(&output, config.poll_interval(), || {
        print!(".");
        // Progress dots are best effort
        let _ = stdout.flush();
    });
    println!();
    tracing::debug!(polls, "Playback complete");
    println!("finished playback");

    Ok(())
}
