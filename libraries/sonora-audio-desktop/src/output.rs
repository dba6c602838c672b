/// CPAL-based audio output running the stream on a dedicated audio thread
use crate::adapt::{adapt_to_plan, ConfigRange, ResamplingQuality, StreamPlan};
use crate::error::{OutputError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use sonora_core::{AudioOutput, DecodedAudio, PlaybackState};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Gain applied when no volume is configured
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Settings for opening a [`CpalOutput`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Initial gain (0.0 - 1.0)
    pub volume: f32,
    /// Quality used when the device forces a rate conversion
    pub resampling_quality: ResamplingQuality,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            resampling_quality: ResamplingQuality::default(),
        }
    }
}

/// Commands sent to the audio thread
enum AudioCommand {
    /// Replace the current stream with one rendering `samples`
    Play {
        samples: Arc<Vec<f32>>,
        plan: StreamPlan,
        reply: Sender<Result<()>>,
    },
    /// Stop playback
    Stop,
    /// Shutdown the audio thread
    Shutdown,
}

/// State shared between the owner and the stream callback
struct PlaybackShared {
    /// Next sample to render (in samples, not frames)
    position: AtomicUsize,
    /// Cleared by the first callback that has no samples left to render
    playing: AtomicBool,
    /// Gain as `f32` bits
    volume: AtomicU32,
}

impl PlaybackShared {
    fn new(volume: f32) -> Self {
        Self {
            position: AtomicUsize::new(0),
            playing: AtomicBool::new(false),
            volume: AtomicU32::new(volume.to_bits()),
        }
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }
}

/// CPAL audio output
///
/// Implements the `AudioOutput` trait using CPAL for cross-platform audio output.
///
/// The stream is created and owned by a dedicated audio thread; this handle
/// talks to it over a channel, so cpal's `!Send` stream never crosses
/// threads. Dropping the handle stops playback and joins the thread.
pub struct CpalOutput {
    /// Channel to send commands to the audio thread
    command_tx: Sender<AudioCommand>,
    /// Shared state read by the stream callback
    shared: Arc<PlaybackShared>,
    /// Output configurations the device advertises
    supported: Vec<ConfigRange>,
    /// Device default layout, used when the source layout is unsupported
    default_plan: StreamPlan,
    /// Resampling quality preset
    resampling_quality: ResamplingQuality,
    /// Handle to the audio thread, joined on drop
    audio_thread: Option<JoinHandle<()>>,
}

impl CpalOutput {
    /// Create a new CPAL output on the default audio device
    ///
    /// # Errors
    /// Returns an error if no audio device is found, the volume is out of
    /// range, or the device has no default configuration
    pub fn new(settings: OutputSettings) -> Result<Self> {
        validate_volume(settings.volume)?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(OutputError::DeviceNotFound)?;

        let default_config = device.default_output_config()?;
        let default_plan = StreamPlan {
            channels: default_config.channels(),
            sample_rate: default_config.sample_rate(),
            sample_format: default_config.sample_format(),
        };

        let supported: Vec<ConfigRange> = match device.supported_output_configs() {
            Ok(ranges) => ranges.map(|range| ConfigRange::from(&range)).collect(),
            Err(e) => {
                tracing::warn!("Could not list output configs, using device default: {}", e);
                Vec::new()
            }
        };

        tracing::info!(
            channels = default_plan.channels,
            sample_rate = default_plan.sample_rate,
            format = ?default_plan.sample_format,
            ranges = supported.len(),
            "Opened default output device"
        );

        let shared = Arc::new(PlaybackShared::new(settings.volume));
        let (command_tx, command_rx) = bounded::<AudioCommand>(32);

        let shared_clone = Arc::clone(&shared);
        let audio_thread = thread::Builder::new()
            .name("sonora-audio".to_string())
            .spawn(move || Self::audio_thread_run(device, shared_clone, command_rx))
            .map_err(|e| OutputError::CpalError(e.to_string()))?;

        Ok(Self {
            command_tx,
            shared,
            supported,
            default_plan,
            resampling_quality: settings.resampling_quality,
            audio_thread: Some(audio_thread),
        })
    }

    /// Get the current resampling quality preset
    pub fn resampling_quality(&self) -> ResamplingQuality {
        self.resampling_quality
    }

    /// Audio thread main loop
    ///
    /// Owns the device and the current stream until `Shutdown` arrives or
    /// every sender is gone.
    fn audio_thread_run(
        device: Device,
        shared: Arc<PlaybackShared>,
        command_rx: Receiver<AudioCommand>,
    ) {
        let mut stream: Option<Stream> = None;

        while let Ok(cmd) = command_rx.recv() {
            match cmd {
                AudioCommand::Play {
                    samples,
                    plan,
                    reply,
                } => {
                    // Stop existing stream
                    drop(stream.take());
                    shared.position.store(0, Ordering::Relaxed);
                    shared.playing.store(true, Ordering::Release);

                    let result = Self::open_stream(&device, plan, samples, &shared);
                    let result = match result {
                        Ok(s) => {
                            stream = Some(s);
                            Ok(())
                        }
                        Err(e) => {
                            shared.playing.store(false, Ordering::Release);
                            Err(e)
                        }
                    };
                    // The requester may have given up waiting
                    let _ = reply.send(result);
                }
                AudioCommand::Stop => {
                    drop(stream.take());
                    shared.playing.store(false, Ordering::Release);
                    shared.position.store(0, Ordering::Relaxed);
                }
                AudioCommand::Shutdown => {
                    drop(stream.take());
                    shared.playing.store(false, Ordering::Release);
                    break;
                }
            }
        }

        tracing::debug!("Audio thread exiting");
    }

    fn open_stream(
        device: &Device,
        plan: StreamPlan,
        samples: Arc<Vec<f32>>,
        shared: &Arc<PlaybackShared>,
    ) -> Result<Stream> {
        let config = StreamConfig {
            channels: plan.channels,
            sample_rate: plan.sample_rate,
            buffer_size: BufferSize::Default,
        };

        let build = stream_builder(plan.sample_format).ok_or_else(|| {
            OutputError::UnsupportedFormat(format!("{:?}", plan.sample_format))
        })?;
        let stream = build(device, &config, samples, shared)?;

        stream.play()?;
        Ok(stream)
    }

    fn send(&self, command: AudioCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| OutputError::Disconnected)
    }
}

type StreamBuilder =
    fn(&Device, &StreamConfig, Arc<Vec<f32>>, &Arc<PlaybackShared>) -> Result<Stream>;

/// Stream constructor for a device sample format
fn stream_builder(format: SampleFormat) -> Option<StreamBuilder> {
    let build: StreamBuilder = match format {
        SampleFormat::F32 => build_stream::<f32>,
        SampleFormat::F64 => build_stream::<f64>,
        SampleFormat::I32 => build_stream::<i32>,
        SampleFormat::I16 => build_stream::<i16>,
        SampleFormat::U16 => build_stream::<u16>,
        _ => return None,
    };
    Some(build)
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    samples: Arc<Vec<f32>>,
    shared: &Arc<PlaybackShared>,
) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let data_state = Arc::clone(shared);
    let error_state = Arc::clone(shared);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            audio_callback(data, &samples, &data_state);
        },
        move |err| {
            tracing::error!("Audio stream error: {}", err);
            error_state.playing.store(false, Ordering::Release);
        },
        None,
    )?;

    Ok(stream)
}

/// Audio callback (runs in the real-time audio thread)
///
/// Playback ends one callback after the last sample is copied: the device
/// only asks for a new buffer once it has consumed the previous one, so the
/// tail is audible before the state reads `Stopped`.
fn audio_callback<T>(output: &mut [T], samples: &[f32], shared: &PlaybackShared)
where
    T: SizedSample + FromSample<f32>,
{
    if !shared.playing.load(Ordering::Acquire) {
        output.fill(T::EQUILIBRIUM);
        return;
    }

    let mut pos = shared.position.load(Ordering::Relaxed);
    if pos >= samples.len() {
        output.fill(T::EQUILIBRIUM);
        shared.playing.store(false, Ordering::Release);
        return;
    }

    let volume = shared.volume();
    for out_sample in output.iter_mut() {
        *out_sample = match samples.get(pos) {
            Some(&sample) => {
                pos += 1;
                T::from_sample(sample * volume)
            }
            None => T::EQUILIBRIUM,
        };
    }

    shared.position.store(pos, Ordering::Relaxed);
}

fn validate_volume(volume: f32) -> Result<()> {
    if (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(OutputError::InvalidVolume(volume))
    }
}

impl AudioOutput for CpalOutput {
    type Error = OutputError;

    fn play(&mut self, audio: &DecodedAudio) -> Result<()> {
        let channels = audio.channels();
        let sample_rate = audio.sample_rate().as_hz();

        if audio.is_empty() {
            tracing::debug!("Empty buffer submitted, nothing to play");
            return self.stop();
        }

        let plan = StreamPlan::choose(&self.supported, self.default_plan, channels, sample_rate);
        let samples = if plan.matches(channels, sample_rate) {
            audio.samples().to_vec()
        } else {
            tracing::info!(
                source_channels = channels,
                source_rate = sample_rate,
                device_channels = plan.channels,
                device_rate = plan.sample_rate,
                "Adapting buffer to device layout"
            );
            adapt_to_plan(
                audio.samples(),
                channels,
                sample_rate,
                &plan,
                self.resampling_quality,
            )?
        };

        let (reply, reply_rx) = bounded(1);
        self.send(AudioCommand::Play {
            samples: Arc::new(samples),
            plan,
            reply,
        })?;

        reply_rx.recv().map_err(|_| OutputError::Disconnected)?
    }

    fn stop(&mut self) -> Result<()> {
        self.send(AudioCommand::Stop)
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        validate_volume(volume)?;
        self.shared.volume.store(volume.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.shared.volume()
    }

    fn state(&self) -> PlaybackState {
        if self.shared.playing.load(Ordering::Acquire) {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        // Channel may already be closed if the thread died
        let _ = self.command_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.audio_thread.take() {
            if handle.join().is_err() {
                tracing::error!("Audio thread panicked");
            }
        }
    }
}
