/// Core traits for Sonora
use crate::error::Result;
use crate::types::{DecodedAudio, PlaybackState};
use std::time::Duration;

/// Compressed decoder adapter
///
/// Implementers wrap an external codec library. They own all bitstream and
/// entropy decoding; callers take the returned channel count, sample rate
/// and samples as already normalized.
pub trait CompressedDecoder {
    /// Human-readable codec name used in diagnostics
    fn name(&self) -> &'static str;

    /// Decode a whole in-memory file
    ///
    /// # Errors
    /// Returns `DecodeError::Compressed` for any bitstream failure
    fn decode(&self, bytes: Vec<u8>) -> Result<DecodedAudio>;
}

/// Audio output trait
///
/// Implementers hand a complete decoded buffer to an output device.
pub trait AudioOutput {
    /// Backend-specific failure type
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit a whole buffer for playback, replacing anything playing
    fn play(&mut self, audio: &DecodedAudio) -> std::result::Result<(), Self::Error>;

    /// Stop playback and discard the submitted buffer
    fn stop(&mut self) -> std::result::Result<(), Self::Error>;

    /// Set volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32) -> std::result::Result<(), Self::Error>;

    /// Get current volume (0.0 - 1.0)
    fn volume(&self) -> f32;

    /// Current playback state
    fn state(&self) -> PlaybackState;
}

/// Block until `output` leaves the `Playing` state
///
/// Sleeps `interval`, calls `on_tick`, then reads the state, repeating while
/// the output still reports `Playing`. Returns the number of polls made.
pub fn wait_for_completion<O>(output: &O, interval: Duration, mut on_tick: impl FnMut()) -> usize
where
    O: AudioOutput + ?Sized,
{
    let mut polls = 0;
    loop {
        std::thread::sleep(interval);
        on_tick();
        polls += 1;

        let state = output.state();
        tracing::trace!(polls, %state, "Polled output state");
        if !state.is_playing() {
            return polls;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SampleRate;
    use std::cell::Cell;

    /// Output that reports `Playing` for a fixed number of polls
    struct CountdownOutput {
        remaining: Cell<usize>,
        volume: f32,
    }

    impl AudioOutput for CountdownOutput {
        type Error = std::io::Error;

        fn play(&mut self, _audio: &DecodedAudio) -> std::io::Result<()> {
            Ok(())
        }

        fn stop(&mut self) -> std::io::Result<()> {
            self.remaining.set(0);
            Ok(())
        }

        fn set_volume(&mut self, volume: f32) -> std::io::Result<()> {
            self.volume = volume;
            Ok(())
        }

        fn volume(&self) -> f32 {
            self.volume
        }

        fn state(&self) -> PlaybackState {
            let left = self.remaining.get();
            if left == 0 {
                PlaybackState::Stopped
            } else {
                self.remaining.set(left - 1);
                PlaybackState::Playing
            }
        }
    }

    #[test]
    fn waits_until_first_terminal_state() {
        let output = CountdownOutput {
            remaining: Cell::new(3),
            volume: 1.0,
        };
        let mut ticks = 0;
        let polls = wait_for_completion(&output, Duration::from_millis(1), || ticks += 1);

        assert_eq!(polls, 4);
        assert_eq!(ticks, 4);
    }

    #[test]
    fn stopped_output_returns_after_one_poll() {
        let mut output = CountdownOutput {
            remaining: Cell::new(10),
            volume: 1.0,
        };
        let audio = DecodedAudio::new(vec![0.0; 4], 2, SampleRate::CD_QUALITY, None).unwrap();
        output.play(&audio).unwrap();
        output.stop().unwrap();

        let polls = wait_for_completion(&output, Duration::from_millis(1), || {});
        assert_eq!(polls, 1);
    }

    #[test]
    fn works_through_trait_object() {
        let output = CountdownOutput {
            remaining: Cell::new(1),
            volume: 0.5,
        };
        let dyn_output: &dyn AudioOutput<Error = std::io::Error> = &output;
        assert_eq!(dyn_output.volume(), 0.5);
        assert_eq!(
            wait_for_completion(dyn_output, Duration::from_millis(1), || {}),
            2
        );
    }
}
