// src/audio_engine.rs

//! The seam between the control logic and whatever produces sound.
//!
//! The controls only ever talk to an [`AudioEngine`]. The running app uses
//! [`StreamEngine`], which forwards every call as an [`AudioCommand`] over a
//! lock-free ring buffer to the [`SignalChain`] living in the output callback.

pub mod chain;
pub mod command;
#[cfg(test)]
pub mod mock;

pub use chain::SignalChain;
pub use command::AudioCommand;

use crate::playback::PlaybackState;
use crate::settings::NoiseType;
use log::{debug, warn};
use ringbuf::{HeapProducer, HeapRb};

/// Capacity of the UI -> audio command queue.
pub const COMMAND_QUEUE_CAPACITY: usize = 256;

/// What the control logic needs from the audio graph.
///
/// Every call is fire-and-forget. Ramps run on the engine's own clock, and a
/// new ramp on the gain replaces any ramp still in flight.
pub trait AudioEngine {
    fn start(&mut self);
    fn stop(&mut self);
    fn state(&self) -> PlaybackState;
    fn set_noise_type(&mut self, noise_type: NoiseType);
    /// Sets the linear gain immediately.
    fn set_gain(&mut self, gain: f64);
    fn ramp_gain_to(&mut self, target: f64, duration_secs: f64);
    fn set_filter_frequency(&mut self, frequency_hz: f64);
}

/// UI-side handle to the signal chain running in the output stream.
pub struct StreamEngine {
    command_producer: HeapProducer<AudioCommand>,
    state: PlaybackState,
}

impl StreamEngine {
    pub fn new(command_producer: HeapProducer<AudioCommand>) -> Self {
        Self {
            command_producer,
            state: PlaybackState::Stopped,
        }
    }

    /// An engine with no output stream behind it. Commands queue up until the
    /// buffer is full and are dropped after that.
    pub fn detached() -> Self {
        let (command_producer, _) = HeapRb::<AudioCommand>::new(COMMAND_QUEUE_CAPACITY).split();
        Self::new(command_producer)
    }

    fn send_command(&mut self, command: AudioCommand) {
        debug!("Sending {:?}", command);
        if self.command_producer.push(command).is_err() {
            warn!("Command ringbuffer full. Command dropped: {:?}", command);
        }
    }
}

impl AudioEngine for StreamEngine {
    fn start(&mut self) {
        self.state = PlaybackState::Playing;
        self.send_command(AudioCommand::Start);
    }

    fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.send_command(AudioCommand::Stop);
    }

    fn state(&self) -> PlaybackState {
        self.state
    }

    fn set_noise_type(&mut self, noise_type: NoiseType) {
        self.send_command(AudioCommand::SetNoiseType(noise_type));
    }

    fn set_gain(&mut self, gain: f64) {
        self.send_command(AudioCommand::SetGain(gain as f32));
    }

    fn ramp_gain_to(&mut self, target: f64, duration_secs: f64) {
        self.send_command(AudioCommand::RampGain {
            target: target as f32,
            duration_secs: duration_secs as f32,
        });
    }

    fn set_filter_frequency(&mut self, frequency_hz: f64) {
        self.send_command(AudioCommand::SetFilterFrequency(frequency_hz as f32));
    }
}
