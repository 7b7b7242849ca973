// src/audio_engine/chain.rs

//! The audio-thread half of the engine: noise -> gain -> filter -> reverb.
//! Wired once at construction, never rewired.

use crate::audio_engine::command::AudioCommand;
use crate::fx_components::{DspComponent, Filter, Gain, NoiseSource, Reverb};
use crate::settings::DEFAULT_SETTINGS;
use ringbuf::HeapConsumer;

pub const REVERB_WET_MIX: f32 = 0.5;

pub struct SignalChain {
    command_consumer: HeapConsumer<AudioCommand>,
    noise: NoiseSource,
    gain: Gain,
    filter: Filter,
    reverb: Reverb,
}

impl SignalChain {
    /// Builds the chain with the default settings; the control surface pushes
    /// the real values as commands once it initializes.
    pub fn new(command_consumer: HeapConsumer<AudioCommand>, sample_rate: f32) -> Self {
        Self {
            command_consumer,
            noise: NoiseSource::new(DEFAULT_SETTINGS.noise_type),
            gain: Gain::new(sample_rate, DEFAULT_SETTINGS.volume as f32),
            filter: Filter::new(sample_rate, DEFAULT_SETTINGS.filter_frequency_hz as f32),
            reverb: Reverb::new(sample_rate, REVERB_WET_MIX),
        }
    }

    /// Drains every pending command. Called at the top of each audio callback.
    pub fn handle_commands(&mut self) {
        while let Some(command) = self.command_consumer.pop() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Start => self.noise.start(),
            AudioCommand::Stop => self.noise.stop(),
            AudioCommand::SetNoiseType(noise_type) => self.noise.set_noise_type(noise_type),
            AudioCommand::SetGain(gain) => self.gain.set(gain),
            AudioCommand::RampGain {
                target,
                duration_secs,
            } => self.gain.ramp_to(target, duration_secs),
            AudioCommand::SetFilterFrequency(hz) => self.filter.set_frequency(hz),
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let noise = self.noise.next_sample();
        let amplified = self.gain.process_audio(noise);
        let filtered = self.filter.process_audio(amplified);
        self.reverb.process_audio(filtered)
    }

    pub fn process_buffer(&mut self, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.next_sample();
        }
    }
}
