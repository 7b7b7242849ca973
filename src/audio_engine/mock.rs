// src/audio_engine/mock.rs

//! An engine that records every call, for asserting call order in tests.

use crate::audio_engine::AudioEngine;
use crate::playback::PlaybackState;
use crate::settings::NoiseType;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Start,
    Stop,
    SetNoiseType(NoiseType),
    SetGain(f64),
    RampGain { target: f64, duration_secs: f64 },
    SetFilterFrequency(f64),
}

#[derive(Debug, Default)]
pub struct MockEngine {
    pub calls: Vec<EngineCall>,
    state: PlaybackState,
}

impl MockEngine {
    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl AudioEngine for MockEngine {
    fn start(&mut self) {
        self.state = PlaybackState::Playing;
        self.calls.push(EngineCall::Start);
    }

    fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.calls.push(EngineCall::Stop);
    }

    fn state(&self) -> PlaybackState {
        self.state
    }

    fn set_noise_type(&mut self, noise_type: NoiseType) {
        self.calls.push(EngineCall::SetNoiseType(noise_type));
    }

    fn set_gain(&mut self, gain: f64) {
        self.calls.push(EngineCall::SetGain(gain));
    }

    fn ramp_gain_to(&mut self, target: f64, duration_secs: f64) {
        self.calls.push(EngineCall::RampGain {
            target,
            duration_secs,
        });
    }

    fn set_filter_frequency(&mut self, frequency_hz: f64) {
        self.calls.push(EngineCall::SetFilterFrequency(frequency_hz));
    }
}
