// src/audio_engine/command.rs

use crate::settings::NoiseType;

/// Messages sent from the UI thread to the signal chain on the audio thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Start,
    Stop,
    SetNoiseType(NoiseType),
    SetGain(f32),
    RampGain { target: f32, duration_secs: f32 },
    SetFilterFrequency(f32),
}
