// src/playback.rs

//! Start/stop state machine with fades.
//!
//! The machine owns the playback state. Each toggle issues its engine calls in a
//! fixed order and returns immediately; ramps run on the engine's own clock.

use crate::audio_engine::AudioEngine;
use log::{debug, warn};

/// Seconds for the gain to rise from silence after starting.
pub const FADE_IN_TIME: f64 = 1.0;
/// Seconds for the gain to fall to silence when stopping.
pub const FADE_OUT_TIME: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackState {
    /// Label for the toggle affordance: what pressing it will do next.
    pub fn toggle_label(self) -> &'static str {
        match self {
            PlaybackState::Stopped => "Start",
            PlaybackState::Playing => "Stop",
        }
    }
}

#[derive(Debug, Default)]
pub struct Playback {
    state: PlaybackState,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Flips between stopped and playing. `target_gain` is the linear gain the
    /// fade-in should reach; it is ignored when stopping.
    pub fn toggle<E: AudioEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        target_gain: f64,
    ) -> PlaybackState {
        if engine.state() != self.state {
            warn!("Engine reports {:?} while playback is {:?}", engine.state(), self.state);
        }
        self.state = match self.state {
            PlaybackState::Stopped => {
                engine.start();
                // Silence first so the previous gain never leaks out as a click.
                engine.set_gain(0.0);
                engine.ramp_gain_to(target_gain, FADE_IN_TIME);
                PlaybackState::Playing
            }
            PlaybackState::Playing => {
                engine.ramp_gain_to(0.0, FADE_OUT_TIME);
                engine.stop();
                PlaybackState::Stopped
            }
        };
        debug!("Playback toggled to {:?}", self.state);
        self.state
    }
}
