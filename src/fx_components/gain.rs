// src/fx_components/gain.rs

//! A linear gain stage with sample-accurate ramps.
//!
//! Multiplies the incoming audio signal by the current gain. A ramp moves the
//! gain linearly from wherever it is now to a target over a duration. A new
//! ramp or an immediate set replaces any ramp still in flight.
use crate::fx_components::DspComponent;

#[derive(Debug)]
pub struct Gain {
    sample_rate: f32,
    current: f32,
    target: f32,
    step: f32,
    remaining_samples: u32,
}

impl Gain {
    pub fn new(sample_rate: f32, initial_gain: f32) -> Self {
        Self {
            sample_rate,
            current: initial_gain,
            target: initial_gain,
            step: 0.0,
            remaining_samples: 0,
        }
    }

    #[cfg(test)]
    pub fn value(&self) -> f32 {
        self.current
    }

    #[cfg(test)]
    pub fn is_ramping(&self) -> bool {
        self.remaining_samples > 0
    }

    /// Jumps to `gain` immediately, cancelling any ramp.
    pub fn set(&mut self, gain: f32) {
        self.current = gain;
        self.target = gain;
        self.step = 0.0;
        self.remaining_samples = 0;
    }

    pub fn ramp_to(&mut self, target: f32, duration_secs: f32) {
        let samples = (duration_secs.max(0.0) * self.sample_rate).round() as u32;
        if samples == 0 {
            self.set(target);
            return;
        }
        self.target = target;
        self.step = (target - self.current) / samples as f32;
        self.remaining_samples = samples;
    }
}

impl DspComponent for Gain {
    #[inline]
    fn process_audio(&mut self, input: f32) -> f32 {
        if self.remaining_samples > 0 {
            self.remaining_samples -= 1;
            // Land exactly on the target to avoid accumulated rounding.
            self.current = if self.remaining_samples == 0 {
                self.target
            } else {
                self.current + self.step
            };
        }
        input * self.current
    }
}
