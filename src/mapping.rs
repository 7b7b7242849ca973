// src/mapping.rs

//! Conversions between slider positions and the physical units the audio
//! engine works in.
//!
//! Sliders run over a linear control range of `0.0..=100.0`. The filter cutoff
//! is spread linearly over `MIN_FREQUENCY..=MAX_FREQUENCY` and the volume is a
//! plain linear amplitude (no decibel curve). None of these functions clamp;
//! values outside the control range extrapolate linearly.

pub const MIN_FREQUENCY: f64 = 100.0;
pub const MAX_FREQUENCY: f64 = 20_000.0;

/// Upper end of the slider range. The lower end is always 0.
pub const RANGE_MAX: f64 = 100.0;

pub fn range_to_frequency(value: f64) -> f64 {
    (value / RANGE_MAX) * (MAX_FREQUENCY - MIN_FREQUENCY) + MIN_FREQUENCY
}

pub fn frequency_to_range(frequency: f64) -> f64 {
    ((frequency - MIN_FREQUENCY) / (MAX_FREQUENCY - MIN_FREQUENCY)) * RANGE_MAX
}

pub fn range_to_gain(value: f64) -> f64 {
    value / RANGE_MAX
}

/// Inverse of [`range_to_gain`], used to place the volume slider on startup.
pub fn gain_to_range(gain: f64) -> f64 {
    gain * RANGE_MAX
}
