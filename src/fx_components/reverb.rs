// src/fx_components/reverb.rs

//! A Schroeder-style reverb, the last stage before the output.
//!
//! Four parallel damped comb filters feed two series all-pass diffusers. The
//! room is fixed at construction; the stage mixes its wet tail with the dry input.

use crate::fx_components::DspComponent;

const ROOM_SIZE: f32 = 0.7;
const DECAY: f32 = 0.8;
const DAMPING: f32 = 0.5;

// Prime numbers are good for delay lengths to avoid periodic artifacts.
const BASE_COMB_DELAYS: [f32; 4] = [1117.0, 1187.0, 1277.0, 1351.0];
const BASE_ALLPASS_DELAYS: [f32; 2] = [223.0, 557.0];

/// A simple one-pole low-pass filter, used for damping the reverb tail.
#[derive(Debug, Clone, Copy, Default)]
struct DampingFilter {
    z1: f32,
}
impl DampingFilter {
    #[inline(always)]
    fn process(&mut self, input: f32, coeff: f32) -> f32 {
        let output = input * (1.0 - coeff) + self.z1 * coeff;
        self.z1 = output;
        output
    }
}

/// A delay line with feedback.
#[derive(Debug, Clone)]
struct CombFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    damping_filter: DampingFilter,
}
impl CombFilter {
    fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            damping_filter: DampingFilter::default(),
        }
    }
    #[inline(always)]
    fn process(&mut self, input: f32, feedback: f32, damping: f32) -> f32 {
        let output = self.buffer[self.write_pos];
        let damped_output = self.damping_filter.process(output, damping);
        self.buffer[self.write_pos] = input + damped_output * feedback;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        output
    }
}

/// A filter that smears the phase of a signal, used to increase echo density.
#[derive(Debug, Clone)]
struct AllPassFilter {
    buffer: Vec<f32>,
    write_pos: usize,
}
impl AllPassFilter {
    fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
        }
    }
    #[inline(always)]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];
        let output = -input + delayed;
        self.buffer[self.write_pos] = input + delayed * 0.5; // G = 0.5 (fixed)
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        output
    }
}

#[derive(Debug)]
pub struct Reverb {
    comb_filters: [CombFilter; 4],
    all_pass_filters: [AllPassFilter; 2],
    damping_coeff: f32,
    wet_mix: f32,
}

impl Reverb {
    pub fn new(sample_rate: f32, wet_mix: f32) -> Self {
        let scale = (sample_rate / 44100.0) * (0.5 + ROOM_SIZE);
        let delay = |base: f32| (base * scale).round() as usize;
        Self {
            comb_filters: BASE_COMB_DELAYS.map(|d| CombFilter::new(delay(d))),
            all_pass_filters: BASE_ALLPASS_DELAYS.map(|d| AllPassFilter::new(delay(d))),
            damping_coeff: DAMPING.powf(2.0) * 0.4 + 0.05,
            wet_mix: wet_mix.clamp(0.0, 1.0),
        }
    }
}

impl DspComponent for Reverb {
    #[inline]
    fn process_audio(&mut self, input: f32) -> f32 {
        let damping = self.damping_coeff;
        let comb_out = self
            .comb_filters
            .iter_mut()
            .map(|f| f.process(input, DECAY, damping))
            .sum::<f32>()
            * 0.25; // Average the parallel comb filters

        let wet_signal = self
            .all_pass_filters
            .iter_mut()
            .fold(comb_out, |acc, f| f.process(acc));

        input * (1.0 - self.wet_mix) + wet_signal * self.wet_mix
    }
}
