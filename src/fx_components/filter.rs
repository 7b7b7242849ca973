// src/fx_components/filter.rs

//! A State Variable Filter used as the chain's low-pass stage.

use crate::fx_components::DspComponent;
use std::f32::consts::PI;

/// Damping term `k = 1/Q` for Q = 1.
const DAMPING: f32 = 1.0;

#[derive(Debug)]
pub struct Filter {
    sample_rate: f32,
    cutoff_hz: f32,
    a1: f32,
    a2: f32,
    a3: f32,
    z1: f32,
    z2: f32,
}

impl Filter {
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            cutoff_hz,
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
            z1: 0.0,
            z2: 0.0,
        };
        filter.set_frequency(cutoff_hz);
        filter
    }

    #[cfg(test)]
    pub fn frequency(&self) -> f32 {
        self.cutoff_hz
    }

    /// Recomputes the coefficients. The cutoff is kept below Nyquist.
    pub fn set_frequency(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz.clamp(20.0, self.sample_rate / 2.0 - 20.0);
        let g = (PI * self.cutoff_hz / self.sample_rate).tan();
        self.a1 = 1.0 / (1.0 + g * (g + DAMPING));
        self.a2 = g * self.a1;
        self.a3 = g * self.a2;
    }
}

impl DspComponent for Filter {
    #[inline]
    fn process_audio(&mut self, input: f32) -> f32 {
        let v3 = input - self.z2;
        let v1 = self.a1 * self.z1 + self.a2 * v3;
        let v2 = self.z2 + self.a2 * self.z1 + self.a3 * v3;

        self.z1 = (2.0 * v1 - self.z1).clamp(-1e6, 1e6); // Clamp to prevent denormals
        self.z2 = (2.0 * v2 - self.z2).clamp(-1e6, 1e6);

        v2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms_of_sine(filter: &mut Filter, freq: f32, sample_rate: f32) -> f32 {
        let n = sample_rate as usize;
        let sum: f32 = (0..n)
            .map(|i| {
                let x = (2.0 * PI * freq * i as f32 / sample_rate).sin();
                filter.process_audio(x).powi(2)
            })
            .skip(n / 2)
            .sum();
        (sum / (n / 2) as f32).sqrt()
    }

    #[test]
    fn passes_low_and_attenuates_high() {
        let sample_rate = 48_000.0;
        let low = rms_of_sine(&mut Filter::new(sample_rate, 1_000.0), 100.0, sample_rate);
        let high = rms_of_sine(&mut Filter::new(sample_rate, 1_000.0), 10_000.0, sample_rate);
        assert!(low > 0.6, "low band rms {low}");
        assert!(high < 0.05, "high band rms {high}");
    }

    #[test]
    fn cutoff_is_kept_below_nyquist() {
        let mut filter = Filter::new(44_100.0, 1_000.0);
        filter.set_frequency(40_000.0);
        assert_eq!(filter.frequency(), 22_030.0);
        filter.set_frequency(4_186.0);
        assert_eq!(filter.frequency(), 4_186.0);
    }
}
