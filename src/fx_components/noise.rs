// src/fx_components/noise.rs

//! The noise source at the head of the chain.
//!
//! White noise comes straight from the RNG. Pink noise runs white noise through
//! Paul Kellett's weighted bank of one-pole filters. Brown noise is leaky
//! integrated white noise. A stopped source outputs silence.

use crate::settings::NoiseType;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
pub struct NoiseSource {
    rng: SmallRng,
    noise_type: NoiseType,
    running: bool,
    pink_state: [f32; 7],
    brown_state: f32,
}

impl NoiseSource {
    pub fn new(noise_type: NoiseType) -> Self {
        Self::with_rng(noise_type, SmallRng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(noise_type: NoiseType, seed: u64) -> Self {
        Self::with_rng(noise_type, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(noise_type: NoiseType, rng: SmallRng) -> Self {
        Self {
            rng,
            noise_type,
            running: false,
            pink_state: [0.0; 7],
            brown_state: 0.0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn noise_type(&self) -> NoiseType {
        self.noise_type
    }

    pub fn set_noise_type(&mut self, noise_type: NoiseType) {
        self.noise_type = noise_type;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if !self.running {
            return 0.0;
        }
        let white = self.rng.gen_range(-1.0f32..=1.0);
        match self.noise_type {
            NoiseType::White => white,
            NoiseType::Pink => self.pink(white),
            NoiseType::Brown => self.brown(white),
        }
    }

    #[inline]
    fn pink(&mut self, white: f32) -> f32 {
        let b = &mut self.pink_state;
        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.96900 * b[2] + white * 0.1538520;
        b[3] = 0.86650 * b[3] + white * 0.3104856;
        b[4] = 0.55000 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.0168980;
        let pink = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362;
        b[6] = white * 0.115926;
        pink * 0.11
    }

    #[inline]
    fn brown(&mut self, white: f32) -> f32 {
        self.brown_state = (self.brown_state + 0.02 * white) / 1.02;
        self.brown_state * 3.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &mut NoiseSource, n: usize) -> Vec<f32> {
        (0..n).map(|_| source.next_sample()).collect()
    }

    /// Mean absolute difference between neighbouring samples; lower means darker.
    fn roughness(samples: &[f32]) -> f32 {
        let diff: f32 = samples.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
        diff / (samples.len() - 1) as f32
    }

    #[test]
    fn stopped_source_is_silent() {
        let mut source = NoiseSource::with_seed(NoiseType::White, 7);
        assert!(!source.is_running());
        assert!(collect(&mut source, 64).iter().all(|&s| s == 0.0));

        source.start();
        assert!(collect(&mut source, 64).iter().any(|&s| s != 0.0));

        source.stop();
        assert!(collect(&mut source, 64).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn every_color_stays_bounded() {
        for noise_type in NoiseType::ALL {
            let mut source = NoiseSource::with_seed(noise_type, 42);
            source.start();
            let samples = collect(&mut source, 48_000);
            assert!(
                samples.iter().all(|s| s.abs() <= 1.5),
                "{noise_type} noise escaped its range"
            );
        }
    }

    #[test]
    fn darker_colors_are_smoother() {
        let measure = |noise_type: NoiseType| {
            let mut source = NoiseSource::with_seed(noise_type, 3);
            source.start();
            roughness(&collect(&mut source, 48_000))
        };
        let white = measure(NoiseType::White);
        let pink = measure(NoiseType::Pink);
        let brown = measure(NoiseType::Brown);
        assert!(white > pink, "white {white} vs pink {pink}");
        assert!(pink > brown, "pink {pink} vs brown {brown}");
    }

    #[test]
    fn color_can_change_while_running() {
        let mut source = NoiseSource::with_seed(NoiseType::Pink, 1);
        source.start();
        source.set_noise_type(NoiseType::Brown);
        assert_eq!(source.noise_type(), NoiseType::Brown);
        assert!(source.is_running());
    }
}
