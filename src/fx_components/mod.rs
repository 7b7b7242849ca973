// src/fx_components/mod.rs

// The fixed building blocks of the noise chain: noise -> gain -> filter -> reverb.
pub mod filter;
pub mod gain;
pub mod noise;
pub mod reverb;

pub use filter::Filter;
pub use gain::Gain;
pub use noise::NoiseSource;
pub use reverb::Reverb;

/// A common interface for the processors that sit after the noise source.
pub trait DspComponent: Send {
    /// Processes a single audio sample.
    fn process_audio(&mut self, input: f32) -> f32;
}
