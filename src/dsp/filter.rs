//! General Filter Effect
//!
//! Single biquad section in peak, band-pass, notch or all-pass shape.

use super::biquad::{BiquadCoeffs, BiquadShape, BiquadState};
use super::effect::{Effect, MAX_CHANNELS};
use super::kind::EffectKind;
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::params::layout::{
    GENERAL_FILTER_FREQ, GENERAL_FILTER_GAIN, GENERAL_FILTER_MODE, GENERAL_FILTER_QUALITY,
};
use crate::params::{ChoiceHandle, FloatHandle, ParameterStore};

pub struct GeneralFilter {
    mode: ChoiceHandle,
    frequency: FloatHandle,
    quality: FloatHandle,
    gain: FloatHandle,

    sample_rate: f64,
    coeffs: BiquadCoeffs,
    states: [BiquadState; MAX_CHANNELS],
}

impl GeneralFilter {
    /// Bind the general filter parameters. Fails if any name is missing.
    pub fn new(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            mode: store.choice(GENERAL_FILTER_MODE)?,
            frequency: store.float(GENERAL_FILTER_FREQ)?,
            quality: store.float(GENERAL_FILTER_QUALITY)?,
            gain: store.float(GENERAL_FILTER_GAIN)?,
            sample_rate: crate::engine::DEFAULT_SAMPLE_RATE as f64,
            coeffs: BiquadCoeffs::default(),
            states: [BiquadState::default(); MAX_CHANNELS],
        })
    }

    pub fn shape(&self) -> BiquadShape {
        BiquadShape::ALL[self.mode.index()]
    }

    pub fn coefficients(&self) -> &BiquadCoeffs {
        &self.coeffs
    }

    fn update_coefficients(&mut self) {
        self.coeffs = BiquadCoeffs::calculate(
            self.shape(),
            self.sample_rate,
            self.frequency.get() as f64,
            self.quality.get() as f64,
            self.gain.get() as f64,
        );
    }
}

impl Effect for GeneralFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::GeneralFilter
    }

    fn prepare(&mut self, sample_rate: u32, _max_block_size: usize) {
        self.sample_rate = sample_rate.max(1) as f64;
        self.reset();
        self.update_coefficients();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        self.update_coefficients();

        let channels = buffer.num_channels().min(MAX_CHANNELS);
        for ch in 0..channels {
            let state = &mut self.states[ch];
            for sample in buffer.channel_mut(ch).iter_mut() {
                *sample = state.process(*sample as f64, &self.coeffs) as f32;
            }
        }
    }

    fn reset(&mut self) {
        for state in &mut self.states {
            state.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ChannelLayout;
    use approx::assert_relative_eq;
    use std::f32::consts::TAU;

    fn noise_like(len: usize) -> AudioBuffer {
        let mut buffer = AudioBuffer::new(len, ChannelLayout::Stereo);
        for ch in 0..2 {
            for (i, s) in buffer.channel_mut(ch).iter_mut().enumerate() {
                let t = i as f32 / 48000.0;
                *s = 0.3 * (TAU * 313.0 * t).sin() + 0.2 * (TAU * 4410.0 * t).sin();
            }
        }
        buffer
    }

    #[test]
    fn test_default_peak_is_transparent() {
        let store = ParameterStore::with_default_layout().unwrap();
        let mut filter = GeneralFilter::new(&store).unwrap();
        filter.prepare(48000, 1024);

        let mut buffer = noise_like(1024);
        let original = buffer.clone();
        filter.process(&mut buffer);

        for ch in 0..2 {
            for (a, b) in buffer.channel(ch).iter().zip(original.channel(ch)) {
                assert_relative_eq!(*a, *b, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_mode_follows_choice() {
        let store = ParameterStore::with_default_layout().unwrap();
        let mut filter = GeneralFilter::new(&store).unwrap();
        filter.prepare(48000, 64);
        assert_eq!(filter.shape(), BiquadShape::Peak);

        store.set_choice_by_label(GENERAL_FILTER_MODE, "allpass").unwrap();
        let mut buffer = AudioBuffer::new(64, ChannelLayout::Mono);
        filter.process(&mut buffer);
        assert_eq!(filter.shape(), BiquadShape::Allpass);
    }

    #[test]
    fn test_coefficients_recomputed_each_block() {
        let store = ParameterStore::with_default_layout().unwrap();
        let mut filter = GeneralFilter::new(&store).unwrap();
        filter.prepare(48000, 64);
        let before = *filter.coefficients();

        store.set(GENERAL_FILTER_GAIN, 12.0).unwrap();
        let mut buffer = AudioBuffer::new(64, ChannelLayout::Mono);
        filter.process(&mut buffer);
        assert_ne!(before, *filter.coefficients());
    }

    #[test]
    fn test_silence_in_silence_out() {
        let store = ParameterStore::with_default_layout().unwrap();
        store.set(GENERAL_FILTER_GAIN, 24.0).unwrap();
        let mut filter = GeneralFilter::new(&store).unwrap();
        filter.prepare(48000, 256);
        let mut buffer = AudioBuffer::new(256, ChannelLayout::Stereo);
        filter.process(&mut buffer);
        assert!(buffer.is_silent());
    }
}
