//! Overdrive Effect
//!
//! A ladder filter held fully open (24 dB low-pass at the top of the audio
//! band, minimum resonance) so that only its tanh input stage colours the
//! signal. The saturation parameter drives that stage.

use super::effect::Effect;
use super::kind::EffectKind;
use super::ladder::{LadderCore, LadderMode};
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::params::layout::OVERDRIVE_SATURATION;
use crate::params::{FloatHandle, ParameterStore};

/// Cutoff used to keep the ladder out of the way
const OPEN_CUTOFF_HZ: f32 = 20000.0;

pub struct Overdrive {
    saturation: FloatHandle,
    core: LadderCore,
}

impl Overdrive {
    pub fn new(store: &ParameterStore) -> Result<Self> {
        let mut core = LadderCore::new();
        core.set_mode(LadderMode::Lpf24);
        core.set_resonance(0.0);
        Ok(Self {
            saturation: store.float(OVERDRIVE_SATURATION)?,
            core,
        })
    }
}

impl Effect for Overdrive {
    fn kind(&self) -> EffectKind {
        EffectKind::Overdrive
    }

    fn prepare(&mut self, sample_rate: u32, _max_block_size: usize) {
        self.core.set_sample_rate(sample_rate);
        self.core.set_cutoff(OPEN_CUTOFF_HZ);
        self.core.reset();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        self.core.set_drive(self.saturation.get());
        self.core.process_buffer(buffer);
    }

    fn reset(&mut self) {
        self.core.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{calculate_peak, ChannelLayout};
    use std::f32::consts::PI;

    fn sine_block(amplitude: f32) -> AudioBuffer {
        let mut buffer = AudioBuffer::new(4800, ChannelLayout::Mono);
        for (i, s) in buffer.channel_mut(0).iter_mut().enumerate() {
            *s = amplitude * (2.0 * PI * 220.0 * i as f32 / 48000.0).sin();
        }
        buffer
    }

    #[test]
    fn test_silence_in_silence_out() {
        let store = ParameterStore::with_default_layout().unwrap();
        let mut drive = Overdrive::new(&store).unwrap();
        drive.prepare(48000, 128);
        let mut buffer = AudioBuffer::new(128, ChannelLayout::Stereo);
        drive.process(&mut buffer);
        assert!(buffer.is_silent());
    }

    #[test]
    fn test_heavy_drive_compresses_peaks() {
        let store = ParameterStore::with_default_layout().unwrap();
        let mut drive = Overdrive::new(&store).unwrap();
        drive.prepare(48000, 4800);

        let mut quiet = sine_block(0.05);
        let mut loud = sine_block(0.8);
        store.set(OVERDRIVE_SATURATION, 100.0).unwrap();
        drive.process(&mut quiet);
        drive.reset();
        drive.process(&mut loud);

        // 16x more input yields far less than 16x more output
        let ratio = calculate_peak(&loud) / calculate_peak(&quiet);
        assert!(ratio < 4.0, "ratio was {ratio}");
        assert!(loud.is_finite());
    }
}
