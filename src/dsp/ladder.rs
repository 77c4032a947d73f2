//! Ladder Filter Effect
//!
//! Moog-style four-pole ladder with a tanh-saturated input stage. The five
//! stage outputs are mixed to give 12 dB and 24 dB low-, high- and band-pass
//! responses.

use std::f32::consts::PI;

use super::effect::{Effect, MAX_CHANNELS};
use super::kind::EffectKind;
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::params::layout::{LADDER_CUTOFF, LADDER_DRIVE, LADDER_MODE, LADDER_RESONANCE};
use crate::params::{ChoiceHandle, FloatHandle, ParameterStore};

/// Response of the ladder filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderMode {
    #[default]
    Lpf12,
    Hpf12,
    Bpf12,
    Lpf24,
    Hpf24,
    Bpf24,
}

impl LadderMode {
    /// Index order matches the "Ladder Filter Mode" choice list
    pub const ALL: [LadderMode; 6] = [
        LadderMode::Lpf12,
        LadderMode::Hpf12,
        LadderMode::Bpf12,
        LadderMode::Lpf24,
        LadderMode::Hpf24,
        LadderMode::Bpf24,
    ];

    /// Stage mix weights and feedback compensation
    fn mix(self) -> ([f32; 5], f32) {
        match self {
            LadderMode::Lpf12 => ([0.0, 0.0, 1.0, 0.0, 0.0], 0.5),
            LadderMode::Hpf12 => ([1.0, -2.0, 1.0, 0.0, 0.0], 0.0),
            LadderMode::Bpf12 => ([0.0, 0.0, -1.0, 1.0, 0.0], 0.5),
            LadderMode::Lpf24 => ([0.0, 0.0, 0.0, 0.0, 1.0], 0.5),
            LadderMode::Hpf24 => ([1.0, -4.0, 6.0, -4.0, 1.0], 0.0),
            LadderMode::Bpf24 => ([0.0, 0.0, 1.0, -2.0, 1.0], 0.5),
        }
    }
}

/// Drive-dependent makeup gain for the saturating stages
#[inline]
fn drive_gain(drive: f32) -> f32 {
    drive.powf(-2.642) * 0.6103 + 0.3903
}

/// Ladder filter DSP without parameter bindings
///
/// Shared by the ladder filter and the overdrive unit.
#[derive(Debug, Clone)]
pub(crate) struct LadderCore {
    sample_rate: f32,
    mode: LadderMode,
    mix: [f32; 5],
    comp: f32,
    cutoff_transform: f32,
    scaled_resonance: f32,
    drive: f32,
    gain: f32,
    drive2: f32,
    gain2: f32,
    state: [[f32; 5]; MAX_CHANNELS],
}

impl LadderCore {
    pub(crate) fn new() -> Self {
        let mut core = Self {
            sample_rate: crate::engine::DEFAULT_SAMPLE_RATE as f32,
            mode: LadderMode::Lpf12,
            mix: [0.0; 5],
            comp: 0.0,
            cutoff_transform: 0.0,
            scaled_resonance: 0.1,
            drive: 1.0,
            gain: 1.0,
            drive2: 1.0,
            gain2: 1.0,
            state: [[0.0; 5]; MAX_CHANNELS],
        };
        core.set_mode(LadderMode::Lpf12);
        core.set_cutoff(20000.0);
        core.set_drive(1.0);
        core
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate.max(1) as f32;
    }

    pub(crate) fn set_mode(&mut self, mode: LadderMode) {
        self.mode = mode;
        let (mix, comp) = mode.mix();
        self.mix = mix;
        self.comp = comp;
    }

    pub(crate) fn mode(&self) -> LadderMode {
        self.mode
    }

    pub(crate) fn set_cutoff(&mut self, cutoff_hz: f32) {
        let cutoff = cutoff_hz.clamp(10.0, (self.sample_rate * 0.45).max(10.0));
        self.cutoff_transform = (cutoff * (-2.0 * PI / self.sample_rate)).exp();
    }

    /// `resonance` in 0.0-1.0
    pub(crate) fn set_resonance(&mut self, resonance: f32) {
        self.scaled_resonance = 0.1 + resonance.clamp(0.0, 1.0) * 0.9;
    }

    /// `drive` >= 1.0
    pub(crate) fn set_drive(&mut self, drive: f32) {
        self.drive = drive.max(1.0);
        self.gain = drive_gain(self.drive);
        self.drive2 = self.drive * 0.04 + 0.96;
        self.gain2 = drive_gain(self.drive2);
    }

    #[inline]
    pub(crate) fn process_sample(&mut self, input: f32, channel: usize) -> f32 {
        let s = &mut self.state[channel];

        let a1 = self.cutoff_transform;
        let g = 1.0 - a1;
        let b0 = g * 0.769_230_77;
        let b1 = g * 0.230_769_23;

        let dx = self.gain * (self.drive * input).tanh();
        let a = dx
            + self.scaled_resonance
                * -4.0
                * (self.gain2 * (self.drive2 * s[4]).tanh() - dx * self.comp);

        let b = b1 * s[0] + a1 * s[1] + b0 * a;
        let c = b1 * s[1] + a1 * s[2] + b0 * b;
        let d = b1 * s[2] + a1 * s[3] + b0 * c;
        let e = b1 * s[3] + a1 * s[4] + b0 * d;

        *s = [a, b, c, d, e];

        a * self.mix[0] + b * self.mix[1] + c * self.mix[2] + d * self.mix[3] + e * self.mix[4]
    }

    pub(crate) fn process_buffer(&mut self, buffer: &mut AudioBuffer) {
        let channels = buffer.num_channels().min(MAX_CHANNELS);
        for ch in 0..channels {
            for sample in buffer.channel_mut(ch).iter_mut() {
                *sample = self.process_sample(*sample, ch);
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.state = [[0.0; 5]; MAX_CHANNELS];
    }
}

// ============================================================================
// Ladder Filter Effect
// ============================================================================

/// Four-pole ladder filter bound to the "Ladder Filter ..." parameters
pub struct LadderFilter {
    mode: ChoiceHandle,
    cutoff: FloatHandle,
    resonance: FloatHandle,
    drive: FloatHandle,
    core: LadderCore,
}

impl LadderFilter {
    /// Bind the ladder filter parameters. Fails if any name is missing.
    pub fn new(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            mode: store.choice(LADDER_MODE)?,
            cutoff: store.float(LADDER_CUTOFF)?,
            resonance: store.float(LADDER_RESONANCE)?,
            drive: store.float(LADDER_DRIVE)?,
            core: LadderCore::new(),
        })
    }

    pub fn mode(&self) -> LadderMode {
        self.core.mode()
    }

    fn update_coefficients(&mut self) {
        self.core.set_mode(LadderMode::ALL[self.mode.index()]);
        self.core.set_cutoff(self.cutoff.get());
        self.core.set_resonance(self.resonance.get());
        self.core.set_drive(self.drive.get());
    }
}

impl Effect for LadderFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::LadderFilter
    }

    fn prepare(&mut self, sample_rate: u32, _max_block_size: usize) {
        self.core.set_sample_rate(sample_rate);
        self.core.reset();
        self.update_coefficients();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        self.update_coefficients();
        self.core.process_buffer(buffer);
    }

    fn reset(&mut self) {
        self.core.reset();
    }
}
