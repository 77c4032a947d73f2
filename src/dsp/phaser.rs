//! Phaser Effect
//!
//! Six first-order all-pass stages whose corner frequency is swept by a sine
//! LFO around the centre frequency. The last stage feeds back into the first
//! and the result is blended with the dry signal.

use std::f32::consts::{PI, TAU};

use super::effect::{Effect, MAX_CHANNELS};
use super::kind::EffectKind;
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::params::layout::{
    PHASER_CENTER_FREQ, PHASER_DEPTH, PHASER_FEEDBACK, PHASER_MIX, PHASER_RATE,
};
use crate::params::{FloatHandle, ParameterStore};

const NUM_STAGES: usize = 6;

/// Sweep range in octaves either side of the centre at full depth
const SWEEP_OCTAVES: f32 = 3.0;

/// Samples between corner-frequency updates
const MOD_UPDATE_INTERVAL: usize = 8;

/// Feedback is kept just short of unity so the loop stays stable
const MAX_FEEDBACK: f32 = 0.95;

/// First-order all-pass section
#[derive(Debug, Clone, Copy, Default)]
struct AllPass {
    z1: f32,
}

impl AllPass {
    #[inline]
    fn tick(&mut self, x: f32, a1: f32) -> f32 {
        let y = a1 * x + self.z1;
        self.z1 = x - a1 * y;
        y
    }
}

/// All-pass coefficient for a corner frequency
#[inline]
fn allpass_coeff(corner_hz: f32, sample_rate: f32) -> f32 {
    let t = (PI * corner_hz / sample_rate).tan();
    (t - 1.0) / (t + 1.0)
}

pub struct Phaser {
    rate: FloatHandle,
    depth: FloatHandle,
    centre: FloatHandle,
    feedback: FloatHandle,
    mix: FloatHandle,

    sample_rate: f32,
    lfo_phase: f32,
    coeff: f32,
    /// Samples left before the next corner update, carried across blocks
    mod_countdown: usize,
    stages: [[AllPass; NUM_STAGES]; MAX_CHANNELS],
    last_wet: [f32; MAX_CHANNELS],
}

impl Phaser {
    /// Bind the phaser parameters. Fails if any name is missing.
    pub fn new(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            rate: store.float(PHASER_RATE)?,
            depth: store.float(PHASER_DEPTH)?,
            centre: store.float(PHASER_CENTER_FREQ)?,
            feedback: store.float(PHASER_FEEDBACK)?,
            mix: store.float(PHASER_MIX)?,
            sample_rate: crate::engine::DEFAULT_SAMPLE_RATE as f32,
            lfo_phase: 0.0,
            coeff: 0.0,
            mod_countdown: 0,
            stages: [[AllPass::default(); NUM_STAGES]; MAX_CHANNELS],
            last_wet: [0.0; MAX_CHANNELS],
        })
    }

    /// Corner frequency for the current LFO position
    #[inline]
    fn corner_frequency(&self, centre: f32, depth: f32) -> f32 {
        let lfo = (TAU * self.lfo_phase).sin();
        let corner = centre * (depth * SWEEP_OCTAVES * lfo).exp2();
        corner.clamp(20.0, (self.sample_rate * 0.45).max(20.0))
    }
}

impl Effect for Phaser {
    fn kind(&self) -> EffectKind {
        EffectKind::Phaser
    }

    fn prepare(&mut self, sample_rate: u32, _max_block_size: usize) {
        self.sample_rate = sample_rate.max(1) as f32;
        self.reset();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let phase_inc = self.rate.get() / self.sample_rate;
        let depth = self.depth.get();
        let centre = self.centre.get();
        let feedback = self.feedback.get().clamp(-MAX_FEEDBACK, MAX_FEEDBACK);
        let mix = self.mix.get().clamp(0.0, 1.0);

        let channels = buffer.num_channels().min(MAX_CHANNELS);
        for i in 0..buffer.num_samples() {
            if self.mod_countdown == 0 {
                self.coeff = allpass_coeff(self.corner_frequency(centre, depth), self.sample_rate);
                self.mod_countdown = MOD_UPDATE_INTERVAL;
            }
            self.mod_countdown -= 1;

            for ch in 0..channels {
                let dry = buffer.samples[ch][i];
                let mut wet = dry + feedback * self.last_wet[ch];
                for stage in self.stages[ch].iter_mut() {
                    wet = stage.tick(wet, self.coeff);
                }
                self.last_wet[ch] = wet;
                buffer.samples[ch][i] = dry * (1.0 - mix) + wet * mix;
            }

            self.lfo_phase = (self.lfo_phase + phase_inc).fract();
        }
    }

    fn reset(&mut self) {
        self.stages = [[AllPass::default(); NUM_STAGES]; MAX_CHANNELS];
        self.last_wet = [0.0; MAX_CHANNELS];
        self.lfo_phase = 0.0;
        self.mod_countdown = 0;
    }
}
