//! Chorus Effect
//!
//! A fractional delay line per channel, modulated by a sine LFO above the
//! centre delay. The delayed signal is fed back into the line and blended with
//! the dry input. The right channel's LFO runs a quarter cycle ahead.

use std::f32::consts::TAU;

use super::effect::{Effect, MAX_CHANNELS};
use super::kind::EffectKind;
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::params::layout::{
    CHORUS_CENTER_DELAY, CHORUS_DEPTH, CHORUS_FEEDBACK, CHORUS_MIX, CHORUS_RATE,
};
use crate::params::{FloatHandle, ParameterStore};

/// Largest centre delay the parameter allows
const MAX_CENTRE_DELAY_MS: f32 = 100.0;

/// Modulation excursion at full depth
const MAX_DEPTH_MS: f32 = 20.0;

const MAX_FEEDBACK: f32 = 0.95;

/// LFO phase offset of each channel, in cycles
const CHANNEL_PHASE_OFFSET: [f32; MAX_CHANNELS] = [0.0, 0.25];

/// Circular delay line with linear-interpolated reads
#[derive(Debug, Clone, Default)]
struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    fn resize(&mut self, len: usize) {
        self.buffer = vec![0.0; len];
        self.write_pos = 0;
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Read `delay` samples behind the write head
    #[inline]
    fn read(&self, delay: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay.clamp(1.0, (len - 2) as f32);
        let read_pos = self.write_pos as f32 + len as f32 - delay;
        let i0 = read_pos.floor() as usize % len;
        let i1 = (i0 + 1) % len;
        let frac = read_pos.fract();
        self.buffer[i0] + (self.buffer[i1] - self.buffer[i0]) * frac
    }

    #[inline]
    fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }
    }
}

pub struct Chorus {
    rate: FloatHandle,
    depth: FloatHandle,
    centre_delay: FloatHandle,
    feedback: FloatHandle,
    mix: FloatHandle,

    sample_rate: f32,
    lfo_phase: f32,
    lines: [DelayLine; MAX_CHANNELS],
}

impl Chorus {
    /// Bind the chorus parameters. Fails if any name is missing.
    pub fn new(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            rate: store.float(CHORUS_RATE)?,
            depth: store.float(CHORUS_DEPTH)?,
            centre_delay: store.float(CHORUS_CENTER_DELAY)?,
            feedback: store.float(CHORUS_FEEDBACK)?,
            mix: store.float(CHORUS_MIX)?,
            sample_rate: crate::engine::DEFAULT_SAMPLE_RATE as f32,
            lfo_phase: 0.0,
            lines: Default::default(),
        })
    }

    fn is_prepared(&self) -> bool {
        self.lines.iter().all(|line| !line.buffer.is_empty())
    }

    #[inline]
    fn ms_to_samples(&self, ms: f32) -> f32 {
        ms * 0.001 * self.sample_rate
    }
}

impl Effect for Chorus {
    fn kind(&self) -> EffectKind {
        EffectKind::Chorus
    }

    fn prepare(&mut self, sample_rate: u32, _max_block_size: usize) {
        self.sample_rate = sample_rate.max(1) as f32;
        let len = self.ms_to_samples(MAX_CENTRE_DELAY_MS + MAX_DEPTH_MS).ceil() as usize + 4;
        for line in &mut self.lines {
            line.resize(len);
        }
        self.lfo_phase = 0.0;
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.is_prepared() {
            return;
        }

        let phase_inc = self.rate.get() / self.sample_rate;
        let centre = self.ms_to_samples(self.centre_delay.get());
        let excursion = self.ms_to_samples(self.depth.get() * MAX_DEPTH_MS);
        let feedback = self.feedback.get().clamp(-MAX_FEEDBACK, MAX_FEEDBACK);
        let mix = self.mix.get().clamp(0.0, 1.0);

        let channels = buffer.num_channels().min(MAX_CHANNELS);
        for i in 0..buffer.num_samples() {
            for ch in 0..channels {
                let lfo = (TAU * (self.lfo_phase + CHANNEL_PHASE_OFFSET[ch])).sin();
                let delay = centre + excursion * (0.5 + 0.5 * lfo);

                let dry = buffer.samples[ch][i];
                let line = &mut self.lines[ch];
                let delayed = line.read(delay);
                line.write(dry + feedback * delayed);

                buffer.samples[ch][i] = dry * (1.0 - mix) + delayed * mix;
            }
            self.lfo_phase = (self.lfo_phase + phase_inc).fract();
        }
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.lfo_phase = 0.0;
    }
}
