//! DSP Effects Library
//!
//! The five effect units of the processor, the `Effect` trait they share and
//! the rack that runs them in a configurable order.

mod biquad;
mod chain;
mod chorus;
mod effect;
mod filter;
mod kind;
mod ladder;
mod overdrive;
mod phaser;

pub use biquad::{BiquadCoeffs, BiquadShape, BiquadState};
pub use chain::{EffectRack, ResolvedChain};
pub use chorus::Chorus;
pub use effect::{Effect, MAX_CHANNELS};
pub use filter::GeneralFilter;
pub use kind::{DspOrder, EffectKind, EFFECT_COUNT, SLOT_COUNT};
pub use ladder::{LadderFilter, LadderMode};
pub use overdrive::Overdrive;
pub use phaser::Phaser;
