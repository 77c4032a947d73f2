//! Effect trait definition
//!
//! Base capability shared by every effect unit in the chain.

use super::kind::EffectKind;
use crate::engine::AudioBuffer;

/// Maximum channels an effect keeps state for (mono or stereo)
pub const MAX_CHANNELS: usize = 2;

/// Base trait for all DSP effects
///
/// Units read their bound parameters and recompute coefficients at the start of
/// every `process` call, then process the buffer in place.
///
/// `process` must be real-time safe: no allocation, no locking, no logging.
/// `prepare` and `reset` may allocate and are only called while the audio
/// thread is not running the chain.
pub trait Effect: Send {
    /// Which slot kind this unit implements
    fn kind(&self) -> EffectKind;

    /// Size internal state for a sample rate and maximum block size
    ///
    /// Must be called before the first `process` and again whenever either
    /// value changes.
    fn prepare(&mut self, sample_rate: u32, max_block_size: usize);

    /// Process audio buffer in-place
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Clear internal state (delay lines, filter history) without touching
    /// parameter bindings
    fn reset(&mut self);

    /// Get human-readable display name
    fn display_name(&self) -> &'static str {
        self.kind().display_name()
    }
}
